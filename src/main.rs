use clap::{Parser, Subcommand};
use openapi_schema_source::{
    configure_openapi, schema_from_file, ClusterConfig, GroupVersionKind, HttpClientFactory,
    SchemaRegistry,
};
use openapi_schema_source::spec::normalizer::yaml_to_json;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "openapi-schema")]
#[command(about = "Configure and inspect the OpenAPI schema used for resource type information", long_about = None)]
struct Cli {
    /// Where to take the OpenAPI schema from: builtin, file or cluster
    #[arg(long, default_value = "builtin")]
    schema_source: String,

    /// Schema file, used when the source is `file`
    #[arg(long)]
    schema_path: Option<PathBuf>,

    /// YAML file with cluster connection settings
    #[arg(long)]
    cluster_config: Option<PathBuf>,

    /// API server URL, overrides the cluster config
    #[arg(long)]
    server: Option<String>,

    /// Bearer token, overrides the cluster config
    #[arg(long)]
    token: Option<String>,

    /// Request timeout in seconds, overrides the cluster config
    #[arg(long)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Show what the configured schema contains")]
    Summary,
    #[command(about = "Print a registered definition as JSON")]
    Show { definition: String },
    #[command(about = "Validate a YAML or JSON document against a registered definition")]
    Validate {
        /// Definition name, or `apiVersion/kind` looked up by kind
        definition: String,
        document: PathBuf,
    },
    #[command(about = "Normalize a YAML OpenAPI file and print it as JSON")]
    Convert { file: PathBuf },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("✗ {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let configured = || -> Result<SchemaRegistry, Box<dyn std::error::Error>> {
        let cluster = match &cli.cluster_config {
            Some(path) => ClusterConfig::from_yaml_file(path)?,
            None => ClusterConfig::default(),
        }
        .with_overrides(ClusterConfig {
            server: cli.server.clone(),
            token: cli.token.clone(),
            timeout_seconds: cli.timeout_secs,
        });

        let mut registry = SchemaRegistry::default();
        let factory = HttpClientFactory::new(cluster);
        let schema_path = cli.schema_path.as_deref().unwrap_or(Path::new(""));
        configure_openapi(&mut registry, &factory, &cli.schema_source, schema_path)?;
        Ok(registry)
    };

    match cli.command.as_ref().unwrap_or(&Commands::Summary) {
        Commands::Summary => {
            let registry = configured()?;
            let names = registry.definition_names();
            println!("✓ Schema source: {}", cli.schema_source);
            println!("  built-in schema active: {}", registry.is_builtin_active());
            println!("  definitions: {}", names.len());
            for name in names {
                println!("    {}", name);
            }
        }
        Commands::Show { definition } => {
            let registry = configured()?;
            let schema = registry
                .definition(definition)
                .ok_or_else(|| format!("no definition named {}", definition))?;
            println!("{}", serde_json::to_string_pretty(schema)?);
        }
        Commands::Validate {
            definition,
            document,
        } => {
            let registry = configured()?;
            let name = resolve_definition_name(&registry, definition);
            let validator = registry.validator(&name)?;

            let bytes = std::fs::read(document)?;
            let yaml: serde_yaml::Value = serde_yaml::from_slice(&bytes)?;
            let instance = yaml_to_json(yaml)?;

            validator.validate(&instance)?;
            println!("✓ {} is a valid {}", document.display(), validator.name());
        }
        Commands::Convert { file } => {
            let doc = schema_from_file(file)?;
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
    }

    Ok(())
}

/// Accepts either a definition name or `apiVersion/kind`
fn resolve_definition_name(registry: &SchemaRegistry, definition: &str) -> String {
    if registry.definition(definition).is_some() {
        return definition.to_string();
    }

    definition
        .rsplit_once('/')
        .and_then(|(api_version, kind)| {
            let gvk = GroupVersionKind::from_api_version(api_version, kind);
            registry.schema_for_kind(&gvk).map(|(name, _)| name.to_string())
        })
        .unwrap_or_else(|| definition.to_string())
}
