//! CmisBridge console workbench.
//!
//! Mounts an in-memory repository seeded with demo content and exposes
//! inspection commands: the type tree, folder listings, and per-object
//! panels (properties, allowable actions, versions).

use std::sync::Arc;

use bytes::Bytes;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt};

use cmisbridge_adapter::{ObjectKind, Repository, TypeManager};
use cmisbridge_core::CmisError;
use cmisbridge_core::config::AppConfig;
use cmisbridge_core::traits::ContentData;
use cmisbridge_core::types::{
    BaseType, Properties, PropertyDefinition, PropertyKind, PropertyValue, TypeDefinition,
    VersioningState,
};
use cmisbridge_store::MemoryStore;

#[derive(Parser)]
#[command(name = "cmisbridge", about = "CmisBridge repository workbench")]
struct Cli {
    /// Path to the configuration file.
    #[arg(long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the type tree with property definitions.
    Types,
    /// List the visible children of a folder.
    Ls {
        /// CMIS path of the folder.
        #[arg(default_value = "/")]
        path: String,
    },
    /// Show one object: properties, allowable actions, versions.
    Show {
        /// CMIS path of the object.
        path: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_configuration(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(cli.command, config).await {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

/// Load configuration from file and environment.
fn load_configuration(path_override: Option<&str>) -> Result<AppConfig, CmisError> {
    let config_path = path_override
        .map(String::from)
        .or_else(|| std::env::var("CMISBRIDGE_CONFIG").ok())
        .unwrap_or_else(|| "config/default.toml".to_string());

    if !std::path::Path::new(&config_path).exists() {
        return Ok(AppConfig::default());
    }

    let mut config = AppConfig::load(&config_path)?;

    let env = std::env::var("CMISBRIDGE_ENV").unwrap_or_else(|_| "development".to_string());
    let env_config_path = format!("config/{env}.toml");
    if std::path::Path::new(&env_config_path).exists() {
        config.merge(AppConfig::load(&env_config_path)?);
    }

    Ok(config)
}

/// Initialize tracing/logging.
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt().json().with_env_filter(filter).with_target(true).init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

async fn run(command: Command, config: AppConfig) -> Result<(), CmisError> {
    let repo = seed_repository(&config).await?;

    match command {
        Command::Types => print_types(&repo),
        Command::Ls { path } => list_folder(&repo, &path).await?,
        Command::Show { path } => show_object(&repo, &path).await?,
    }
    Ok(())
}

/// Build the demo repository the workbench inspects.
async fn seed_repository(config: &AppConfig) -> Result<Repository, CmisError> {
    let mut types = TypeManager::new();
    types.register(
        TypeDefinition::new("bridge:report", BaseType::Document)
            .with_display_name("Report")
            .with_description("A versioned report document")
            .versionable(true)
            .with_property(
                PropertyDefinition::new("bridge:author", PropertyKind::String).required(),
            )
            .with_property(
                PropertyDefinition::new("bridge:status", PropertyKind::String)
                    .required()
                    .with_default(vec![PropertyValue::String("draft".to_string())]),
            ),
    )?;

    let store = Arc::new(MemoryStore::new());
    let repo = Repository::new(store, types, &config.repository)?;

    let root = repo.root_folder().await?;
    let reports = root
        .create_folder("reports", "cmis:folder", &Properties::new())
        .await?;
    reports
        .create_document(
            "q1.txt",
            "bridge:report",
            &Properties::new().with_string("bridge:author", "alice"),
            Some(ContentData::new("text/plain", Bytes::from("Q1 numbers"))),
            VersioningState::Major,
        )
        .await?;
    root.create_document(
        "readme.txt",
        "cmis:document",
        &Properties::new(),
        Some(ContentData::new("text/plain", Bytes::from("Welcome"))),
        VersioningState::None,
    )
    .await?;

    Ok(repo)
}

fn print_types(repo: &Repository) {
    for base in [BaseType::Folder, BaseType::Document] {
        let mut definitions: Vec<_> = repo
            .types()
            .definitions()
            .filter(|def| def.base == base)
            .collect();
        // Base type first, subtypes after it.
        definitions.sort_by_key(|def| def.id != base.type_id());

        println!("{}", base.type_id());
        for def in definitions {
            if def.id != base.type_id() {
                println!("  {} ({})", def.id, def.display_name);
            }
            for prop in def.property_definitions.values() {
                println!(
                    "    {:<34} {:<9} {:?}{}",
                    prop.id,
                    prop.kind.to_string(),
                    prop.updatability,
                    if prop.required { "  required" } else { "" }
                );
            }
        }
        println!();
    }
}

async fn list_folder(repo: &Repository, path: &str) -> Result<(), CmisError> {
    let folder = repo.object_by_path(path).await?.as_folder()?;
    let mut cursor = folder.children().await?;
    while let Some(child) = cursor.next().await? {
        let marker = match child.kind() {
            ObjectKind::Folder => "/",
            ObjectKind::Document => "",
        };
        println!(
            "{:<30} {:<18} {}",
            format!("{}{marker}", child.name()),
            child.type_id().await?,
            child.object_id()
        );
    }
    Ok(())
}

async fn show_object(repo: &Repository, path: &str) -> Result<(), CmisError> {
    let object = repo.object_by_path(path).await?;

    println!("object id : {}", object.object_id());
    println!("type      : {}", object.type_id().await?);
    println!("path      : {}", object.path()?);
    println!();

    println!("properties:");
    let properties = object.properties(None).await?;
    for property in properties.iter() {
        let rendered: Vec<String> = property.values.iter().map(ToString::to_string).collect();
        println!("  {:<34} {}", property.id, rendered.join(", "));
    }

    println!();
    println!("allowable actions:");
    for action in object.allowable_actions().await?.iter() {
        println!("  {action}");
    }

    if object.kind() == ObjectKind::Document {
        let document = object.as_document()?;
        if document.node().versionable {
            println!();
            println!("versions:");
            for version in document.versions().await? {
                println!(
                    "  {:<8} {} {}",
                    version.label,
                    if version.major { "major" } else { "minor" },
                    version.comment.as_deref().unwrap_or("")
                );
            }
        }
    }
    Ok(())
}
