use std::path::PathBuf;

use anyhow::Result;
use clap::error::ErrorKind;
use clap::Parser;
use typecompat_catalog::{CatalogError, TypeCatalog};
use typecompat_config::{init_tracing, CompatConfig, ConfigError, DuplicateMode};
use typecompat_hierarchy::{CheckError, CompatibilityChecker};

#[derive(Parser, Debug)]
#[command(
    name = "type-compat",
    version,
    about = "Check whether SUB_TYPE may be used wherever SUPER_TYPE is expected"
)]
struct Cli {
    /// Directory of compiled classes (e.g. the output of `javac -d`)
    root: PathBuf,
    /// Fully-qualified name of the expected type
    super_type: String,
    /// Fully-qualified name of the candidate type
    sub_type: String,
    /// TOML config file (defaults to $TYPE_COMPAT_CONFIG)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Don't seed the catalog with the built-in java.base types
    #[arg(long)]
    no_stdlib_stub: bool,
    /// Fail when two classfiles declare the same type
    #[arg(long)]
    deny_duplicates: bool,
    /// Log level or filter directives (overrides the config file)
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,
    /// Print the supertype chain to stderr
    #[arg(long)]
    explain: bool,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            let _ = err.print();
            std::process::exit(code);
        }
    };

    let exit_code = match run(cli) {
        Ok(compatible) => {
            println!("{compatible}");
            0
        }
        Err(err) => {
            eprintln!("type-compat: {}: {:#}", error_kind(&err), err);
            1
        }
    };

    std::process::exit(exit_code);
}

fn run(cli: Cli) -> Result<bool> {
    let config = effective_config(&cli)?;
    init_tracing(&config.logging);

    let catalog = TypeCatalog::load_with_options(&cli.root, &config.catalog_options())?;
    tracing::debug!(
        target: "typecompat.cli",
        root = %cli.root.display(),
        types = catalog.len(),
        malformed = catalog.malformed_files().count(),
        "catalog loaded"
    );

    let mut checker = CompatibilityChecker::with_options(&catalog, config.resolver_options());
    if !cli.explain {
        return Ok(checker.is_compatible(&cli.super_type, &cli.sub_type)?);
    }

    let path = checker.supertype_path(&cli.super_type, &cli.sub_type)?;
    match &path {
        Some(path) => eprintln!("{}", path.join(" -> ")),
        None => eprintln!("{} is not a supertype of {}", cli.super_type, cli.sub_type),
    }
    Ok(path.is_some())
}

fn effective_config(cli: &Cli) -> Result<CompatConfig, ConfigError> {
    let mut config = CompatConfig::load(cli.config.as_deref())?;
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }
    if cli.no_stdlib_stub {
        config.catalog.stdlib_stub = false;
    }
    if cli.deny_duplicates {
        config.catalog.duplicates = DuplicateMode::Error;
    }
    Ok(config)
}

fn error_kind(err: &anyhow::Error) -> &'static str {
    if let Some(err) = err.downcast_ref::<CheckError>() {
        return err.kind();
    }
    if let Some(err) = err.downcast_ref::<CatalogError>() {
        return match err {
            CatalogError::RootNotFound { .. } => "RootNotFound",
            CatalogError::DuplicateType { .. } => "DuplicateType",
        };
    }
    if err.downcast_ref::<ConfigError>().is_some() {
        return "Config";
    }
    "Error"
}
