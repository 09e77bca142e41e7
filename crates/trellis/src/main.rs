// SPDX-FileCopyrightText: 2026 Trellis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trellis: inspect what a plugin namespace loads.

mod list;

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::debug;
use trellis_config::TrellisConfig;
use trellis_core::TrellisError;
use trellis_plugin::{ModuleLoader, resolve_type};

use crate::list::Output;

/// Inspect plugin namespaces.
#[derive(Parser, Debug)]
#[command(name = "trellis", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print JSON instead of a table.
    #[arg(long, global = true)]
    json: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    plain: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the effective search path.
    Roots,
    /// List the modules of a namespace.
    Modules { namespace: String },
    /// List the public objects exported by a namespace.
    Objects { namespace: String },
    /// List the types exported by a namespace.
    Classes {
        namespace: String,
        /// Only list proper subclasses of this type (`pkg.module.Type`).
        #[arg(long, value_name = "TYPE")]
        subclass_of: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => trellis_config::load_and_validate_path(path),
        None => trellis_config::load_and_validate(),
    };
    let config = match config {
        Ok(config) => config,
        Err(errors) => {
            trellis_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.log.level);

    let output = Output {
        json: cli.json,
        color: !cli.plain && std::io::stdout().is_terminal(),
    };
    if let Err(e) = run(cli.command, &config, output) {
        eprintln!("trellis: {e}");
        std::process::exit(1);
    }
}

fn run(command: Commands, config: &TrellisConfig, output: Output) -> Result<(), TrellisError> {
    let search_path = config.search_path();
    debug!(roots = search_path.len(), "resolved search path");

    let loader = ModuleLoader::with_layout(search_path.clone(), config.layout.clone())
        .with_policy(config.loader.import_errors);
    let mut out = std::io::stdout().lock();

    match command {
        Commands::Roots => list::roots(&mut out, &search_path, output),
        Commands::Modules { namespace } => list::modules(&mut out, &loader, &namespace, output),
        Commands::Objects { namespace } => list::objects(&mut out, loader, &namespace, output),
        Commands::Classes {
            namespace,
            subclass_of,
        } => {
            let base = subclass_of
                .as_deref()
                .map(|name| resolve_type(loader.importer(), name))
                .transpose()?;
            list::classes(&mut out, loader, &namespace, base.as_ref(), output)
        }
    }
}

/// Install the tracing subscriber. `RUST_LOG` takes precedence over the
/// configured level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("trellis={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_classes_with_base() {
        let cli = Cli::try_parse_from([
            "trellis",
            "classes",
            "myapp.plugins",
            "--subclass-of",
            "myapp.base.Handler",
            "--json",
        ])
        .unwrap();
        assert!(cli.json);
        match cli.command {
            Commands::Classes {
                namespace,
                subclass_of,
            } => {
                assert_eq!(namespace, "myapp.plugins");
                assert_eq!(subclass_of.as_deref(), Some("myapp.base.Handler"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn config_flag_is_global() {
        let cli = Cli::try_parse_from(["trellis", "roots", "--config", "/tmp/t.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/t.toml")));
        assert!(matches!(cli.command, Commands::Roots));
    }

    #[test]
    fn namespace_is_required() {
        assert!(Cli::try_parse_from(["trellis", "modules"]).is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn default_config_is_valid() {
        let config = trellis_config::load_and_validate_str("").expect("defaults should be valid");
        assert_eq!(config.log.level, "info");
    }
}
