// SPDX-FileCopyrightText: 2026 Thud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Thud - a module host with dependency-ordered loading.
//!
//! This is the binary entry point for the `thud` command.

mod call;
mod inspect;
mod resolve;

use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use thud_config::ThudConfig;
use thud_core::ThudError;
use thud_registry::{Host, builtin_modules};

/// Thud - a module host with dependency-ordered loading.
#[derive(Parser, Debug)]
#[command(name = "thud", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the load order of the module manifests in a directory.
    Resolve {
        /// Manifest directory (defaults to `modules.manifest_dir`).
        dir: Option<PathBuf>,
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Validate and resolve module manifests, reporting every problem.
    Check {
        /// Manifest directory (defaults to `modules.manifest_dir`).
        dir: Option<PathBuf>,
    },
    /// List loaded modules with their components and handlers.
    List {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Invoke a component and print its output.
    Invoke {
        /// Bare or `module/name` qualified component name.
        component: String,
        /// Format string passed to the component.
        format: String,
        #[arg(long, default_value_t = 0)]
        slot: u8,
        /// Output buffer capacity in bytes.
        #[arg(long, default_value_t = call::DEFAULT_CAPACITY)]
        capacity: usize,
    },
    /// Publish an event to every subscribed handler.
    Publish {
        event: String,
        /// Text payload; without it handlers receive an empty payload.
        #[arg(long)]
        data: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => thud_config::load_and_validate_path(path),
        None => thud_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            thud_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.log.level);

    let mut stdout = std::io::stdout().lock();
    if let Err(err) = run(cli.command, &config, &mut stdout) {
        let _ = stdout.flush();
        eprintln!("thud: error: {err}");
        std::process::exit(1);
    }
}

fn run(
    command: Option<Commands>,
    config: &ThudConfig,
    out: &mut impl Write,
) -> Result<(), ThudError> {
    let manifest_dir =
        |dir: Option<PathBuf>| dir.unwrap_or_else(|| PathBuf::from(&config.modules.manifest_dir));

    match command {
        Some(Commands::Resolve { dir, json }) => {
            resolve::run_resolve(&manifest_dir(dir), &config.modules.disabled, json, out)
        }
        Some(Commands::Check { dir }) => {
            resolve::run_check(&manifest_dir(dir), &config.modules.disabled, out)
        }
        Some(Commands::List { json }) => inspect::run_list(&build_host(config)?, json, out),
        Some(Commands::Invoke {
            component,
            format,
            slot,
            capacity,
        }) => call::run_invoke(&build_host(config)?, &component, &format, slot, capacity, out),
        Some(Commands::Publish { event, data }) => {
            call::run_publish(&build_host(config)?, &event, data, out)
        }
        None => {
            writeln!(out, "thud: use --help for available commands").map_err(output_error)?;
            Ok(())
        }
    }
}

/// A host with every built-in module not disabled by configuration.
fn build_host(config: &ThudConfig) -> Result<Host, ThudError> {
    let host = Host::from_config(config);
    let modules = builtin_modules()
        .into_iter()
        .filter(|m| !config.modules.disabled.contains(&m.name))
        .collect();
    host.load(modules)?;
    Ok(host)
}

fn output_error(err: std::io::Error) -> ThudError {
    ThudError::Internal(format!("failed to write output: {err}"))
}

/// Initialize the tracing subscriber. `RUST_LOG` wins over the configured level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("thud={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn invoke_arguments_parse() {
        let cli = Cli::try_parse_from([
            "thud", "invoke", "echo", "hello", "--slot", "3", "--capacity", "2",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Invoke {
                component,
                format,
                slot,
                capacity,
            }) => {
                assert_eq!(component, "echo");
                assert_eq!(format, "hello");
                assert_eq!(slot, 3);
                assert_eq!(capacity, 2);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn disabled_builtins_are_not_loaded() {
        let mut config = ThudConfig::default();
        config.modules.disabled = vec!["core".to_string()];
        assert!(build_host(&config).unwrap().module_names().is_empty());
        assert_eq!(build_host(&ThudConfig::default()).unwrap().module_names(), vec!["core"]);
    }

    #[test]
    fn no_subcommand_prints_hint() {
        let mut out = Vec::new();
        run(None, &ThudConfig::default(), &mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("--help"));
    }
}
