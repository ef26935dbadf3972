//! Dytty CLI - layered ytt rendering per application and environment

use clap::{Args, Parser, Subcommand};
use dytty_core::Kind;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod commands;
mod error;
mod exit_codes;

use commands::GlobalOptions;

#[derive(Parser)]
#[command(name = "dytty")]
#[command(version)]
#[command(
    about = "Resolve layered ytt values and templates per application and environment",
    long_about = None
)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (default: .dytty.yaml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Root directory of the layout
    #[arg(short, long, global = true)]
    base_path: Option<PathBuf>,

    /// Pin the image tag of apps applications
    #[arg(short = 't', long, global = true)]
    image_tag: Option<String>,

    /// Path to the ytt executable
    #[arg(long, global = true)]
    ytt: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,
}

/// Which application to resolve, and where
#[derive(Args)]
struct Target {
    /// Application kind (apps, lambda, infra)
    #[arg(value_parser = parse_kind)]
    kind: Kind,

    /// Application name
    app: String,

    /// Environment name or alias (dev, int, prd, ...)
    env: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Render manifests for an application
    Render {
        #[command(flatten)]
        target: Target,

        /// Write manifests to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the effective data values
    Values {
        #[command(flatten)]
        target: Target,
    },

    /// List every file taking part in a render
    Files {
        #[command(flatten)]
        target: Target,
    },
}

fn parse_kind(s: &str) -> Result<Kind, String> {
    s.parse().map_err(|e: dytty_core::CoreError| e.to_string())
}

fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    // A subscriber may already be installed
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr).with_target(false))
        .with(filter)
        .try_init();
}

fn main() -> ExitCode {
    miette::set_panic_hook();

    let cli = Cli::parse();
    init_logging(cli.debug);

    let global = GlobalOptions {
        config: cli.config,
        base_path: cli.base_path,
        image_tag: cli.image_tag,
        ytt: cli.ytt,
    };

    let result = match cli.command {
        Commands::Render { target, output } => commands::render::run(
            &global,
            target.kind,
            &target.app,
            &target.env,
            output.as_deref(),
        ),
        Commands::Values { target } => {
            commands::values::run(&global, target.kind, &target.app, &target.env)
        }
        Commands::Files { target } => {
            commands::files::run(&global, target.kind, &target.app, &target.env)
        }
    };

    match result {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS),
        Err(err) => {
            let code = err.exit_code();
            eprintln!("{:?}", miette::Report::new(err));
            ExitCode::from(code)
        }
    }
}
