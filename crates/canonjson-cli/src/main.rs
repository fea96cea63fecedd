mod commands;

use canonjson_core::install_signal_handler;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use commands::{EXIT_FAILURE, EXIT_USAGE_ERROR};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "canonjson",
    version,
    about = "Deterministic in-place normalization of JSON catalog files"
)]
struct Cli {
    /// Path to a canonjson.toml config file (default: ./canonjson.toml if present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output results as structured JSON.
    #[arg(long, default_value_t = false, global = true)]
    json: bool,

    /// Enable verbose (debug) logging output.
    #[arg(short, long, default_value_t = false, global = true)]
    verbose: bool,

    /// Enable trace-level logging (more detailed than --verbose).
    #[arg(long, default_value_t = false, global = true)]
    trace: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Sort every array and rewrite files in place with 4-space indentation.
    Normalize {
        /// Glob patterns or file paths (default: configured patterns).
        inputs: Vec<String>,
        /// Also sort object keys lexicographically.
        #[arg(long, default_value_t = false)]
        sort_keys: bool,
    },
    /// Report files that are not canonical without modifying them.
    Check {
        /// Glob patterns or file paths (default: configured patterns).
        inputs: Vec<String>,
        /// Also sort object keys lexicographically.
        #[arg(long, default_value_t = false)]
        sort_keys: bool,
    },
    /// Generate shell completions for bash, zsh, fish, elvish, or powershell.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
    /// Generate man pages in the specified directory.
    ManPages {
        /// Output directory for man pages.
        #[arg(default_value = "man")]
        dir: PathBuf,
    },
}

fn main() -> ExitCode {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let msg = info.to_string();
        if msg.contains("Broken pipe")
            || msg.contains("broken pipe")
            || msg.contains("os error 32")
            || msg.contains("failed printing to stdout")
        {
            std::process::exit(0);
        }
        default_hook(info);
    }));

    let cli = Cli::parse();

    let default_level = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("CANONJSON_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    install_signal_handler();

    let json_output = cli.json;
    let config_path = cli.config.as_deref();

    let result = match cli.command {
        Commands::Normalize { inputs, sort_keys } => {
            commands::resolve_inputs(config_path, inputs, sort_keys).and_then(
                |(inputs, sort_keys)| commands::normalize::run(&inputs, sort_keys, json_output),
            )
        }
        Commands::Check { inputs, sort_keys } => {
            commands::resolve_inputs(config_path, inputs, sort_keys).and_then(
                |(inputs, sort_keys)| commands::check::run(&inputs, sort_keys, json_output),
            )
        }
        Commands::Completions { shell } => commands::completions::run::<Cli>(shell),
        Commands::ManPages { dir } => commands::man_pages::run::<Cli>(&dir),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(msg) => {
            eprintln!("error: {msg}");
            let code = if msg.starts_with("config:") || msg.starts_with("invalid glob pattern") {
                EXIT_USAGE_ERROR
            } else {
                EXIT_FAILURE
            };
            ExitCode::from(code)
        }
    }
}
