pub mod commands;
pub mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use landscape_core::config::{AppConfig, LoadOptions};

#[derive(Debug, Parser)]
#[command(
    name = "landscape",
    about = "Ballpark landscaping estimator",
    long_about = "Turn short job descriptions into itemized ballpark estimates for mowing, mulch, sod and gravel.",
    after_help = "Examples:\n  landscape estimate Mulch 900 sq ft at 3 inches\n  landscape estimate \"Sod 1,200 sq ft remove old turf\" --set sodPerSqFt=0.72\n  landscape services\n  landscape config"
)]
pub struct Cli {
    #[arg(long, global = true, value_name = "PATH", help = "Read configuration from this file")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Estimate a job described in plain text")]
    Estimate {
        #[arg(
            required = true,
            num_args = 1..,
            help = "Job description, e.g. `Gravel 800 sq ft 2 inches`"
        )]
        text: Vec<String>,
        #[arg(
            long = "set",
            value_name = "KEY=VALUE",
            help = "Override one pricing field for this estimate"
        )]
        set: Vec<String>,
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "List estimable services in routing priority order")]
    Services {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    // Logging follows the loaded config; a broken config is reported by the
    // command itself.
    let logging =
        AppConfig::load(LoadOptions { config_path: cli.config.clone(), ..LoadOptions::default() })
            .map(|config| config.logging)
            .unwrap_or_else(|_| AppConfig::default().logging);
    if let Err(error) = logging::init(&logging) {
        eprintln!("logging disabled: {error}");
    }

    let result = match cli.command {
        Command::Estimate { text, set, json } => {
            commands::estimate::run(commands::estimate::EstimateArgs {
                text: text.join(" "),
                set,
                json,
                config_path: cli.config,
            })
        }
        Command::Services { json } => commands::services::run(json),
        Command::Config => commands::CommandResult {
            exit_code: 0,
            output: commands::config::run(cli.config.as_deref()),
        },
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
