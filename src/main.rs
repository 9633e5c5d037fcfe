use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser};
use tracing_subscriber::EnvFilter;

use kalk_nl::{Config, main_app_loop, translate};

#[derive(Parser, Debug)]
#[command(
    name = "kalk-nl",
    version,
    about = "Keypad calculator with a natural-language mode"
)]
struct Cli {
    /// Path to a TOML config file.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Override the delay before a phrase is translated.
    #[arg(long, value_name = "MS")]
    delay_ms: Option<u64>,

    /// Translate one phrase, print the result and exit.
    #[arg(long, value_name = "PHRASE")]
    translate: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

/// Logs go to stderr so the display on stdout stays readable.
/// `RUST_LOG` takes precedence over `-v`.
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,kalk_nl={}", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(delay_ms) = cli.delay_ms {
        config.translation_delay_ms = delay_ms;
    }
    tracing::debug!(?config, "configuration loaded");

    if let Some(phrase) = cli.translate {
        match translate(&phrase) {
            Ok(result) => println!("{}", result),
            Err(e) => {
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        }
        return Ok(());
    }

    main_app_loop(config).await
}
