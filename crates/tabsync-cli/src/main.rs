//! Tabsync CLI
//!
//! Drives a simulated game server through the tablist sync layer: every
//! viewer gets an entry-API tablist, a rogue plugin keeps overwriting display
//! names, and the reconciler repairs them. A packet-interception pass shows
//! the outbound rewrite policies. The run ends with a report.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tabsync_core::SyncConfig;
use tracing_subscriber::EnvFilter;

mod sim;

/// Tabsync - keeps player list display names the way you set them
///
/// Simulate a server with a rogue plugin and report what got repaired.
#[derive(Parser, Debug)]
#[command(name = "tabsync")]
#[command(version, about, long_about = None)]
struct Args {
    /// Number of simulated players (each one is also a viewer)
    #[arg(short, long, default_value = "4", value_parser = clap::value_parser!(u16).range(2..))]
    players: u16,

    /// Number of rogue overrides, one per sweep period
    #[arg(short, long, default_value = "5")]
    ticks: u32,

    /// Output format: text or json
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// JSON configuration file
    #[arg(short, long, env = "TABSYNC_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn load_config(path: Option<&PathBuf>) -> tabsync_core::Result<SyncConfig> {
    match path {
        Some(path) => SyncConfig::load(path),
        None => Ok(SyncConfig::new()),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = Args::parse();

    let config = match load_config(args.config.as_ref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        "Simulating {} players for {} ticks (sweep every {:?})",
        args.players,
        args.ticks,
        config.reconcile_interval()
    );

    let options = sim::SimulationOptions {
        players: usize::from(args.players),
        ticks: args.ticks,
    };
    let report = match sim::run(&options, &config).await {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    match args.format {
        OutputFormat::Json => match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error: {e}");
                return ExitCode::FAILURE;
            }
        },
        OutputFormat::Text => print!("{report}"),
    }

    if report.drifted_rows == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["tabsync"]).unwrap();
        assert_eq!(args.players, 4);
        assert_eq!(args.ticks, 5);
        assert_eq!(args.format, OutputFormat::Text);
    }

    #[test]
    fn test_all_flags() {
        let args = Args::try_parse_from([
            "tabsync", "-p", "10", "-t", "3", "--format", "json", "-c", "sync.json",
        ])
        .unwrap();
        assert_eq!(args.players, 10);
        assert_eq!(args.ticks, 3);
        assert_eq!(args.format, OutputFormat::Json);
        assert_eq!(args.config, Some(PathBuf::from("sync.json")));
    }

    #[test]
    fn test_single_player_rejected() {
        assert!(Args::try_parse_from(["tabsync", "--players", "1"]).is_err());
    }

    #[test]
    fn test_unknown_format_rejected() {
        assert!(Args::try_parse_from(["tabsync", "--format", "yaml"]).is_err());
    }

    #[test]
    fn test_load_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"reconcile_interval_ms":20,"ping_spoof":{{"enabled":true,"value":3}}}}"#)
            .unwrap();

        let config = load_config(Some(&file.path().to_path_buf())).unwrap();
        assert_eq!(config.reconcile_interval_ms, 20);
        assert_eq!(config.spoofed_latency(), Some(3));
    }

    #[test]
    fn test_load_invalid_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"reconcile_interval_ms":0}}"#).unwrap();
        assert!(load_config(Some(&file.path().to_path_buf())).is_err());
    }

    #[test]
    fn test_no_config_uses_defaults() {
        assert_eq!(load_config(None).unwrap(), SyncConfig::new());
    }
}
