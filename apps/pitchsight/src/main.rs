use clap::Parser;
use pitchsight::headless::{run_headless, HeadlessArgs};
use pitchsight::{logging, TuiOpts};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "pitchsight")]
#[command(about = "Pitch prediction TUI + optional headless runner.", version)]
struct Cli {
    /// Run one prediction without the TUI and print JSON to stdout.
    #[arg(long)]
    headless: bool,

    /// Config file path (TOML). If omitted, uses env PITCHSIGHT_CONFIG.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Inning, 1-20 (headless only).
    #[arg(long, default_value = "1")]
    inning: String,

    /// Balls in the count, 0-3 (headless only).
    #[arg(long, default_value = "0")]
    balls: String,

    /// Strikes in the count, 0-2 (headless only).
    #[arg(long, default_value = "0")]
    strikes: String,

    /// Outs when the batter is up, 0-2 (headless only).
    #[arg(long, default_value = "0")]
    outs: String,

    /// Batting team score (headless only).
    #[arg(long, default_value = "0")]
    bat_score: String,

    /// Fielding team score (headless only).
    #[arg(long, default_value = "0")]
    field_score: String,

    /// Batter handedness, L or R (headless only).
    #[arg(long, default_value = "L")]
    stand: String,
}

fn main() {
    let cli = Cli::parse();

    let log_store = Arc::new(parking_lot::Mutex::new(logging::LogStore::new(5000)));
    if let Err(err) = init_tracing(log_store.clone(), cli.headless) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
    if let Err(err) = init_metrics() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }

    let config_path = cli.config.or_else(|| {
        std::env::var("PITCHSIGHT_CONFIG")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
    });

    if cli.headless {
        let Some(config_path) = config_path else {
            eprintln!("error: missing --config and env PITCHSIGHT_CONFIG is not set");
            std::process::exit(1);
        };

        let result = run_headless(HeadlessArgs {
            config_path,
            inning: cli.inning,
            balls: cli.balls,
            strikes: cli.strikes,
            outs: cli.outs,
            batting_score: cli.bat_score,
            fielding_score: cli.field_score,
            stand: cli.stand,
        });

        match result {
            Ok(json) => {
                println!(
                    "{}",
                    serde_json::to_string(&json)
                        .unwrap_or_else(|_| "{\"status\":\"error\",\"error\":\"json\"}".to_string())
                );
                std::process::exit(0);
            }
            Err(err) => {
                eprintln!("error: {err}");
                std::process::exit(1);
            }
        }
    }

    let opts = TuiOpts {
        initial_config_path: config_path,
        log_store,
    };

    if let Err(err) = pitchsight::run(opts) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(
    log_store: Arc<parking_lot::Mutex<logging::LogStore>>,
    headless: bool,
) -> Result<(), String> {
    let filter = std::env::var("PITCHSIGHT_LOG").unwrap_or_else(|_| "info".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_new(filter)
        .map_err(|err| format!("invalid log filter: {err}"))?;

    // Headless runs print JSON to stdout, so logs go to stderr instead of
    // the in-memory pane.
    if headless {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(logging::LogMakeWriter::new(log_store))
            .init();
    }

    Ok(())
}

#[cfg(feature = "prometheus")]
fn init_metrics() -> Result<Option<SocketAddr>, String> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let Some(raw) = std::env::var("PITCHSIGHT_METRICS_ADDR").ok() else {
        return Ok(None);
    };
    if raw.trim().is_empty() {
        return Ok(None);
    }

    let addr: SocketAddr = raw
        .parse()
        .map_err(|err| format!("invalid PITCHSIGHT_METRICS_ADDR (expected host:port): {err}"))?;

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|err| format!("failed to install prometheus exporter: {err}"))?;

    tracing::info!(metrics_addr = %addr, "prometheus metrics exporter enabled");
    Ok(Some(addr))
}

#[cfg(not(feature = "prometheus"))]
fn init_metrics() -> Result<Option<SocketAddr>, String> {
    Ok(None)
}
