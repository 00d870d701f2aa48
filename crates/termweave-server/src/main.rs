//! Termweave — term coverage analysis and injection server.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use termweave_core::EngineConfig;
use termweave_server::{build_router, check_files, AppState};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn resolve_config_path() -> PathBuf {
    std::env::var("TERMWEAVE_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("termweave.json"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 {
        match args[1].as_str() {
            "check" => {
                if args.len() < 4 {
                    eprintln!("Usage: termweave check <file.html> <terms.json>");
                    std::process::exit(1);
                }
                let analysis = check_files(Path::new(&args[2]), Path::new(&args[3]))?;
                println!("{}", serde_json::to_string_pretty(&analysis)?);
                return Ok(());
            }
            "--help" | "-h" | "help" => {
                println!("Termweave — term coverage analysis and injection");
                println!();
                println!("Usage: termweave [command]");
                println!();
                println!("Commands:");
                println!("  (none)                        Start the server");
                println!("  check <file.html> <terms.json> Print coverage analysis as JSON");
                println!("  help                          Show this help message");
                return Ok(());
            }
            _ => {
                eprintln!("Unknown command: {}. Use 'termweave help' for usage.", args[1]);
                std::process::exit(1);
            }
        }
    }

    let config_path = resolve_config_path();
    info!("Config file: {}", config_path.display());

    let config = EngineConfig::load(&config_path);
    config.validate()?;
    let port = config.port;

    let state = Arc::new(AppState::new(config));
    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Termweave server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
