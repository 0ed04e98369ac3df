//! FoodSight: business assistant server for Alimentos del Valle.

use std::path::PathBuf;
use std::sync::Arc;

use foodsight_server::{build_router, AppState};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn resolve_data_dir() -> PathBuf {
    std::env::var("FOODSIGHT_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let exe_dir = std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()));
            if let Some(dir) = exe_dir {
                let parent_data = dir.join("../data");
                if parent_data.exists() {
                    return parent_data;
                }
            }
            PathBuf::from("data")
        })
}

fn print_usage() {
    println!("FoodSight — business assistant for Alimentos del Valle");
    println!();
    println!("Usage: foodsight [command]");
    println!();
    println!("Commands:");
    println!("  (none)                   Start the server");
    println!("  ask <question...>        Answer one question and exit");
    println!("  classify <question...>   Print the classification of a question");
    println!("  help                     Show this help message");
}

fn load_state() -> anyhow::Result<AppState> {
    let data_dir = resolve_data_dir();
    info!("Data directory: {}", data_dir.display());
    let config = foodsight_core::FoodSightConfig::from_env(&data_dir)?;
    AppState::new(config).map_err(|e| anyhow::anyhow!("Failed to initialize: {}", e))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 {
        let question = args[2..].join(" ");
        match args[1].as_str() {
            "ask" => {
                if question.trim().is_empty() {
                    eprintln!("Usage: foodsight ask <question...>");
                    std::process::exit(1);
                }
                let state = load_state()?;
                println!("{}", state.engine.answer_text(&question).await);
                return Ok(());
            }
            "classify" => {
                let state = load_state()?;
                let classification = state.engine.classify(&question);
                println!("{}", serde_json::to_string_pretty(&classification)?);
                return Ok(());
            }
            "--help" | "-h" | "help" => {
                print_usage();
                return Ok(());
            }
            _ => {
                eprintln!("Unknown command: {}. Use 'foodsight help' for usage.", args[1]);
                std::process::exit(1);
            }
        }
    }

    let state = Arc::new(load_state()?);
    let port = state.config.port;
    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("FoodSight server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
