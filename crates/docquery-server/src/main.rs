//! DocQuery — upload documents and ask questions about them.

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use docquery_chat::{create_model, LLMConfig};
use docquery_core::DocQueryConfig;
use docquery_server::{build_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();

    // Handle CLI subcommands
    if args.len() > 1 {
        match args[1].as_str() {
            "serve" => {}
            "--help" | "-h" | "help" => {
                println!("DocQuery — ask questions about your documents");
                println!();
                println!("Usage: docquery [command]");
                println!();
                println!("Commands:");
                println!("  (none) | serve    Start the server");
                println!("  help              Show this help message");
                println!();
                println!("Environment:");
                println!("  HOST, PORT                      Bind address (default 0.0.0.0:8000)");
                println!("  DOCQUERY_PREVIEW_CHARS          Upload preview length (default 8000)");
                println!("  DOCQUERY_MAX_UPLOAD_BYTES       Largest accepted upload");
                println!("  DOCQUERY_LLM_TIMEOUT_SECS       Model request timeout (default 60)");
                println!("  DOCQUERY_LLM_CONFIG             JSON file with provider settings");
                println!("  DOCQUERY_LLM_PROVIDER           auto | gemini | openai | anthropic | groq");
                println!("  GEMINI_API_KEY, OPENAI_API_KEY, ANTHROPIC_API_KEY, GROQ_API_KEY");
                return Ok(());
            }
            _ => {
                eprintln!("Unknown command: {}. Use 'docquery help' for usage.", args[1]);
                std::process::exit(1);
            }
        }
    }

    let config = DocQueryConfig::from_env()?;
    let llm_config = LLMConfig::load(config.llm_config_file.as_deref())?;
    let model = create_model(&llm_config, config.llm_timeout)?;

    let addr = config.bind_addr();
    let state = Arc::new(AppState::new(config, llm_config, model));
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("DocQuery server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
