//! ChatSphere server binary.
//!
//! Multi-room chat over WebSocket with SQLite history and an optional AI
//! assistant (set `OPENAI_API_KEY` to enable it).
//!
//! Run with:
//! ```not_rust
//! cargo run --bin server
//! cargo run --bin server -- --host 0.0.0.0 --port 3000 --db chat.db
//! ```

use std::sync::Arc;

use chatsphere::{
    common::logger::setup_logger,
    domain::Assistant,
    infrastructure::{assistant::OpenAiAssistant, store::SqliteMessageStore},
    server::{run_server, state::AppState},
};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "server")]
#[command(about = "Multi-room chat server with an AI assistant", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Path to the SQLite database holding chat history
    #[arg(long, default_value = "chat.db")]
    db: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    // A store that cannot be opened is a startup-time fatal error.
    let store = match SqliteMessageStore::open(&args.db) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            tracing::error!("Database connection error: {}", e);
            std::process::exit(1);
        }
    };
    tracing::info!("Chat history stored in '{}'", args.db);

    let assistant: Option<Arc<dyn Assistant>> = match OpenAiAssistant::from_env() {
        Some(assistant) => {
            tracing::info!(
                "AI assistant initialized with provided OPENAI_API_KEY (model '{}')",
                assistant.model()
            );
            Some(Arc::new(assistant))
        }
        None => {
            tracing::info!("No OPENAI_API_KEY found. AI commands will not function.");
            None
        }
    };

    let state = Arc::new(AppState::new(store, assistant));

    if let Err(e) = run_server(state, args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
