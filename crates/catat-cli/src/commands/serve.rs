//! Server command implementation

use anyhow::Result;

use catat_core::{AIBackend, Interpreter};
use catat_server::{ServerConfig, ALLOWED_ORIGINS_ENV};

pub async fn cmd_serve(interpreter: Interpreter, host: &str, port: u16) -> Result<()> {
    let config = ServerConfig::from_env();

    println!("🚀 Starting Catat web server...");
    println!("   Listening: http://{}:{}", host, port);
    match interpreter.client() {
        Some(client) => println!("   AI backend: {} ({})", client.kind(), client.model()),
        None => println!("   ⚠️  AI backend not configured - parsing will return 503"),
    }

    if config.allowed_origins.is_empty() {
        println!("   CORS: same-origin only (set {} to allow others)", ALLOWED_ORIGINS_ENV);
    } else {
        println!("   CORS origins: {}", config.allowed_origins.join(", "));
    }
    println!();

    catat_server::serve_with_config(interpreter, host, port, config).await
}
