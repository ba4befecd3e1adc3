//! Status command implementation

use anyhow::Result;

use catat_core::prompts::default_prompts_dir;
use catat_core::{AIBackend, Interpreter};

pub async fn cmd_status(interpreter: &Interpreter) -> Result<()> {
    println!();
    println!("📊 Catat Status");
    println!("   ─────────────────────────────────────────────────────────────");

    match interpreter.client() {
        Some(client) => {
            println!("   Backend: {}", client.kind());
            println!("   Host: {}", client.host());
            println!("   Model: {}", client.model());

            if client.health_check().await {
                println!("   ✅ Connected");
            } else {
                println!("   ❌ Not responding");
            }
        }
        None => {
            println!("   ❌ Backend: not configured");
            println!();
            println!("   Set one of:");
            println!("     GEMINI_API_KEY=...                  (default backend)");
            println!("     AI_BACKEND=ollama OLLAMA_HOST=http://localhost:11434");
            println!("     AI_BACKEND=openai_compatible OPENAI_COMPATIBLE_HOST=...");
            println!("     AI_BACKEND=mock                     (offline, for testing)");
        }
    }

    println!();
    println!(
        "   Prompt overrides: {}",
        default_prompts_dir()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(not available)".to_string())
    );
    println!();

    Ok(())
}
