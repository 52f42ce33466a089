//! Smoke test binary for verifying the Gemini API key and model settings
//! This is a utility binary, not part of the main application

use gemini_gateway::config::Config;
use gemini_gateway::gemini::GeminiClient;
use gemini_gateway::services::generation::{GenerationRequest, GenerativeModel};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    let config = Config::from_env();

    println!("Testing Gemini API access from Rust...\n");

    // Test 1: Check if API key is available
    println!("1. Checking for GEMINI_API_KEY environment variable...");
    if config.gemini.api_key.is_empty() {
        eprintln!("   ✗ GEMINI_API_KEY not found in environment");
        eprintln!("   Make sure to export it: export GEMINI_API_KEY=\"your-key\"");
        eprintln!("   Or load from .env file");
        return Err("GEMINI_API_KEY not set".into());
    }
    println!(
        "   ✓ GEMINI_API_KEY is set (length: {} chars)",
        config.gemini.api_key.len()
    );

    // Test 2: Send a prompt
    let prompt = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "What is 2+2? Answer in one sentence.".to_string());
    let client = GeminiClient::new(&config.gemini)?;
    println!("\n2. Executing test prompt against {}...", client.model());
    println!("   Prompt: '{}'", prompt);

    match client.generate(GenerationRequest::text(prompt)?).await {
        Ok(result) => {
            println!("   ✓ Response received:");
            println!("   {}", result.text.trim());
        }
        Err(e) => {
            eprintln!("   ✗ Generation failed: {}", e);
            eprintln!("\n   Troubleshooting:");
            eprintln!("   - Make sure GEMINI_API_KEY is set: echo $GEMINI_API_KEY");
            eprintln!("   - Check GEMINI_MODEL ({}) is available to your key", config.gemini.model);
            return Err(e.into());
        }
    }

    println!("\n✓ All tests completed!");
    Ok(())
}
