//! REST API server example
//!
//! This example shows how to run guest-toolhub with the REST API enabled.
//!
//! After starting, you can:
//! - View Swagger UI at http://localhost:6789/swagger-ui
//! - Check a player via GET http://localhost:6789/api/check?check=checkbanned&id=<uid>
//! - Combine files via POST http://localhost:6789/api/combine
//! - Stream events via GET http://localhost:6789/events

use guest_toolhub::config::{ApiConfig, Config, ServerIntegrationConfig};
use guest_toolhub::{ToolHub, run_with_shutdown};
use std::net::SocketAddr;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing (optional)
    // Uncomment if you add tracing-subscriber to your dependencies:
    // tracing_subscriber::fmt::init();

    // Configure API
    let api_config = ApiConfig {
        bind_address: "127.0.0.1:6789".parse::<SocketAddr>()?,
        cors_enabled: true,
        cors_origins: vec!["*".to_string()],
        swagger_ui: true,
        ..Default::default()
    };

    let config = Config {
        server: ServerIntegrationConfig { api: api_config },
        ..Default::default()
    };

    let hub = Arc::new(ToolHub::new(config)?);

    println!("🚀 Starting guest-toolhub REST API server");
    println!("📖 Swagger UI: http://localhost:6789/swagger-ui");
    println!("🔄 Events stream: http://localhost:6789/events");
    println!();
    println!("Example commands:");
    println!("  # Check ban status");
    println!("  curl 'http://localhost:6789/api/check?check=checkbanned&id=123456789'");
    println!();
    println!("  # Combine guest files");
    println!("  curl -X POST http://localhost:6789/api/combine \\");
    println!("    -F files=@guest100.dat -F files=@guest101.dat -o combined_guest.json");
    println!();
    println!("  # Stream events (Server-Sent Events)");
    println!("  curl -N http://localhost:6789/events");

    let api_handle = hub.spawn_api_server();

    // Run until SIGTERM/SIGINT, then stop the server
    run_with_shutdown(&hub).await?;
    api_handle.abort();

    Ok(())
}
