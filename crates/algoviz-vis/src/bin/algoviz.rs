//! Algoviz Server
//!
//! Serve the algorithm animation engine to a browser frontend.

use std::env;

use algoviz_core::VisConfig;
use algoviz_vis::VisServer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "algoviz=info,algoviz_core=info,algoviz_vis=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse command line args
    let port: u16 = env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(3000);

    let config = VisConfig::from_env()?;
    tracing::info!(
        sequence_len = config.sequence_len,
        step_delay_ms = config.step_delay_ms,
        seed = ?config.seed,
        "Starting Algoviz"
    );

    println!("Algoviz");
    println!("=======");
    println!();
    println!("Serving on http://localhost:{}", port);
    println!("Stream frames from ws://localhost:{}/ws", port);
    println!();

    let server = VisServer::new(config)?;
    server.serve(port).await?;

    Ok(())
}
