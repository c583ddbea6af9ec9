//! Algoviz Visualization Service
//!
//! Serves the animation engine over HTTP and streams its frames to browsers.
//!
//! # Architecture
//!
//! - **Broadcast**: Rendering port fanning frames out to every client
//! - **REST API**: Start runs, replace data, pause/resume/stop
//! - **WebSocket**: Streams frames and accepts run controls
//!
//! # Usage
//!
//! ```ignore
//! let server = VisServer::new(VisConfig::from_env()?)?;
//! server.serve(3000).await?;
//! ```

mod broadcast;
mod error;
mod server;

pub use broadcast::{BroadcastPort, FRAME_BUFFER};
pub use error::{ApiError, ErrorResponse, Result};
pub use server::VisServer;
