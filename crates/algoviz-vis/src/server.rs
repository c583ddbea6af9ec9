//! Axum web server with WebSocket frame streaming and run controls.

use std::sync::Arc;

use algoviz_core::{
    Complexity, ControlStatus, Family, Graph, RunController, RunKind, RunRequest, SearchKind,
    SortKind, TraversalKind, VisConfig, Visualizer,
};
use axum::{
    extract::{
        rejection::JsonRejection,
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast::error::RecvError, Mutex, OwnedMutexGuard};
use tower_http::cors::CorsLayer;
use tracing::{debug, info, warn};

use crate::broadcast::BroadcastPort;
use crate::error::{ApiError, Result};

/// Shared application state.
pub struct AppState {
    visualizer: Arc<Mutex<Visualizer>>,
    control: Arc<RunController>,
    port: Arc<BroadcastPort>,
    search_target: Option<i64>,
}

impl AppState {
    /// Take the session for a new run or data change. Whatever holds it now
    /// is superseded and gives it up at its next checkpoint.
    async fn acquire(&self) -> OwnedMutexGuard<Visualizer> {
        self.control.supersede();
        self.visualizer.clone().lock_owned().await
    }

    /// Stop the session. Resets visuals here when idle; a live run resets
    /// them itself once it sees the stop.
    fn stop(&self) -> ControlStatus {
        self.control.stop();
        if let Ok(mut vis) = self.visualizer.try_lock() {
            vis.stop();
        }
        self.control.status()
    }
}

/// Visualization server.
pub struct VisServer {
    state: Arc<AppState>,
}

impl VisServer {
    /// Create a server around a fresh session.
    pub fn new(config: VisConfig) -> algoviz_core::Result<Self> {
        let search_target = config.search_target;
        let port = Arc::new(BroadcastPort::new());
        let visualizer = Visualizer::new(config, port.clone())?;
        let control = visualizer.control();

        Ok(Self {
            state: Arc::new(AppState {
                visualizer: Arc::new(Mutex::new(visualizer)),
                control,
                port,
                search_target,
            }),
        })
    }

    /// Run controller shared with the session.
    pub fn control(&self) -> Arc<RunController> {
        self.state.control.clone()
    }

    /// The port every frame goes through.
    pub fn port(&self) -> Arc<BroadcastPort> {
        self.state.port.clone()
    }

    /// Build the router for the server.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/api/status", get(status_handler))
            .route("/api/frame", get(frame_handler))
            .route("/api/catalog", get(catalog_handler))
            // Runs
            .route("/api/run/sort", post(sort_handler))
            .route("/api/run/search", post(search_handler))
            .route("/api/run/traverse", post(traverse_handler))
            .route("/api/run/huffman", post(huffman_handler))
            .route("/api/run/knapsack", post(knapsack_handler))
            // Data
            .route("/api/graph", post(graph_handler))
            .route("/api/sequence", post(sequence_handler))
            .route("/api/category", post(category_handler))
            // Controls
            .route("/api/control/pause", post(pause_handler))
            .route("/api/control/resume", post(resume_handler))
            .route("/api/control/stop", post(stop_handler))
            .route("/api/control/speed", post(speed_handler))
            // WebSocket for frames
            .route("/ws", get(ws_handler))
            .layer(CorsLayer::permissive())
            .with_state(self.state.clone())
    }

    /// Run the server on the given port.
    pub async fn serve(self, port: u16) -> std::result::Result<(), std::io::Error> {
        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("Algoviz server running on http://localhost:{}", port);
        axum::serve(listener, self.router()).await
    }
}

#[derive(Debug, Serialize)]
struct RunAccepted {
    kind: RunKind,
    name: String,
    generation: u64,
}

/// Validate `request`, take the session, start the run and drive it in the
/// background.
///
/// The run is started before the response goes out, so a stop sent after
/// `202 Accepted` always reaches it.
async fn launch(state: &AppState, request: RunRequest) -> Result<(StatusCode, Json<RunAccepted>)> {
    if let Err(e) = request.check_input() {
        warn!(kind = %request.kind(), error = %e, "run rejected");
        return Err(e.into());
    }

    let mut vis = state.acquire().await;
    if matches!(request, RunRequest::Sort(_)) {
        vis.reset_sequence();
    }
    let ctx = vis.begin(&request)?;
    let kind = ctx.kind();
    let generation = ctx.token().generation();

    tokio::spawn(async move {
        if let Err(e) = vis.execute(ctx, request).await {
            if !e.is_cancelled() {
                warn!(%kind, error = %e, "run ended with error");
            }
        }
    });

    Ok((
        StatusCode::ACCEPTED,
        Json(RunAccepted {
            kind,
            name: kind.to_string(),
            generation,
        }),
    ))
}

/// Server status response.
#[derive(Serialize)]
struct StatusResponse {
    status: &'static str,
    run: ControlStatus,
    frames_sent: u64,
    subscribers: usize,
}

async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok",
        run: state.control.status(),
        frames_sent: state.port.frame_count(),
        subscribers: state.port.subscriber_count(),
    })
}

async fn frame_handler(State(state): State<Arc<AppState>>) -> Json<Option<algoviz_core::Frame>> {
    Json(state.port.latest())
}

#[derive(Serialize)]
struct CatalogEntry {
    kind: RunKind,
    family: Family,
    complexity: Complexity,
}

async fn catalog_handler() -> Json<Vec<CatalogEntry>> {
    Json(
        RunKind::ALL
            .iter()
            .map(|&kind| CatalogEntry {
                kind,
                family: kind.family(),
                complexity: kind.complexity(),
            })
            .collect(),
    )
}

#[derive(Deserialize)]
struct SortRequest {
    algorithm: SortKind,
}

async fn sort_handler(
    State(state): State<Arc<AppState>>,
    body: std::result::Result<Json<SortRequest>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(req) = body?;
    launch(&state, RunRequest::Sort(req.algorithm)).await
}

#[derive(Deserialize)]
struct SearchRequest {
    algorithm: SearchKind,
    #[serde(default)]
    target: Option<i64>,
}

async fn search_handler(
    State(state): State<Arc<AppState>>,
    body: std::result::Result<Json<SearchRequest>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(req) = body?;
    let target = req
        .target
        .or(state.search_target)
        .ok_or_else(|| ApiError::BadRequest("search target required".to_string()))?;
    launch(
        &state,
        RunRequest::Search {
            kind: req.algorithm,
            target,
        },
    )
    .await
}

#[derive(Deserialize)]
struct TraverseRequest {
    algorithm: TraversalKind,
    source: usize,
    destination: usize,
}

async fn traverse_handler(
    State(state): State<Arc<AppState>>,
    body: std::result::Result<Json<TraverseRequest>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(req) = body?;
    launch(
        &state,
        RunRequest::Traverse {
            kind: req.algorithm,
            source: req.source,
            destination: req.destination,
        },
    )
    .await
}

#[derive(Deserialize)]
struct HuffmanRequest {
    #[serde(default)]
    text: Option<String>,
}

async fn huffman_handler(
    State(state): State<Arc<AppState>>,
    body: std::result::Result<Json<HuffmanRequest>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(req) = body?;
    launch(&state, RunRequest::Huffman { text: req.text }).await
}

#[derive(Deserialize)]
struct KnapsackRequest {
    #[serde(default)]
    capacity: Option<f64>,
}

async fn knapsack_handler(
    State(state): State<Arc<AppState>>,
    body: std::result::Result<Json<KnapsackRequest>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(req) = body?;
    launch(
        &state,
        RunRequest::Knapsack {
            capacity: req.capacity,
        },
    )
    .await
}

async fn graph_handler(State(state): State<Arc<AppState>>) -> Json<Graph> {
    let mut vis = state.acquire().await;
    vis.generate_graph();
    Json(vis.graph().clone())
}

/// Explicit `values` win over `len`; neither draws fresh values.
#[derive(Deserialize)]
struct SequenceRequest {
    #[serde(default)]
    values: Option<Vec<f64>>,
    #[serde(default)]
    len: Option<usize>,
}

async fn sequence_handler(
    State(state): State<Arc<AppState>>,
    body: std::result::Result<Json<SequenceRequest>, JsonRejection>,
) -> Result<Json<Vec<f64>>> {
    let Json(req) = body?;
    let mut vis = state.acquire().await;
    match (req.values, req.len) {
        (Some(values), _) => vis.set_sequence(values)?,
        (None, Some(len)) => vis.set_sequence_len(len)?,
        (None, None) => vis.reset_sequence(),
    }
    Ok(Json(vis.sequence().to_vec()))
}

#[derive(Deserialize)]
struct CategoryRequest {
    family: Family,
}

async fn category_handler(
    State(state): State<Arc<AppState>>,
    body: std::result::Result<Json<CategoryRequest>, JsonRejection>,
) -> Result<Json<ControlStatus>> {
    let Json(req) = body?;
    let mut vis = state.acquire().await;
    vis.switch_family(req.family);
    debug!(family = ?req.family, "category switched");
    Ok(Json(state.control.status()))
}

async fn pause_handler(State(state): State<Arc<AppState>>) -> Json<ControlStatus> {
    state.control.pause();
    Json(state.control.status())
}

async fn resume_handler(State(state): State<Arc<AppState>>) -> Json<ControlStatus> {
    state.control.resume();
    Json(state.control.status())
}

async fn stop_handler(State(state): State<Arc<AppState>>) -> Json<ControlStatus> {
    Json(state.stop())
}

#[derive(Deserialize)]
struct SpeedRequest {
    step_delay_ms: u64,
}

async fn speed_handler(
    State(state): State<Arc<AppState>>,
    body: std::result::Result<Json<SpeedRequest>, JsonRejection>,
) -> Result<Json<ControlStatus>> {
    let Json(req) = body?;
    state.control.set_step_delay_ms(req.step_delay_ms);
    Ok(Json(state.control.status()))
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

async fn send_json<T: Serialize>(socket: &mut WebSocket, value: &T) -> bool {
    match serde_json::to_string(value) {
        Ok(json) => socket.send(Message::Text(json.into())).await.is_ok(),
        Err(e) => {
            warn!(error = %e, "failed to encode ws message");
            true
        }
    }
}

async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
    let mut frames = state.port.subscribe();
    debug!("ws client connected");

    // Catch the client up with what is on screen
    if let Some(frame) = state.port.latest() {
        if !send_json(&mut socket, &frame).await {
            return;
        }
    }
    if !send_json(&mut socket, &WsResponse::Status(state.control.status())).await {
        return;
    }

    loop {
        tokio::select! {
            frame = frames.recv() => match frame {
                Ok(frame) => {
                    if !send_json(&mut socket, &frame).await {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => debug!(skipped, "ws client lagging"),
                Err(RecvError::Closed) => break,
            },
            msg = socket.recv() => match msg {
                Some(Ok(Message::Text(text))) => {
                    match serde_json::from_str::<WsCommand>(&text) {
                        Ok(cmd) => {
                            let response = handle_ws_command(&state, cmd);
                            if !send_json(&mut socket, &response).await {
                                break;
                            }
                        }
                        Err(e) => debug!(error = %e, "ignoring ws message"),
                    }
                }
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
        }
    }
    debug!("ws client disconnected");
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WsCommand {
    GetStatus,
    Pause,
    Resume,
    Stop,
    SetSpeed { step_delay_ms: u64 },
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
enum WsResponse {
    Status(ControlStatus),
}

fn handle_ws_command(state: &AppState, cmd: WsCommand) -> WsResponse {
    let status = match cmd {
        WsCommand::GetStatus => state.control.status(),
        WsCommand::Pause => {
            state.control.pause();
            state.control.status()
        }
        WsCommand::Resume => {
            state.control.resume();
            state.control.status()
        }
        WsCommand::Stop => state.stop(),
        WsCommand::SetSpeed { step_delay_ms } => {
            state.control.set_step_delay_ms(step_delay_ms);
            state.control.status()
        }
    };
    WsResponse::Status(status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use algoviz_core::RunState;

    fn server() -> VisServer {
        VisServer::new(VisConfig {
            seed: Some(3),
            ..VisConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn router_builds() {
        let _router = server().router();
    }

    #[tokio::test]
    async fn ws_commands_drive_controller() {
        let server = server();
        let state = server.state.clone();
        state.control.start(RunKind::Bubble);

        let WsResponse::Status(status) = handle_ws_command(&state, WsCommand::Pause);
        assert_eq!(status.state, RunState::Paused);

        let WsResponse::Status(status) = handle_ws_command(&state, WsCommand::Resume);
        assert_eq!(status.state, RunState::Running);

        let WsResponse::Status(status) =
            handle_ws_command(&state, WsCommand::SetSpeed { step_delay_ms: 2 });
        assert_eq!(status.step_delay_ms, 10);

        let WsResponse::Status(status) = handle_ws_command(&state, WsCommand::Stop);
        assert_eq!(status.state, RunState::Stopped);
    }

    #[test]
    fn ws_command_json() {
        let cmd: WsCommand = serde_json::from_str(r#"{"type":"get_status"}"#).unwrap();
        assert!(matches!(cmd, WsCommand::GetStatus));

        let cmd: WsCommand =
            serde_json::from_str(r#"{"type":"set_speed","step_delay_ms":120}"#).unwrap();
        assert!(matches!(cmd, WsCommand::SetSpeed { step_delay_ms: 120 }));

        let json = serde_json::to_string(&WsResponse::Status(ControlStatus {
            state: RunState::Paused,
            generation: 4,
            active: Some(RunKind::Dfs),
            step_delay_ms: 250,
        }))
        .unwrap();
        assert!(json.contains(r#""type":"Status""#));
        assert!(json.contains(r#""state":"paused""#));
    }
}
