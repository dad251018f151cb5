// HTTP handler for the simulation endpoint
//
// The handler only adapts the transport: it reads and parses the body, hands
// the request to the Simulator, and turns every failure into a 400 carrying
// the error text. Nothing here can take the server down.

use log::{debug, warn};
use rocket::data::{Data, ToByteUnit};
use rocket::post;
use rocket::response::status::BadRequest;
use rocket::serde::json::Json;
use rocket::State;

use crate::config::ServerConfig;
use crate::simulator::Simulator;
use crate::types::{Board, SimulateRequest};

/// POST /simulate endpoint
/// Advances the posted board by one turn and returns the resulting board
#[post("/simulate", data = "<body>")]
pub async fn simulate(
    simulator: &State<Simulator>,
    server: &State<ServerConfig>,
    body: Data<'_>,
) -> Result<Json<Board>, BadRequest<String>> {
    let limit = server.body_limit_bytes as u64;
    let body = body.open(limit.bytes()).into_string().await.map_err(|e| {
        warn!("Failed to read request body: {}", e);
        BadRequest(format!("Failed to read request body: {}", e))
    })?;

    if !body.is_complete() {
        warn!("Request body exceeds {} bytes", limit);
        return Err(BadRequest(format!("Request body exceeds {} bytes", limit)));
    }
    let body = body.into_inner();

    debug!("Request received {}", body);

    let request: SimulateRequest = serde_json::from_str(&body).map_err(|e| {
        warn!("Failed to parse simulate request: {}", e);
        BadRequest(e.to_string())
    })?;

    simulator
        .simulate(&request)
        .map(Json)
        .map_err(|failure| BadRequest(failure.to_string()))
}
