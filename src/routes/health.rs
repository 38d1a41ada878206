use axum::response::IntoResponse;

/// GET /health - Liveness probe
/// Returns 200 "ok" while the process is alive, it does not touch SMTP
pub async fn health() -> impl IntoResponse {
    "ok"
}

/// GET / - Status line
pub async fn root() -> impl IntoResponse {
    "mailrelay: contact relay is running"
}
