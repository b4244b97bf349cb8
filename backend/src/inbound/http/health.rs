//! Liveness probe.

use actix_web::{get, HttpResponse, Responder};
use serde_json::json;

/// Report process liveness.
#[utoipa::path(
    get,
    path = "/healthz",
    responses((status = 200, description = "Service is running")),
    tags = ["health"],
    operation_id = "healthz"
)]
#[get("/healthz")]
pub async fn healthz() -> impl Responder {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}
