use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use log::error;
use serde_json::json;

use crate::config::RelayConfig;
use crate::model::GenerationClient;
use crate::web::adapter::{handle_bytes, TriggerResponse, CORS_HEADERS};

fn into_http_response(response: TriggerResponse) -> HttpResponse {
    let status =
        StatusCode::from_u16(response.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut builder = HttpResponse::build(status);
    for (name, value) in response.headers {
        builder.insert_header((name, value));
    }
    builder.body(response.body)
}

// Chat API endpoint
pub async fn chat(config: web::Data<RelayConfig>, body: web::Bytes) -> HttpResponse {
    into_http_response(handle_bytes(&config, &body).await)
}

// CORS preflight for the chat endpoint
pub async fn preflight() -> HttpResponse {
    let mut builder = HttpResponse::Ok();
    for header in CORS_HEADERS {
        builder.insert_header(header);
    }
    builder.finish()
}

// Health check endpoint
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

// Liveness of the generation server behind us
pub async fn upstream_health(config: web::Data<RelayConfig>) -> HttpResponse {
    let client = GenerationClient::new(&config.api_url);
    match client.health_check().await {
        Ok(health) => HttpResponse::Ok().json(health),
        Err(e) => {
            error!("Upstream health check failed ({}): {}", e.kind(), e);
            into_http_response(TriggerResponse::failure(502, &e.to_string()))
        }
    }
}
