use actix_web::web;
use crate::web::handlers;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/chat")
            .route(web::post().to(handlers::chat))
            .route(web::method(actix_web::http::Method::OPTIONS).to(handlers::preflight)),
    )
    .route("/health", web::get().to(handlers::health_check))
    .route("/health/upstream", web::get().to(handlers::upstream_health));
}
