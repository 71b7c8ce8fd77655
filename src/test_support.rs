use actix_web::{http::StatusCode, web, App, HttpResponse, HttpServer};
use serde_json::{json, Value};

/// Behaviour of the fake generation server.
#[derive(Clone)]
pub enum Upstream {
    /// 200 with `generated_text` = "echo: <prompt>".
    Echo,
    /// Fixed status and plain-text body; a non-200 status also fails `/health`
    /// with a JSON body.
    Status(u16, &'static str),
    /// 200 with the given JSON body.
    Reply(Value),
}

async fn generate(upstream: web::Data<Upstream>, payload: web::Json<Value>) -> HttpResponse {
    match upstream.get_ref() {
        Upstream::Echo => {
            let prompt = payload["prompt"].as_str().unwrap_or_default();
            HttpResponse::Ok().json(json!({
                "generated_text": format!("echo: {}", prompt),
                "max_new_tokens": payload["max_new_tokens"],
            }))
        }
        Upstream::Status(code, body) => {
            HttpResponse::build(StatusCode::from_u16(*code).unwrap()).body(*body)
        }
        Upstream::Reply(body) => HttpResponse::Ok().json(body),
    }
}

async fn health(upstream: web::Data<Upstream>) -> HttpResponse {
    match upstream.get_ref() {
        Upstream::Status(code, body) if *code != 200 => {
            HttpResponse::build(StatusCode::from_u16(*code).unwrap())
                .json(json!({ "status": body }))
        }
        _ => HttpResponse::Ok().json(json!({ "status": "ok", "model": "fake" })),
    }
}

/// Starts a fake generation server on an ephemeral port and returns its base URL.
/// Must be called from inside an actix runtime.
pub fn spawn_generation_server(upstream: Upstream) -> String {
    let server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(upstream.clone()))
            .route("/generate", web::post().to(generate))
            .route("/health", web::get().to(health))
    })
    .workers(1)
    .disable_signals()
    .bind(("127.0.0.1", 0))
    .expect("bind fake generation server");

    let addr = server.addrs()[0];
    actix_web::rt::spawn(server.run());
    format!("http://{}", addr)
}

/// A base URL nothing listens on.
pub fn unreachable_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind probe port");
    let addr = listener.local_addr().expect("probe port address");
    drop(listener);
    format!("http://{}", addr)
}
