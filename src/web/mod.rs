mod handlers;
mod state;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use tracing::info;
use tracing_actix_web::TracingLogger;

use crate::config::ExplorerConfig;
pub use state::{AppState, Session};

/// Register the JSON API routes.
pub(crate) fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/sessions", web::post().to(handlers::create_session))
        .route("/api/sessions/{id}", web::get().to(handlers::get_session))
        .route("/api/sessions/{id}/time", web::put().to(handlers::set_time))
        .route("/api/sessions/{id}/reset", web::post().to(handlers::reset_session))
        .route(
            "/api/sessions/{id}/scenarios",
            web::post().to(handlers::add_scenario),
        )
        .route(
            "/api/sessions/{id}/scenarios",
            web::delete().to(handlers::remove_last_scenario),
        )
        .route(
            "/api/sessions/{id}/scenarios/{name}",
            web::put().to(handlers::update_scenario),
        )
        .route(
            "/api/sessions/{id}/scenarios/{name}",
            web::delete().to(handlers::delete_scenario),
        )
        .route("/api/sessions/{id}/curves", web::get().to(handlers::curves))
        .route("/api/sessions/{id}/export", web::get().to(handlers::export))
        .route("/api/evaluate", web::post().to(handlers::evaluate));
}

pub async fn start_server(port: u16, config: ExplorerConfig) -> std::io::Result<()> {
    let data = web::Data::new(AppState::new(config));

    info!(port, "starting growth scenario API");
    println!("Starting Growth Scenario Explorer API on http://localhost:{port}");

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(Cors::permissive())
            .app_data(data.clone())
            .configure(routes)
    })
    .bind(("127.0.0.1", port))?
    .run()
    .await
}
