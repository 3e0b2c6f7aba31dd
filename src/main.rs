use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;

use voyage_api::{config::AppConfig, routes, state::AppState};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    }

    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = AppConfig::from_env();
    log::info!("Starting voyage-api in {} mode", config.environment);

    let state = AppState::from_config(&config)
        .await
        .map_err(|e| std::io::Error::other(format!("Failed to initialise storage: {}", e)))?;

    log::info!("Binding to {}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .app_data(web::Data::new(state.clone()))
            .configure(routes::config)
    })
    .bind((config.host.clone(), config.port))?
    .run()
    .await
}
