use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use mangovate::api::handlers::upload_error_pages;
use mangovate::api::{assets::static_file_handler, configure_routes, AppState};
use mangovate::{banner, config};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Print the startup banner
    banner::print_banner();

    if let Err(e) = dotenvy::dotenv() {
        eprintln!("ℹ️  No .env file loaded ({}), using process environment", e);
    }

    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let app_config = config::AppConfig::from_env().map_err(|e| {
        log::error!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    println!(
        "🥭 Classifier endpoint: {} (timeout {}ms)",
        app_config.classifier.endpoint_url, app_config.classifier.timeout_ms
    );

    let bind = (app_config.bind_host.clone(), app_config.port);
    let max_upload_bytes = app_config.max_upload_bytes;

    let state = AppState::new(app_config)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()))?;

    println!("🚀 Starting server...");
    println!("📊 Form available at http://{}:{}", bind.0, bind.1);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(web::PayloadConfig::new(max_upload_bytes))
            .wrap(upload_error_pages())
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .configure(configure_routes)
            .route("/{_:.*}", web::get().to(static_file_handler))
    })
    .bind(bind)?
    .run()
    .await
}
