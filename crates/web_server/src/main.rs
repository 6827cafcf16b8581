//! Main entry point for the follow-up service.
//! Exposes the endpoint that re-targets subscribers who did not open a campaign.

use std::sync::Arc;

use actix_web::{App, HttpServer, middleware::Logger, web};
use follow_up::FollowUpService;
use listmonk::{ListmonkClient, ListmonkSettings};
use web_handlers::*;

mod settings;
use settings::ServerSettings;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    log::info!("🚀 Starting follow-up service...");

    let listmonk_settings = ListmonkSettings::from_env()?;
    let server_settings = ServerSettings::from_env()?;

    if !listmonk_settings.has_token() {
        log::warn!("🔧 LISTMONK_AUTH_TOKEN is not set, Listmonk will reject requests");
    }

    let client = ListmonkClient::new(&listmonk_settings)?;
    let follow_up_service = web::Data::new(FollowUpService::new(Arc::new(client), None));
    let status = web::Data::new(ServiceStatus::from_settings(&listmonk_settings));

    log::info!("📬 Targeting Listmonk at: {}", listmonk_settings.base_url);
    log::info!(
        "🌐 Server will be available at: http://{}:{}",
        server_settings.bind_address,
        server_settings.port
    );

    HttpServer::new(move || {
        App::new()
            .app_data(follow_up_service.clone())
            .app_data(status.clone())
            .wrap(Logger::default())
            .route("/", web::get().to(service_status))
            .route("/run/{campaign_id}", web::post().to(run_follow_up))
    })
    .bind((server_settings.bind_address.as_str(), server_settings.port))?
    .run()
    .await?;

    Ok(())
}
