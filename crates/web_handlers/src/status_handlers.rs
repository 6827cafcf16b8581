use actix_web::{HttpResponse, Result, web};
use listmonk::ListmonkSettings;
use serde::Serialize;

/// Diagnostic view of the service configuration
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceStatus {
    /// Always "working" while the server answers
    pub status: &'static str,
    /// Listmonk instance the service targets
    pub listmonk_url: String,
    /// Whether an API token is configured
    pub has_token: bool,
}

impl ServiceStatus {
    /// Snapshot of the given settings; the token itself is never exposed
    pub fn from_settings(settings: &ListmonkSettings) -> Self {
        Self {
            status: "working",
            listmonk_url: settings.base_url.clone(),
            has_token: settings.has_token(),
        }
    }
}

/// Reports which Listmonk instance is targeted and whether a token is set
pub async fn service_status(status: web::Data<ServiceStatus>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(status.get_ref()))
}
