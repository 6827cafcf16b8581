use actix_web::{HttpResponse, Result, http::StatusCode, web};
use follow_up::{FollowUpService, RunOutcome};
use listmonk::ListmonkError;

/// Failure of a triggered run; the cause is logged, never sent to the caller
#[derive(thiserror::Error, Debug)]
#[error("Error in resend cron job: {0}")]
pub struct RunError(#[from] pub ListmonkError);

impl actix_web::ResponseError for RunError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::InternalServerError().body("Error in resend cron job.")
    }
}

/// Runs the follow-up workflow for the campaign in the path
pub async fn run_follow_up(
    service: web::Data<FollowUpService>,
    path: web::Path<u64>,
) -> Result<HttpResponse, RunError> {
    let campaign_id = path.into_inner();

    match service.run(campaign_id).await {
        Ok(RunOutcome::FollowUpCreated {
            follow_up_campaign_id,
            subscribers,
            ..
        }) => {
            log::info!(
                "✓ Successfully created follow-up campaign {} for {} subscribers (campaign {})",
                follow_up_campaign_id,
                subscribers,
                campaign_id
            );
        }
        Ok(RunOutcome::NoRecipients {
            list_id,
            list_deleted,
            ..
        }) => {
            log::info!("Every subscriber opened campaign {}", campaign_id);
            if !list_deleted {
                log::warn!("Empty follow-up list {} was left behind", list_id);
            }
        }
        Err(e) => {
            log::error!("Error in resend cron job for campaign {}: {}", campaign_id, e);
            return Err(e.into());
        }
    }

    Ok(HttpResponse::Ok().body("Resend cron job completed successfully."))
}
