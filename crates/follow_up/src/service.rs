use std::sync::Arc;

use futures_util::{TryStreamExt, pin_mut};
use listmonk::*;
use log::{error, info};
use uuid::Uuid;

use crate::unopened::UnopenedSubscribers;

/// Tag placed on every list and campaign this workflow creates
pub const FOLLOW_UP_TAG: &str = "follow-up";

/// Subscribers requested per search page
pub const DEFAULT_PAGE_SIZE: u32 = 1000;

/// Tunables for a follow-up run
#[derive(Debug, Clone)]
pub struct FollowUpConfig {
    /// Subscribers requested per search page (default: 1000)
    pub page_size: u32,

    /// Tag marking created lists and campaigns (default: "follow-up")
    pub marker_tag: String,
}

impl Default for FollowUpConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            marker_tag: FOLLOW_UP_TAG.to_string(),
        }
    }
}

/// How a successful run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Everyone opened the campaign; no follow-up was created
    NoRecipients {
        /// Source campaign
        campaign_id: u64,
        /// The empty list created for the run
        list_id: u64,
        /// Whether the empty list was removed; cleanup is best-effort
        list_deleted: bool,
    },
    /// A follow-up campaign now targets the non-openers
    FollowUpCreated {
        /// Source campaign
        campaign_id: u64,
        /// List holding the non-openers
        list_id: u64,
        /// The new campaign, left unsent
        follow_up_campaign_id: u64,
        /// Subscribers attached to the list
        subscribers: usize,
    },
}

/// `<name>:<id> - follow-up-list`
pub fn follow_up_list_name(campaign: &Campaign) -> String {
    format!("{}:{} - follow-up-list", campaign.name, campaign.id)
}

/// Description stored on the follow-up list
pub fn follow_up_list_description(campaign: &Campaign) -> String {
    format!(
        "This is a follow-up list for the campaign: {} - follow-up-list",
        campaign.name
    )
}

/// `<name> - follow-up`
pub fn follow_up_campaign_name(campaign: &Campaign) -> String {
    format!("{} - follow-up", campaign.name)
}

/// Re-targets subscribers who did not open a campaign.
///
/// Runs are not coordinated: two concurrent runs for the same campaign each
/// create their own list and campaign. Membership updates are not rolled back
/// when a later step fails.
pub struct FollowUpService {
    api: Arc<dyn ListmonkApi>,
    config: FollowUpConfig,
}

impl FollowUpService {
    /// Creates a new instance of `FollowUpService`
    pub fn new(api: Arc<dyn ListmonkApi>, config: Option<FollowUpConfig>) -> Self {
        Self {
            api,
            config: config.unwrap_or_default(),
        }
    }

    /// Runs the whole workflow for one campaign.
    ///
    /// Steps: health check, fetch campaign, create list, attach each page of
    /// non-openers, then either delete the empty list or create the follow-up
    /// campaign. The first failing step aborts the run.
    pub async fn run(&self, campaign_id: u64) -> Result<RunOutcome, ListmonkError> {
        let run_id = Uuid::new_v4();
        info!("[{}] Starting resend campaign process for campaign {}", run_id, campaign_id);

        self.api.health().await?;

        info!("[{}] Getting campaign with ID: {}...", run_id, campaign_id);
        let campaign = self.api.get_campaign(campaign_id).await?;
        info!("[{}] Fetched campaign: {} ({})", run_id, campaign.name, campaign.id);

        let list = self.create_follow_up_list(&campaign).await?;
        info!(
            "[{}] Created follow-up list: {} ({}) for campaign: {} ({})",
            run_id, list.name, list.id, campaign.name, campaign.id
        );

        let subscribers = self.attach_unopened(run_id, &campaign, list.id).await?;

        if subscribers == 0 {
            info!(
                "[{}] No subscribers to resend campaign {} ({}) to.",
                run_id, campaign.name, campaign.id
            );
            let list_deleted = match self.api.delete_list(list.id).await {
                Ok(()) => true,
                Err(e) => {
                    error!(
                        "[{}] Failed to delete empty follow-up list {}: {}",
                        run_id, list.id, e
                    );
                    false
                }
            };
            return Ok(RunOutcome::NoRecipients {
                campaign_id: campaign.id,
                list_id: list.id,
                list_deleted,
            });
        }

        info!(
            "[{}] Creating follow-up campaign for campaign: {} ({})...",
            run_id, campaign.name, campaign.id
        );
        let follow_up = self
            .api
            .create_campaign(&self.follow_up_campaign_request(&campaign, list.id))
            .await?;
        info!(
            "[{}] Created follow-up campaign: {} ({}) for {} subscribers",
            run_id, follow_up.name, follow_up.id, subscribers
        );

        Ok(RunOutcome::FollowUpCreated {
            campaign_id: campaign.id,
            list_id: list.id,
            follow_up_campaign_id: follow_up.id,
            subscribers,
        })
    }

    async fn create_follow_up_list(&self, campaign: &Campaign) -> Result<MailingList, ListmonkError> {
        let request = CreateListRequest {
            name: follow_up_list_name(campaign),
            list_type: ListType::Private,
            optin: OptinType::Single,
            description: follow_up_list_description(campaign),
            tags: vec![self.config.marker_tag.clone()],
        };

        self.api.create_list(&request).await
    }

    /// Attaches every batch of non-openers to the list, returning the total
    async fn attach_unopened(
        &self,
        run_id: Uuid,
        campaign: &Campaign,
        list_id: u64,
    ) -> Result<usize, ListmonkError> {
        let batches = UnopenedSubscribers::new(
            self.api.as_ref(),
            campaign.id,
            campaign.list_ids(),
            self.config.page_size,
        )
        .into_stream();
        pin_mut!(batches);

        let mut total = 0;
        while let Some(ids) = batches.try_next().await? {
            let batch_size = ids.len();
            let request = ListMembershipRequest {
                ids,
                action: MembershipAction::Add,
                target_list_ids: vec![list_id],
                status: SubscriptionStatus::Confirmed,
            };

            if let Err(e) = self.api.update_list_memberships(&request).await {
                error!(
                    "[{}] Failed to add batch to follow-up list {} after {} subscribers: {}",
                    run_id, list_id, total, e
                );
                return Err(e);
            }

            total += batch_size;
            info!(
                "[{}] Added batch of {} subscribers to follow-up list (total: {}) for campaign: {} ({})...",
                run_id, batch_size, total, campaign.name, campaign.id
            );
        }

        Ok(total)
    }

    fn follow_up_campaign_request(&self, campaign: &Campaign, list_id: u64) -> CreateCampaignRequest {
        CreateCampaignRequest {
            name: follow_up_campaign_name(campaign),
            subject: campaign.subject.clone(),
            lists: vec![list_id],
            from_email: Some(campaign.from_email.clone()).filter(|from| !from.is_empty()),
            campaign_type: campaign.campaign_type,
            content_type: campaign.content_type,
            body: campaign.body.clone(),
            body_source: campaign.body_source.clone(),
            altbody: campaign.altbody.clone(),
            messenger: campaign.messenger.clone(),
            template_id: campaign.template_id,
            tags: vec![self.config.marker_tag.clone()],
            headers: Some(campaign.headers.clone()).filter(|headers| !headers.is_empty()),
        }
    }
}
