use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Envelope wrapping every Listmonk API response body
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    /// Payload of the response, absent on malformed replies
    pub data: Option<T>,
}

/// Delivery type of a campaign
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignType {
    /// Regular content campaign
    Regular,
    /// Double opt-in confirmation campaign
    Optin,
}

/// Format of a campaign body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// Rich text editor content
    Richtext,
    /// Raw HTML
    Html,
    /// Markdown source
    Markdown,
    /// Plain text
    Plain,
    /// Visual builder content
    Visual,
}

/// A list reference attached to a campaign
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignList {
    /// List identifier
    pub id: u64,
    /// List name
    pub name: String,
}

/// Custom e-mail header on a campaign, e.g. `{"X-Campaign": "spring"}`
pub type CampaignHeader = BTreeMap<String, String>;

/// A campaign as returned by `GET campaigns/{id}` and `POST campaigns`
#[derive(Debug, Clone, Deserialize)]
pub struct Campaign {
    /// Campaign identifier
    pub id: u64,
    /// Internal campaign name
    pub name: String,
    /// E-mail subject line
    pub subject: String,
    /// Sender address
    #[serde(default)]
    pub from_email: String,
    /// Lists the campaign was sent to
    #[serde(default)]
    pub lists: Vec<CampaignList>,
    /// Delivery type
    #[serde(rename = "type")]
    pub campaign_type: CampaignType,
    /// Body format
    pub content_type: ContentType,
    /// Rendered body
    #[serde(default)]
    pub body: String,
    /// Source of the body for visual campaigns
    #[serde(default)]
    pub body_source: Option<String>,
    /// Plain text alternative body
    #[serde(default)]
    pub altbody: Option<String>,
    /// Messenger used to deliver the campaign
    #[serde(default)]
    pub messenger: Option<String>,
    /// Template identifier
    #[serde(default)]
    pub template_id: Option<u64>,
    /// Campaign tags
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
    /// Custom headers
    #[serde(default, deserialize_with = "null_as_empty")]
    pub headers: Vec<CampaignHeader>,
}

impl Campaign {
    /// Identifiers of the lists the campaign targeted, in order
    pub fn list_ids(&self) -> Vec<u64> {
        self.lists.iter().map(|list| list.id).collect()
    }
}

/// A subscriber row from the search endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct Subscriber {
    /// Subscriber identifier
    pub id: u64,
}

/// One page of `GET subscribers`
#[derive(Debug, Clone, Deserialize)]
pub struct SubscriberPage {
    /// Subscribers on this page
    #[serde(default, deserialize_with = "null_as_empty")]
    pub results: Vec<Subscriber>,
    /// Query echoed back by the server
    #[serde(default)]
    pub query: String,
    /// Total number of matching subscribers
    #[serde(default)]
    pub total: u64,
    /// Page size used by the server
    #[serde(default)]
    pub per_page: u64,
    /// Page number, starting at 1
    #[serde(default)]
    pub page: u64,
}

/// A mailing list as returned by `POST lists`
#[derive(Debug, Clone, Deserialize)]
pub struct MailingList {
    /// List identifier
    pub id: u64,
    /// List name
    pub name: String,
}

/// Parameters of a paged subscriber search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriberQuery {
    /// SQL expression evaluated against the subscribers table
    pub query: String,
    /// Page number, starting at 1
    pub page: u32,
    /// Page size
    pub per_page: u32,
    /// Restrict results to members of any of these lists
    pub list_ids: Vec<u64>,
}

impl SubscriberQuery {
    /// Query string pairs; each list id becomes its own `list_id` parameter
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("query", self.query.clone()),
            ("page", self.page.to_string()),
            ("per_page", self.per_page.to_string()),
        ];
        params.extend(self.list_ids.iter().map(|id| ("list_id", id.to_string())));
        params
    }
}

/// Visibility of a new list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ListType {
    /// Hidden from public subscription forms
    Private,
}

/// Opt-in mode of a new list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OptinType {
    /// Subscribers are added without confirmation
    Single,
}

/// Body of `POST lists`
#[derive(Debug, Clone, Serialize)]
pub struct CreateListRequest {
    /// List name
    pub name: String,
    /// Visibility
    #[serde(rename = "type")]
    pub list_type: ListType,
    /// Opt-in mode
    pub optin: OptinType,
    /// Description shown in the admin UI
    pub description: String,
    /// Tags
    pub tags: Vec<String>,
}

/// Membership change applied by `PUT subscribers/lists`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipAction {
    /// Add subscribers to the target lists
    Add,
}

/// Subscription status written by a membership change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    /// Subscription confirmed
    Confirmed,
}

/// Body of `PUT subscribers/lists`
#[derive(Debug, Clone, Serialize)]
pub struct ListMembershipRequest {
    /// Subscribers to update
    pub ids: Vec<u64>,
    /// Change to apply
    pub action: MembershipAction,
    /// Lists affected by the change
    pub target_list_ids: Vec<u64>,
    /// Resulting subscription status
    pub status: SubscriptionStatus,
}

/// Body of `POST campaigns`
#[derive(Debug, Clone, Serialize)]
pub struct CreateCampaignRequest {
    /// Internal campaign name
    pub name: String,
    /// E-mail subject line
    pub subject: String,
    /// Target list identifiers
    pub lists: Vec<u64>,
    /// Sender address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_email: Option<String>,
    /// Delivery type
    #[serde(rename = "type")]
    pub campaign_type: CampaignType,
    /// Body format
    pub content_type: ContentType,
    /// Rendered body
    pub body: String,
    /// Source of the body for visual campaigns
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_source: Option<String>,
    /// Plain text alternative body
    #[serde(skip_serializing_if = "Option::is_none")]
    pub altbody: Option<String>,
    /// Messenger used to deliver the campaign
    #[serde(skip_serializing_if = "Option::is_none")]
    pub messenger: Option<String>,
    /// Template identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<u64>,
    /// Tags
    pub tags: Vec<String>,
    /// Custom headers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<Vec<CampaignHeader>>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
