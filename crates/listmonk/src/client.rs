use async_trait::async_trait;
use log::debug;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::settings::ListmonkSettings;
use crate::types::*;
use crate::ListmonkError;

/// Remote operations the follow-up workflow needs from Listmonk
#[async_trait]
pub trait ListmonkApi: Send + Sync {
    /// Checks that the API is reachable and the credentials are accepted
    async fn health(&self) -> Result<(), ListmonkError>;

    /// Fetches a campaign by id
    async fn get_campaign(&self, campaign_id: u64) -> Result<Campaign, ListmonkError>;

    /// Fetches one page of subscribers matching a query
    async fn search_subscribers(
        &self,
        query: &SubscriberQuery,
    ) -> Result<SubscriberPage, ListmonkError>;

    /// Creates a new list
    async fn create_list(&self, request: &CreateListRequest) -> Result<MailingList, ListmonkError>;

    /// Adds subscribers to lists in bulk
    async fn update_list_memberships(
        &self,
        request: &ListMembershipRequest,
    ) -> Result<(), ListmonkError>;

    /// Creates a new campaign
    async fn create_campaign(
        &self,
        request: &CreateCampaignRequest,
    ) -> Result<Campaign, ListmonkError>;

    /// Deletes a list
    async fn delete_list(&self, list_id: u64) -> Result<(), ListmonkError>;
}

/// reqwest-backed client for the Listmonk REST API
pub struct ListmonkClient {
    client: Client,
    api_url: String,
    username: String,
    token: Option<String>,
}

impl ListmonkClient {
    /// Create a new Listmonk API client
    pub fn new(settings: &ListmonkSettings) -> Result<Self, ListmonkError> {
        let mut builder = Client::builder();
        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| ListmonkError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_url: settings.api_url(),
            username: settings.username.clone(),
            token: settings.token.clone(),
        })
    }

    fn request(&self, method: reqwest::Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.api_url, path))
            .basic_auth(&self.username, self.token.as_deref())
            .header(reqwest::header::CONTENT_TYPE, "application/json")
    }

    async fn send(
        &self,
        request: RequestBuilder,
        operation: &'static str,
    ) -> Result<Response, ListmonkError> {
        let response = request
            .send()
            .await
            .map_err(|source| ListmonkError::Network { operation, source })?;

        debug!("Listmonk response while {}: {}", operation, response.status());

        if !response.status().is_success() {
            return Err(ListmonkError::status(operation, response.status()));
        }

        Ok(response)
    }

    async fn read_data<T: DeserializeOwned>(
        response: Response,
        api: &'static str,
    ) -> Result<T, ListmonkError> {
        let body: ApiResponse<T> = response
            .json()
            .await
            .map_err(|_| ListmonkError::MalformedResponse(api))?;

        body.data.ok_or(ListmonkError::MalformedResponse(api))
    }
}

#[async_trait]
impl ListmonkApi for ListmonkClient {
    async fn health(&self) -> Result<(), ListmonkError> {
        self.send(
            self.request(reqwest::Method::GET, "health"),
            "checking API health",
        )
        .await?;
        Ok(())
    }

    async fn get_campaign(&self, campaign_id: u64) -> Result<Campaign, ListmonkError> {
        let path = format!("campaigns/{}", campaign_id);
        let response = self
            .send(
                self.request(reqwest::Method::GET, &path),
                "fetching campaign",
            )
            .await?;

        Self::read_data(response, "campaign").await
    }

    async fn search_subscribers(
        &self,
        query: &SubscriberQuery,
    ) -> Result<SubscriberPage, ListmonkError> {
        let request = self
            .request(reqwest::Method::GET, "subscribers")
            .query(&query.to_params());
        let response = self.send(request, "fetching subscribers").await?;

        Self::read_data(response, "subscribers").await
    }

    async fn create_list(&self, request: &CreateListRequest) -> Result<MailingList, ListmonkError> {
        let response = self
            .send(
                self.request(reqwest::Method::POST, "lists").json(request),
                "creating follow-up list",
            )
            .await?;

        Self::read_data(response, "create follow-up list").await
    }

    async fn update_list_memberships(
        &self,
        request: &ListMembershipRequest,
    ) -> Result<(), ListmonkError> {
        self.send(
            self.request(reqwest::Method::PUT, "subscribers/lists")
                .json(request),
            "adding subscribers to follow-up list",
        )
        .await?;
        Ok(())
    }

    async fn create_campaign(
        &self,
        request: &CreateCampaignRequest,
    ) -> Result<Campaign, ListmonkError> {
        let response = self
            .send(
                self.request(reqwest::Method::POST, "campaigns").json(request),
                "creating follow-up campaign",
            )
            .await?;

        Self::read_data(response, "create follow-up campaign").await
    }

    async fn delete_list(&self, list_id: u64) -> Result<(), ListmonkError> {
        let path = format!("lists/{}", list_id);
        self.send(
            self.request(reqwest::Method::DELETE, &path),
            "deleting follow-up list",
        )
        .await?;
        Ok(())
    }
}
