use std::collections::HashSet;

use futures_util::stream::{self, Stream};
use listmonk::{ListmonkApi, ListmonkError, Subscriber, SubscriberQuery};
use log::{info, warn};

/// Filter matching subscribers with no view record for the campaign
pub fn unopened_query(campaign_id: u64) -> String {
    format!(
        "NOT EXISTS (SELECT 1 FROM campaign_views \
         WHERE campaign_views.subscriber_id = subscribers.id \
         AND campaign_views.campaign_id = {})",
        campaign_id
    )
}

/// Subscriber ids of a page with duplicates removed, first occurrence kept
pub fn dedup_subscriber_ids(subscribers: &[Subscriber]) -> Vec<u64> {
    let mut seen = HashSet::with_capacity(subscribers.len());
    subscribers
        .iter()
        .map(|subscriber| subscriber.id)
        .filter(|id| seen.insert(*id))
        .collect()
}

/// Pull-based cursor over subscribers who did not open a campaign.
///
/// Every call to [`next_batch`](Self::next_batch) performs one search request
/// and yields that page's ids, deduplicated. The cursor is exhausted after an
/// empty page or a page shorter than the page size. Ids repeated across pages
/// are not filtered.
pub struct UnopenedSubscribers<'a> {
    api: &'a dyn ListmonkApi,
    campaign_id: u64,
    list_ids: Vec<u64>,
    per_page: u32,
    next_page: Option<u32>,
    fetched: usize,
}

impl<'a> UnopenedSubscribers<'a> {
    /// Starts at page 1. An empty `list_ids` searches all subscribers.
    pub fn new(api: &'a dyn ListmonkApi, campaign_id: u64, list_ids: Vec<u64>, per_page: u32) -> Self {
        Self {
            api,
            campaign_id,
            list_ids,
            per_page: per_page.max(1),
            next_page: Some(1),
            fetched: 0,
        }
    }

    /// Raw number of subscribers returned so far, duplicates included
    pub fn fetched(&self) -> usize {
        self.fetched
    }

    /// Fetches the next page, or returns `None` once the last page was seen
    pub async fn next_batch(&mut self) -> Result<Option<Vec<u64>>, ListmonkError> {
        let Some(page) = self.next_page else {
            return Ok(None);
        };

        let query = SubscriberQuery {
            query: unopened_query(self.campaign_id),
            page,
            per_page: self.per_page,
            list_ids: self.list_ids.clone(),
        };

        let result = match self.api.search_subscribers(&query).await {
            Ok(result) => result,
            Err(e) => {
                self.next_page = None;
                return Err(e);
            }
        };

        if result.results.is_empty() {
            self.finish();
            return Ok(None);
        }

        let batch_size = result.results.len();
        let ids = dedup_subscriber_ids(&result.results);
        if ids.len() != batch_size {
            warn!(
                "Batch {} contains duplicate subscriber IDs. Unique IDs: {}, Batch size: {}",
                page,
                ids.len(),
                batch_size
            );
        }

        self.fetched += batch_size;
        info!(
            "Fetched batch {}: {} subscribers (total: {})",
            page, batch_size, self.fetched
        );

        if batch_size < self.per_page as usize {
            self.finish();
        } else {
            self.next_page = Some(page + 1);
        }

        Ok(Some(ids))
    }

    /// Turns the cursor into a `Stream` of batches
    pub fn into_stream(self) -> impl Stream<Item = Result<Vec<u64>, ListmonkError>> + 'a {
        stream::try_unfold(self, |mut cursor| async move {
            cursor
                .next_batch()
                .await
                .map(|batch| batch.map(|ids| (ids, cursor)))
        })
    }

    fn finish(&mut self) {
        self.next_page = None;
        info!(
            "Found {} total subscribers who did not open campaign {}.",
            self.fetched, self.campaign_id
        );
    }
}
