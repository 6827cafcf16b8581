use std::cell::RefCell;
use std::sync::{Mutex, Once};

use async_trait::async_trait;
use listmonk::*;
use log::{Level, Log, Metadata, Record};

/// Every mutating call the fake received, in order
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Health,
    GetCampaign(u64),
    Search(u32),
    CreateList(String),
    AddMembers(Vec<u64>, Vec<u64>),
    CreateCampaign(String),
    DeleteList(u64),
}

#[derive(Default)]
struct Failures {
    health: bool,
    search_page: Option<u32>,
    add_members_call: Option<usize>,
    create_campaign: bool,
    delete_list: bool,
}

/// In-memory Listmonk serving fixed subscriber pages
pub struct FakeListmonk {
    campaign: Option<Campaign>,
    pages: Vec<Vec<u64>>,
    list_id: u64,
    calls: Mutex<Vec<Call>>,
    searches: Mutex<Vec<SubscriberQuery>>,
    created_lists: Mutex<Vec<CreateListRequest>>,
    created_campaigns: Mutex<Vec<CreateCampaignRequest>>,
    failures: Mutex<Failures>,
}

impl FakeListmonk {
    pub fn with_pages(pages: Vec<Vec<u64>>) -> Self {
        Self {
            campaign: Some(Self::campaign()),
            pages,
            list_id: 500,
            calls: Mutex::new(Vec::new()),
            searches: Mutex::new(Vec::new()),
            created_lists: Mutex::new(Vec::new()),
            created_campaigns: Mutex::new(Vec::new()),
            failures: Mutex::new(Failures::default()),
        }
    }

    pub fn without_campaign() -> Self {
        Self {
            campaign: None,
            ..Self::with_pages(Vec::new())
        }
    }

    pub fn subscriber(id: u64) -> Subscriber {
        Subscriber { id }
    }

    pub fn campaign() -> Campaign {
        Campaign {
            id: 12,
            name: "Spring sale".to_string(),
            subject: "Spring is here".to_string(),
            from_email: "Shop <news@example.com>".to_string(),
            lists: vec![
                CampaignList {
                    id: 3,
                    name: "Customers".to_string(),
                },
                CampaignList {
                    id: 4,
                    name: "Leads".to_string(),
                },
            ],
            campaign_type: CampaignType::Regular,
            content_type: ContentType::Richtext,
            body: "<p>Spring deals</p>".to_string(),
            body_source: None,
            altbody: Some("Spring deals".to_string()),
            messenger: Some("email".to_string()),
            template_id: Some(2),
            tags: vec!["seasonal".to_string(), "sale".to_string()],
            headers: Vec::new(),
        }
    }

    pub fn fail_health(&self) {
        self.failures.lock().unwrap().health = true;
    }

    pub fn fail_search_on_page(&self, page: u32) {
        self.failures.lock().unwrap().search_page = Some(page);
    }

    /// Fails the n-th membership update, counting from 1
    pub fn fail_add_members_call(&self, call: usize) {
        self.failures.lock().unwrap().add_members_call = Some(call);
    }

    pub fn fail_create_campaign(&self) {
        self.failures.lock().unwrap().create_campaign = true;
    }

    pub fn fail_delete_list(&self) {
        self.failures.lock().unwrap().delete_list = true;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn searches(&self) -> Vec<SubscriberQuery> {
        self.searches.lock().unwrap().clone()
    }

    pub fn created_lists(&self) -> Vec<CreateListRequest> {
        self.created_lists.lock().unwrap().clone()
    }

    pub fn created_campaigns(&self) -> Vec<CreateCampaignRequest> {
        self.created_campaigns.lock().unwrap().clone()
    }

    pub fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|call| matches(call)).count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn error(operation: &'static str, status: u16, status_text: &str) -> ListmonkError {
        ListmonkError::Status {
            operation,
            status,
            status_text: status_text.to_string(),
        }
    }

    fn server_error(operation: &'static str) -> ListmonkError {
        Self::error(operation, 500, "Internal Server Error")
    }
}

#[async_trait]
impl ListmonkApi for FakeListmonk {
    async fn health(&self) -> Result<(), ListmonkError> {
        self.record(Call::Health);
        if self.failures.lock().unwrap().health {
            return Err(Self::error(
                "checking API health",
                503,
                "Service Unavailable",
            ));
        }
        Ok(())
    }

    async fn get_campaign(&self, campaign_id: u64) -> Result<Campaign, ListmonkError> {
        self.record(Call::GetCampaign(campaign_id));
        match &self.campaign {
            Some(campaign) if campaign.id == campaign_id => Ok(campaign.clone()),
            _ => Err(Self::error("fetching campaign", 404, "Not Found")),
        }
    }

    async fn search_subscribers(
        &self,
        query: &SubscriberQuery,
    ) -> Result<SubscriberPage, ListmonkError> {
        self.record(Call::Search(query.page));
        self.searches.lock().unwrap().push(query.clone());

        if self.failures.lock().unwrap().search_page == Some(query.page) {
            return Err(Self::server_error("fetching subscribers"));
        }

        let results: Vec<Subscriber> = self
            .pages
            .get(query.page as usize - 1)
            .map(|ids| ids.iter().copied().map(Self::subscriber).collect())
            .unwrap_or_default();

        Ok(SubscriberPage {
            results,
            query: query.query.clone(),
            total: self.pages.iter().map(|page| page.len() as u64).sum(),
            per_page: query.per_page as u64,
            page: query.page as u64,
        })
    }

    async fn create_list(&self, request: &CreateListRequest) -> Result<MailingList, ListmonkError> {
        self.record(Call::CreateList(request.name.clone()));
        self.created_lists.lock().unwrap().push(request.clone());

        Ok(MailingList {
            id: self.list_id,
            name: request.name.clone(),
        })
    }

    async fn update_list_memberships(
        &self,
        request: &ListMembershipRequest,
    ) -> Result<(), ListmonkError> {
        self.record(Call::AddMembers(
            request.ids.clone(),
            request.target_list_ids.clone(),
        ));

        let attempt = self.count(|call| matches!(call, Call::AddMembers(..)));
        if self.failures.lock().unwrap().add_members_call == Some(attempt) {
            return Err(Self::server_error("adding subscribers to follow-up list"));
        }
        Ok(())
    }

    async fn create_campaign(
        &self,
        request: &CreateCampaignRequest,
    ) -> Result<Campaign, ListmonkError> {
        self.record(Call::CreateCampaign(request.name.clone()));
        self.created_campaigns.lock().unwrap().push(request.clone());

        if self.failures.lock().unwrap().create_campaign {
            return Err(Self::server_error("creating follow-up campaign"));
        }

        Ok(Campaign {
            id: 900,
            name: request.name.clone(),
            lists: request
                .lists
                .iter()
                .map(|id| CampaignList {
                    id: *id,
                    name: String::new(),
                })
                .collect(),
            tags: request.tags.clone(),
            ..Self::campaign()
        })
    }

    async fn delete_list(&self, list_id: u64) -> Result<(), ListmonkError> {
        self.record(Call::DeleteList(list_id));
        if self.failures.lock().unwrap().delete_list {
            return Err(Self::server_error("deleting follow-up list"));
        }
        Ok(())
    }
}

thread_local! {
    static RECORDS: RefCell<Vec<(Level, String)>> = const { RefCell::new(Vec::new()) };
}

/// Logger keeping records per thread, so parallel tests do not see each other
struct CapturingLogger;

impl Log for CapturingLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        RECORDS.with(|records| {
            records
                .borrow_mut()
                .push((record.level(), record.args().to_string()))
        });
    }

    fn flush(&self) {}
}

static LOGGER: CapturingLogger = CapturingLogger;
static INIT_LOGGER: Once = Once::new();

/// Installs the capturing logger and clears this thread's records
pub fn capture_logs() {
    INIT_LOGGER.call_once(|| {
        log::set_logger(&LOGGER).expect("logger already installed");
        log::set_max_level(log::LevelFilter::Trace);
    });
    RECORDS.with(|records| records.borrow_mut().clear());
}

/// Messages logged on this thread at `level` since `capture_logs`
pub fn captured(level: Level) -> Vec<String> {
    RECORDS.with(|records| {
        records
            .borrow()
            .iter()
            .filter(|(record_level, _)| *record_level == level)
            .map(|(_, message)| message.clone())
            .collect()
    })
}
