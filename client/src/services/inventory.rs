//! Inventory page controller
//!
//! Owns everything the inventory list page shows: the month-bucketed view
//! model, the user's query, the loading flag and the alert banners. Loads are
//! numbered; a response that lands after a newer load started is dropped.

use chrono::{DateTime, Utc};
use shared::{
    render_page, CategoryFilter, DisplayRow, InventoryPageView, InventoryQuery,
    InventoryViewModel, MonthKey, MonthOption, MonthlySnapshot, Pagination, StatusFilter,
    ValidationError,
};
use std::future::Future;

use crate::error::{AppError, AppResult};
use crate::external::InventoryApiClient;
use crate::services::alerts::{AlertLevel, Alerts};
use crate::services::audit::{enqueue_low_stock_audits, AuditQueue, AuditTicket};
use crate::services::authorization::{authorize, RestrictedAction};
use crate::services::session::Session;

/// Where monthly snapshots come from
pub trait InventorySource: Send + Sync {
    fn fetch_inventory_lists(&self) -> impl Future<Output = AppResult<Vec<MonthlySnapshot>>> + Send;
}

impl InventorySource for InventoryApiClient {
    async fn fetch_inventory_lists(&self) -> AppResult<Vec<MonthlySnapshot>> {
        InventoryApiClient::fetch_inventory_lists(self).await
    }
}

/// Sequence number of a started load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// What a finished load did to the page
#[derive(Debug)]
pub enum LoadOutcome {
    Loaded {
        months: usize,
        audits: Vec<AuditTicket>,
    },
    Failed,
    /// A newer load was started before this one finished
    Stale,
}

pub struct InventoryPage {
    view: InventoryViewModel,
    query: InventoryQuery,
    page_size: u32,
    is_loading: bool,
    alerts: Alerts,
    generation: u64,
    loaded_at: Option<DateTime<Utc>>,
}

impl InventoryPage {
    pub fn new(page_size: u32) -> Self {
        Self {
            view: InventoryViewModel::default(),
            query: InventoryQuery::default(),
            page_size,
            is_loading: true,
            alerts: Alerts::default(),
            generation: 0,
            loaded_at: None,
        }
    }

    // ------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------

    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.is_loading = true;
        LoadTicket(self.generation)
    }

    /// Fetch, build and apply in one go
    pub async fn load<S: InventorySource>(
        &mut self,
        source: &S,
        session: &Session,
        audit: &AuditQueue,
    ) -> LoadOutcome {
        let ticket = self.begin_load();
        let result = source.fetch_inventory_lists().await;
        self.complete_load(ticket, result, session, audit)
    }

    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        result: AppResult<Vec<MonthlySnapshot>>,
        session: &Session,
        audit: &AuditQueue,
    ) -> LoadOutcome {
        if ticket.0 != self.generation {
            tracing::debug!(
                "Dropping inventory response for load {} (latest is {})",
                ticket.0,
                self.generation
            );
            return LoadOutcome::Stale;
        }
        self.is_loading = false;

        let snapshots = match result {
            Ok(snapshots) => snapshots,
            Err(e) => {
                self.view = InventoryViewModel::default();
                match e.user_message() {
                    Some(message) => {
                        tracing::warn!("Inventory load failed: {}", e);
                        self.alerts.push(e.alert_level(), message);
                    }
                    None => tracing::error!("Inventory load failed: {}", e),
                }
                return LoadOutcome::Failed;
            }
        };

        log_payload_issues(&snapshots);
        self.view = InventoryViewModel::build(&snapshots);
        self.loaded_at = Some(Utc::now());

        let audits = self.run_import_audits(session, audit);

        let selection_loaded = self
            .query
            .month()
            .is_some_and(|m| self.view.month_index(m).is_some());
        if !selection_loaded {
            if let Some(gone) = self.query.month() {
                tracing::info!("Month {} is no longer available, showing the first month", gone);
            }
            self.query.set_month(self.view.default_month().cloned());
        }

        tracing::info!(
            "Loaded {} inventory months ({} low-stock audits queued)",
            self.view.month_options().len(),
            audits.len()
        );

        LoadOutcome::Loaded {
            months: self.view.month_options().len(),
            audits,
        }
    }

    /// One audit per low-stock row, only right after an import; the flag is
    /// cleared even if queueing fails so an import never audits twice
    fn run_import_audits(&self, session: &Session, audit: &AuditQueue) -> Vec<AuditTicket> {
        match session.is_import_pending() {
            Ok(true) => {}
            Ok(false) => return Vec::new(),
            Err(e) => {
                tracing::warn!("Could not read import flag: {}", e);
                return Vec::new();
            }
        }

        let user = session.current_user();
        let tickets = match enqueue_low_stock_audits(&self.view, user.as_ref(), audit) {
            Ok(tickets) => tickets,
            Err(e) => {
                tracing::error!("Failed to queue low-stock audits: {}", e);
                Vec::new()
            }
        };

        if let Err(e) = session.clear_import_flag() {
            tracing::error!("Failed to clear import flag: {}", e);
        }
        tickets
    }

    // ------------------------------------------------------------------
    // Query changes
    // ------------------------------------------------------------------

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.query.set_search(term);
    }

    pub fn set_category(&mut self, category: CategoryFilter) {
        self.query.set_category(category);
    }

    pub fn set_status(&mut self, status: StatusFilter) {
        self.query.set_status(status);
    }

    /// Pick a month from the selector
    pub fn select_month(&mut self, month: &MonthKey) -> AppResult<()> {
        if self.view.month_index(month).is_none() {
            return Err(ValidationError::UnknownMonth(month.to_string()).into());
        }
        self.query.set_month(Some(month.clone()));
        Ok(())
    }

    pub fn current_month_index(&self) -> Option<usize> {
        self.query
            .resolve_month(&self.view)
            .and_then(|m| self.view.month_index(m))
    }

    /// Step to the previous option; false at the start of the list
    pub fn previous_month(&mut self) -> bool {
        match self.current_month_index() {
            Some(i) if i > 0 => self.move_to_month(i - 1),
            _ => false,
        }
    }

    /// Step to the next option; false at the end of the list
    pub fn next_month(&mut self) -> bool {
        match self.current_month_index() {
            Some(i) => self.move_to_month(i + 1),
            None => false,
        }
    }

    fn move_to_month(&mut self, index: usize) -> bool {
        match self.view.month_at(index).map(|o| o.value.clone()) {
            Some(month) => {
                self.query.set_month(Some(month));
                true
            }
            None => false,
        }
    }

    pub fn set_page(&mut self, page: u32) -> AppResult<()> {
        let total_pages = self.total_pages();
        self.query.set_page(page, total_pages)?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Restricted actions
    // ------------------------------------------------------------------

    /// Gate the import flow; a denial becomes a banner and nothing is sent
    pub fn request_import(&mut self, session: &Session) -> AppResult<()> {
        self.gate(session, RestrictedAction::ImportInventory)
    }

    /// Gate archiving of the shown month; returns the rows to archive
    pub fn request_archive(&mut self, session: &Session) -> AppResult<(MonthKey, Vec<DisplayRow>)> {
        self.gate(session, RestrictedAction::ArchiveInventory)?;
        let month = self
            .query
            .resolve_month(&self.view)
            .cloned()
            .ok_or_else(|| AppError::Validation(ValidationError::UnknownMonth(String::new())))?;
        let rows = self.view.rows_for(&month).to_vec();
        Ok((month, rows))
    }

    fn gate(&mut self, session: &Session, action: RestrictedAction) -> AppResult<()> {
        let user = session.current_user();
        if let Err(e) = authorize(user.as_ref(), action) {
            if let Some(message) = e.user_message() {
                self.alerts.push(AlertLevel::Critical, message);
            }
            return Err(e);
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Read side
    // ------------------------------------------------------------------

    pub fn view_model(&self) -> &InventoryViewModel {
        &self.view
    }

    pub fn query(&self) -> &InventoryQuery {
        &self.query
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.loaded_at
    }

    pub fn alerts(&self) -> &Alerts {
        &self.alerts
    }

    pub fn dismiss_alert(&mut self, index: usize) {
        self.alerts.dismiss(index);
    }

    pub fn month_options(&self) -> &[MonthOption] {
        self.view.month_options()
    }

    pub fn selected_month(&self) -> Option<&MonthKey> {
        self.query.resolve_month(&self.view)
    }

    /// Header label of the shown month, empty before anything loads
    pub fn selected_month_display(&self) -> String {
        self.selected_month()
            .and_then(|m| self.view.month_index(m))
            .and_then(|i| self.view.month_at(i))
            .map(|o| o.display.clone())
            .unwrap_or_default()
    }

    pub fn filtered_rows(&self) -> Vec<&DisplayRow> {
        self.query.filtered_rows(&self.view)
    }

    pub fn total_pages(&self) -> u32 {
        Pagination::new(1, self.page_size).total_pages(self.filtered_rows().len())
    }

    pub fn page_rows(&self) -> Vec<&DisplayRow> {
        let filtered = self.filtered_rows();
        Pagination::new(self.query.page(), self.page_size)
            .slice(&filtered)
            .to_vec()
    }

    /// "No inventory lists found." once loading is over
    pub fn is_empty(&self) -> bool {
        !self.is_loading && self.page_rows().is_empty()
    }

    /// Archive is only offered once something has loaded
    pub fn can_archive(&self) -> bool {
        !self.view.is_empty()
    }

    pub fn render(&self) -> InventoryPageView {
        render_page(&self.view, &self.query, self.page_size)
    }
}

fn log_payload_issues(snapshots: &[MonthlySnapshot]) {
    for month in shared::duplicate_months(snapshots) {
        tracing::warn!("Month {} appears more than once; showing the first", month);
    }
    for snapshot in snapshots {
        for entry in shared::unmatched_entries(snapshot) {
            tracing::warn!(
                "{}: no material {} in payload, showing blank fields",
                snapshot.month_year,
                entry.material_id
            );
        }
        for entry in shared::unbalanced_entries(snapshot) {
            tracing::warn!(
                "{}: material {} total {} != purchased {} - usage {}",
                snapshot.month_year,
                entry.material_id,
                entry.total_qty,
                entry.purchased_qty,
                entry.usage_qty
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::audit::{AuditOutcome, AuditSink};
    use rust_decimal::Decimal;
    use shared::{AuditLogEntry, CurrentUser, MaterialCategory, StockStatus};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct RecordingSink {
        entries: Mutex<Vec<AuditLogEntry>>,
    }

    impl AuditSink for RecordingSink {
        async fn append(&self, entry: &AuditLogEntry) -> AppResult<()> {
            self.entries.lock().unwrap().push(entry.clone());
            Ok(())
        }
    }

    struct FixedSource(fn() -> AppResult<Vec<MonthlySnapshot>>);

    impl InventorySource for FixedSource {
        async fn fetch_inventory_lists(&self) -> AppResult<Vec<MonthlySnapshot>> {
            (self.0)()
        }
    }

    fn snapshots() -> AppResult<Vec<MonthlySnapshot>> {
        let mut months = Vec::new();
        for (month, rows) in [("2024-01", 20), ("2024-02", 3), ("2024-03", 0)] {
            let materials = (0..rows)
                .map(|i| shared::MaterialRecord {
                    material_id: i,
                    material_code: format!("M-{:02}", i),
                    material_desc: if i % 2 == 0 { "Beef".into() } else { "Carton".into() },
                    unit: "kg".into(),
                    material_category: if i % 2 == 0 {
                        MaterialCategory::MeatMaterial
                    } else {
                        MaterialCategory::Packaging
                    },
                })
                .collect();
            let inventory_info = (0..rows)
                .map(|i| shared::StockEntry {
                    material_id: i,
                    purchased_qty: Decimal::from(10),
                    usage_qty: Decimal::from(4),
                    total_qty: Decimal::from(6),
                    stock_status: if i < 2 {
                        StockStatus::LowStock
                    } else {
                        StockStatus::InStock
                    },
                    material_category: None,
                })
                .collect();
            months.push(MonthlySnapshot {
                month_year: MonthKey::parse(month).unwrap(),
                materials,
                inventory_info,
            });
        }
        Ok(months)
    }

    async fn loaded_page() -> InventoryPage {
        let session = Session::in_memory();
        let queue = AuditQueue::spawn(Arc::new(RecordingSink::default()));
        let mut page = InventoryPage::new(8);
        page.load(&FixedSource(snapshots), &session, &queue).await;
        page
    }

    #[tokio::test]
    async fn test_load_defaults_to_first_month() {
        let page = loaded_page().await;
        assert!(!page.is_loading());
        assert_eq!(page.selected_month_display(), "January 2024");
        assert_eq!(page.filtered_rows().len(), 20);
        assert_eq!(page.total_pages(), 3);
        assert_eq!(page.page_rows().len(), 8);
        assert!(page.loaded_at().is_some());
    }

    #[tokio::test]
    async fn test_filter_change_resets_page() {
        let mut page = loaded_page().await;
        page.set_page(3).unwrap();
        assert_eq!(page.page_rows().len(), 4);

        page.set_category(CategoryFilter::Only(MaterialCategory::Packaging));
        assert_eq!(page.query().page(), 1);
        assert_eq!(page.filtered_rows().len(), 10);

        assert!(page.set_page(3).is_err());
        assert_eq!(page.query().page(), 1);
    }

    #[tokio::test]
    async fn test_month_navigation_is_bounded() {
        let mut page = loaded_page().await;
        page.set_page(2).unwrap();

        assert!(!page.previous_month());
        assert!(page.next_month());
        assert_eq!(page.selected_month_display(), "February 2024");
        assert_eq!(page.query().page(), 1);

        assert!(page.next_month());
        assert!(!page.next_month());
        assert_eq!(page.selected_month_display(), "March 2024");
        assert!(page.is_empty());
    }

    #[tokio::test]
    async fn test_reload_without_selected_month_falls_back() {
        let session = Session::in_memory();
        let queue = AuditQueue::spawn(Arc::new(RecordingSink::default()));
        let mut page = loaded_page().await;
        page.select_month(&MonthKey::parse("2024-03").unwrap()).unwrap();

        page.load(
            &FixedSource(|| {
                let mut months = snapshots()?;
                months.truncate(2);
                Ok(months)
            }),
            &session,
            &queue,
        )
        .await;
        assert_eq!(page.selected_month_display(), "January 2024");
        assert_eq!(page.query().month().map(|m| m.as_str()), Some("2024-01"));
        assert_eq!(page.filtered_rows().len(), 20);

        // a month that survives the reload stays selected
        page.select_month(&MonthKey::parse("2024-02").unwrap()).unwrap();
        page.load(&FixedSource(snapshots), &session, &queue).await;
        assert_eq!(page.selected_month_display(), "February 2024");
    }

    #[tokio::test]
    async fn test_select_unknown_month() {
        let mut page = loaded_page().await;
        let err = page
            .select_month(&MonthKey::parse("2030-01").unwrap())
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(ValidationError::UnknownMonth(_))));
    }

    #[tokio::test]
    async fn test_failures_leave_page_empty() {
        let session = Session::in_memory();
        let queue = AuditQueue::spawn(Arc::new(RecordingSink::default()));

        let mut page = InventoryPage::new(8);
        let outcome = page
            .load(&FixedSource(|| Err(AppError::NoData)), &session, &queue)
            .await;
        assert!(matches!(outcome, LoadOutcome::Failed));
        assert!(!page.is_loading());
        assert!(page.is_empty());
        assert_eq!(page.alerts().messages(), vec!["No data retrieved."]);

        let mut page = InventoryPage::new(8);
        page.load(
            &FixedSource(|| Err(AppError::MalformedPayload("object".into()))),
            &session,
            &queue,
        )
        .await;
        assert_eq!(page.alerts().messages(), vec!["Error retrieving inventory lists."]);

        let mut page = InventoryPage::new(8);
        page.load(
            &FixedSource(|| {
                Err(AppError::Upstream {
                    status: 503,
                    body: String::new(),
                })
            }),
            &session,
            &queue,
        )
        .await;
        assert!(page.alerts().is_empty());
        assert!(!page.is_loading());
    }

    #[tokio::test]
    async fn test_stale_response_is_dropped() {
        let session = Session::in_memory();
        let queue = AuditQueue::spawn(Arc::new(RecordingSink::default()));
        let mut page = InventoryPage::new(8);

        let first = page.begin_load();
        let second = page.begin_load();

        let outcome = page.complete_load(first, snapshots(), &session, &queue);
        assert!(matches!(outcome, LoadOutcome::Stale));
        assert!(page.is_loading());
        assert!(page.view_model().is_empty());

        let outcome = page.complete_load(second, Ok(Vec::new()), &session, &queue);
        assert!(matches!(outcome, LoadOutcome::Loaded { months: 0, .. }));
        assert!(page.is_empty());
    }

    #[tokio::test]
    async fn test_import_audits_fire_once() {
        let session = Session::in_memory();
        session
            .set_current_user(&CurrentUser {
                user_id: Some(4),
                roles: vec![],
            })
            .unwrap();
        session.mark_import().unwrap();

        let sink = Arc::new(RecordingSink::default());
        let queue = AuditQueue::spawn(sink.clone());

        let mut page = InventoryPage::new(8);
        let outcome = page.load(&FixedSource(snapshots), &session, &queue).await;
        let audits = match outcome {
            LoadOutcome::Loaded { audits, .. } => audits,
            other => panic!("unexpected outcome: {:?}", other),
        };
        // two low-stock rows in each of the two non-empty months
        assert_eq!(audits.len(), 4);
        for ticket in audits {
            assert_eq!(ticket.wait().await.unwrap(), AuditOutcome::Sent);
        }
        assert!(!session.is_import_pending().unwrap());

        let mut reloaded = InventoryPage::new(8);
        match reloaded.load(&FixedSource(snapshots), &session, &queue).await {
            LoadOutcome::Loaded { audits, .. } => assert!(audits.is_empty()),
            other => panic!("unexpected outcome: {:?}", other),
        }

        let summary = queue.shutdown().await.unwrap();
        assert_eq!(summary.sent, 4);
        let entries = sink.entries.lock().unwrap();
        assert!(entries.iter().all(|e| e.user_id == Some(4) && e.act == "low stock"));
    }

    #[tokio::test]
    async fn test_restricted_actions_need_roles() {
        let session = Session::in_memory();
        session
            .set_current_user(&CurrentUser {
                user_id: Some(1),
                roles: vec![6],
            })
            .unwrap();
        let mut page = loaded_page().await;

        assert!(page.request_import(&session).is_ok());
        assert!(page.alerts().is_empty());

        assert!(page.request_archive(&session).is_err());
        assert_eq!(
            page.alerts().messages(),
            vec!["You are not authorized to delete/archive files."]
        );
        page.dismiss_alert(0);
        assert!(page.alerts().is_empty());

        session
            .set_current_user(&CurrentUser {
                user_id: Some(1),
                roles: vec![8],
            })
            .unwrap();
        let (month, rows) = page.request_archive(&session).unwrap();
        assert_eq!(month.as_str(), "2024-01");
        assert_eq!(rows.len(), 20);
        assert!(page.can_archive());
    }
}
