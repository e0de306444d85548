use super::*;
use crate::controller::{state::EditForm, NoticeSeverity};
use async_trait::async_trait;
use client_core::ClientError;
use shared::{
    error::ApiError,
    protocol::{QuoteRecord, QuoteUpdate},
};
use std::sync::{Arc, Mutex};
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Succeed,
    Reject(u16),
    Break,
}

impl Outcome {
    fn into_result<T>(self, url: &str, value: T) -> Result<T, ClientError> {
        match self {
            Outcome::Succeed => Ok(value),
            Outcome::Reject(status) => Err(ClientError::Status {
                url: url.to_string(),
                status,
                error: ApiError::from_response(status, r#"{"detail":"rejected"}"#),
            }),
            Outcome::Break => Err(ClientError::Decode {
                url: url.to_string(),
                source: serde_json::from_str::<Vec<QuoteRecord>>("<html>")
                    .expect_err("not json"),
            }),
        }
    }
}

/// Longest quote the service still counts as a short.
const SHORTS_MAX_LEN: usize = 40;

#[derive(Debug, Clone, PartialEq, Eq)]
enum ApiCall {
    List { shorts_only: bool },
    Delete(QuoteId),
    Update(QuoteId, QuoteUpdate),
}

struct FakeApiState {
    calls: Vec<ApiCall>,
    quotes: Vec<QuoteRecord>,
    list: Outcome,
    delete: Outcome,
    update: Outcome,
    echo_update: bool,
}

#[derive(Clone)]
struct FakeQuotesApi {
    inner: Arc<Mutex<FakeApiState>>,
}

impl FakeQuotesApi {
    fn new(quotes: Vec<QuoteRecord>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeApiState {
                calls: Vec::new(),
                quotes,
                list: Outcome::Succeed,
                delete: Outcome::Succeed,
                update: Outcome::Succeed,
                echo_update: true,
            })),
        }
    }

    fn with(&self, edit: impl FnOnce(&mut FakeApiState)) {
        edit(&mut self.inner.lock().expect("fake api lock"));
    }

    fn calls(&self) -> Vec<ApiCall> {
        self.inner.lock().expect("fake api lock").calls.clone()
    }

    fn clear_calls(&self) {
        self.with(|state| state.calls.clear());
    }
}

#[async_trait]
impl QuotesApi for FakeQuotesApi {
    async fn list_quotes(&self, shorts_only: bool) -> Result<Vec<QuoteRecord>, ClientError> {
        let mut state = self.inner.lock().expect("fake api lock");
        state.calls.push(ApiCall::List { shorts_only });
        let quotes: Vec<QuoteRecord> = state
            .quotes
            .iter()
            .filter(|record| !shorts_only || record.quote.len() <= SHORTS_MAX_LEN)
            .cloned()
            .collect();
        state.list.into_result("/api/quotes", quotes)
    }

    async fn delete_quote(&self, id: QuoteId) -> Result<(), ClientError> {
        let mut state = self.inner.lock().expect("fake api lock");
        state.calls.push(ApiCall::Delete(id));
        state.delete.into_result(&format!("/api/quotes/{id}"), ())?;
        state.quotes.retain(|record| record.id != id);
        Ok(())
    }

    async fn update_quote(
        &self,
        id: QuoteId,
        update: &QuoteUpdate,
    ) -> Result<Option<QuoteRecord>, ClientError> {
        let mut state = self.inner.lock().expect("fake api lock");
        state.calls.push(ApiCall::Update(id, update.clone()));
        state.update.into_result(&format!("/api/quotes/{id}"), ())?;
        let echo = state.echo_update;
        let Some(stored) = state.quotes.iter_mut().find(|record| record.id == id) else {
            return Ok(None);
        };
        stored.quote = update.quote.clone();
        stored.author = update.author.clone();
        stored.image_prompt = update.image_prompt.clone();
        stored.image_style = update.image_style.clone();
        stored.keywords = update.keywords.clone();
        Ok(echo.then(|| stored.clone()))
    }

    fn export_url(&self, format: ExportFormat) -> Result<Url, ClientError> {
        let url = format!("http://quotes.test/api/quotes/export/{format}");
        Url::parse(&url).map_err(|source| ClientError::InvalidUrl { url, source })
    }
}

#[derive(Default)]
struct ShellLog {
    prompts: Vec<String>,
    notices: Vec<Notice>,
    navigations: Vec<Url>,
}

#[derive(Clone)]
struct RecordingShell {
    answer: bool,
    log: Arc<Mutex<ShellLog>>,
}

impl RecordingShell {
    fn answering(answer: bool) -> Self {
        Self {
            answer,
            log: Arc::new(Mutex::new(ShellLog::default())),
        }
    }

    fn notices(&self) -> Vec<Notice> {
        self.log.lock().expect("shell lock").notices.clone()
    }

    fn prompts(&self) -> Vec<String> {
        self.log.lock().expect("shell lock").prompts.clone()
    }

    fn navigations(&self) -> Vec<Url> {
        self.log.lock().expect("shell lock").navigations.clone()
    }
}

#[async_trait]
impl Shell for RecordingShell {
    async fn confirm(&self, prompt: &str) -> bool {
        self.log
            .lock()
            .expect("shell lock")
            .prompts
            .push(prompt.to_string());
        self.answer
    }

    fn notify(&self, notice: &Notice) {
        self.log
            .lock()
            .expect("shell lock")
            .notices
            .push(notice.clone());
    }

    async fn navigate(&self, url: &Url) {
        self.log
            .lock()
            .expect("shell lock")
            .navigations
            .push(url.clone());
    }
}

fn record(id: i64, quote: &str) -> QuoteRecord {
    QuoteRecord {
        id: QuoteId(id),
        quote: quote.to_string(),
        author: "Philosopher Sage".to_string(),
        image_prompt: "mountains under a violet sky".to_string(),
        image_style: "surreal".to_string(),
        keywords: "wisdom, truth".to_string(),
        timestamp: Some("2024-05-01T10:30:00Z".parse().expect("timestamp")),
    }
}

fn sample_quotes() -> Vec<QuoteRecord> {
    vec![
        record(3, "To question is to unravel the mystery of existence itself."),
        record(2, "Bold hearts rise."),
        record(1, "Dream big."),
    ]
}

fn ids(controller: &QuoteListController<FakeQuotesApi, RecordingShell>) -> Vec<QuoteId> {
    controller.state().quotes().iter().map(|q| q.id).collect()
}

async fn loaded_controller(
    answer: bool,
) -> (
    QuoteListController<FakeQuotesApi, RecordingShell>,
    FakeQuotesApi,
    RecordingShell,
) {
    let api = FakeQuotesApi::new(sample_quotes());
    let shell = RecordingShell::answering(answer);
    let mut controller = QuoteListController::new(api.clone(), shell.clone());
    controller.refresh().await;
    api.clear_calls();
    (controller, api, shell)
}

fn hi_draft() -> EditDraft {
    EditDraft {
        id: QuoteId(5),
        quote: "Hi".into(),
        author: "A".into(),
        image_prompt: "P".into(),
        image_style: "S".into(),
        keywords: "k1,k2".into(),
    }
}

#[tokio::test]
async fn confirmed_delete_removes_exactly_one_quote() {
    let (mut controller, api, shell) = loaded_controller(true).await;

    controller.delete_quote(QuoteId(2)).await;

    assert_eq!(api.calls(), vec![ApiCall::Delete(QuoteId(2))]);
    assert_eq!(ids(&controller), vec![QuoteId(3), QuoteId(1)]);
    assert_eq!(shell.prompts(), vec![DELETE_CONFIRMATION.to_string()]);
    let notice = controller.state().last_notice().expect("notice");
    assert_eq!(notice.severity(), NoticeSeverity::Info);
    assert_eq!(notice.message(), "Quote deleted successfully");
}

#[tokio::test]
async fn declined_delete_sends_nothing_and_changes_nothing() {
    let (mut controller, api, shell) = loaded_controller(false).await;

    controller.delete_quote(QuoteId(2)).await;

    assert!(api.calls().is_empty());
    assert_eq!(ids(&controller), vec![QuoteId(3), QuoteId(2), QuoteId(1)]);
    assert!(shell.notices().is_empty());
    assert!(controller.state().last_notice().is_none());
}

#[tokio::test]
async fn rejected_delete_keeps_list_and_reports_failure() {
    let (mut controller, api, _shell) = loaded_controller(true).await;
    api.with(|state| state.delete = Outcome::Reject(404));

    controller.delete_quote(QuoteId(2)).await;

    assert_eq!(api.calls(), vec![ApiCall::Delete(QuoteId(2))]);
    assert_eq!(ids(&controller).len(), 3);
    let notice = controller.state().last_notice().expect("notice");
    assert!(notice.is_error());
    assert_eq!(notice.message(), "Failed to delete quote");
}

#[tokio::test]
async fn broken_delete_reports_generic_error() {
    let (mut controller, api, shell) = loaded_controller(true).await;
    api.with(|state| state.delete = Outcome::Break);

    controller.delete_quote(QuoteId(1)).await;

    assert_eq!(ids(&controller).len(), 3);
    let notices = shell.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].message(), "Error deleting quote");
    assert_eq!(notices[0].context(), NoticeContext::Delete);
}

#[tokio::test]
async fn opening_edit_form_populates_fields_and_shows_it() {
    let (mut controller, api, _shell) = loaded_controller(true).await;

    controller.open_edit_modal(hi_draft());

    assert_eq!(
        controller.state().edit(),
        &EditForm {
            draft: Some(hi_draft()),
            visible: true,
        }
    );
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn opening_edit_form_accepts_empty_values() {
    let (mut controller, _api, _shell) = loaded_controller(true).await;
    let mut draft = hi_draft();
    draft.quote.clear();
    draft.keywords.clear();

    controller.open_edit_modal(draft.clone());

    assert_eq!(controller.state().edit().draft.as_ref(), Some(&draft));
}

#[tokio::test]
async fn closing_edit_form_keeps_draft_values() {
    let (mut controller, _api, _shell) = loaded_controller(true).await;
    controller.open_edit_modal(hi_draft());
    controller.edit_field(EditField::Author, "B");

    controller.close_edit_modal();

    let form = controller.state().edit();
    assert!(!form.visible);
    let draft = form.draft.as_ref().expect("draft retained");
    assert_eq!(draft.author, "B");
    assert_eq!(draft.quote, "Hi");
}

#[tokio::test]
async fn save_puts_draft_fields_once_and_patches_the_record() {
    let api = FakeQuotesApi::new(vec![record(5, "old"), record(4, "other")]);
    let shell = RecordingShell::answering(true);
    let mut controller = QuoteListController::new(api.clone(), shell.clone());
    controller.refresh().await;
    api.clear_calls();

    controller.open_edit_modal(hi_draft());
    controller.save_edit().await;

    assert_eq!(
        api.calls(),
        vec![ApiCall::Update(
            QuoteId(5),
            QuoteUpdate {
                quote: "Hi".into(),
                author: "A".into(),
                image_prompt: "P".into(),
                image_style: "S".into(),
                keywords: "k1,k2".into(),
            }
        )]
    );
    let patched = controller.state().quote(QuoteId(5)).expect("still listed");
    assert_eq!(patched.quote, "Hi");
    assert_eq!(patched.keywords, "k1,k2");
    assert_eq!(ids(&controller), vec![QuoteId(5), QuoteId(4)]);
    assert!(!controller.state().edit().visible);
    assert_eq!(
        controller.state().last_notice().map(Notice::message),
        Some("Quote updated successfully")
    );
}

#[tokio::test]
async fn save_without_echoed_record_reloads_with_current_filter() {
    let (mut controller, api, _shell) = loaded_controller(true).await;
    controller.set_shorts_filter(true).await;
    api.with(|state| state.echo_update = false);
    api.clear_calls();

    assert!(controller.open_edit_for(QuoteId(2)));
    controller.edit_field(EditField::Quote, "Bolder hearts rise.");
    controller.save_edit().await;

    let calls = api.calls();
    assert_eq!(calls.len(), 2);
    assert!(matches!(&calls[0], ApiCall::Update(id, update)
        if *id == QuoteId(2) && update.quote == "Bolder hearts rise."));
    assert_eq!(calls[1], ApiCall::List { shorts_only: true });
    assert!(!controller.state().edit().visible);
}

#[tokio::test]
async fn save_under_shorts_filter_refetches_instead_of_patching() {
    let (mut controller, api, _shell) = loaded_controller(true).await;
    controller.set_shorts_filter(true).await;
    api.clear_calls();

    assert!(controller.open_edit_for(QuoteId(2)));
    controller.edit_field(
        EditField::Quote,
        "Bold hearts rise above every storm that tries to hold them down.",
    );
    controller.save_edit().await;

    let calls = api.calls();
    assert_eq!(calls.len(), 2);
    assert!(matches!(calls[0], ApiCall::Update(QuoteId(2), _)));
    assert_eq!(calls[1], ApiCall::List { shorts_only: true });
    assert_eq!(ids(&controller), vec![QuoteId(1)]);
}

#[tokio::test]
async fn failed_refresh_after_save_still_reports_the_save() {
    let (mut controller, api, shell) = loaded_controller(true).await;
    api.with(|state| {
        state.echo_update = false;
        state.list = Outcome::Reject(500);
    });
    controller.open_edit_modal(hi_draft());

    controller.save_edit().await;

    let notices = shell.notices();
    assert_eq!(
        notices.iter().map(Notice::message).collect::<Vec<_>>(),
        vec![
            "Quote updated successfully",
            "Quote saved, but the list could not be refreshed",
        ]
    );
    let last = controller.state().last_notice().expect("notice");
    assert_eq!(last.severity(), NoticeSeverity::Warning);
    assert!(!last.is_error());
    assert!(!controller.state().edit().visible);
}

#[tokio::test]
async fn failed_save_keeps_form_open_with_values() {
    let (mut controller, api, _shell) = loaded_controller(true).await;
    api.with(|state| state.update = Outcome::Reject(500));
    controller.open_edit_modal(hi_draft());

    controller.save_edit().await;

    assert_eq!(api.calls().len(), 1);
    let form = controller.state().edit();
    assert!(form.visible);
    assert_eq!(form.draft, Some(hi_draft()));
    assert_eq!(
        controller.state().last_notice().map(Notice::message),
        Some("Failed to update quote")
    );
}

#[tokio::test]
async fn broken_save_reports_generic_error() {
    let (mut controller, api, _shell) = loaded_controller(true).await;
    api.with(|state| state.update = Outcome::Break);
    controller.open_edit_modal(hi_draft());

    controller.save_edit().await;

    assert!(controller.state().edit().visible);
    assert_eq!(
        controller.state().last_notice().map(Notice::message),
        Some("Error updating quote")
    );
}

#[tokio::test]
async fn save_without_open_draft_sends_nothing() {
    let (mut controller, api, _shell) = loaded_controller(true).await;

    controller.save_edit().await;

    assert!(api.calls().is_empty());
    let notice = controller.state().last_notice().expect("notice");
    assert_eq!(notice.severity(), NoticeSeverity::Warning);
}

#[tokio::test]
async fn shorts_filter_replaces_list_in_server_order() {
    let (mut controller, api, _shell) = loaded_controller(true).await;

    controller.set_shorts_filter(true).await;

    assert_eq!(api.calls(), vec![ApiCall::List { shorts_only: true }]);
    assert!(controller.state().shorts_only());
    assert_eq!(ids(&controller), vec![QuoteId(2), QuoteId(1)]);
}

#[tokio::test]
async fn failed_filter_keeps_previous_list() {
    let (mut controller, api, _shell) = loaded_controller(true).await;
    let before = controller.state().quotes().to_vec();

    api.with(|state| state.list = Outcome::Reject(500));
    controller.set_shorts_filter(true).await;
    assert_eq!(controller.state().quotes(), before.as_slice());
    assert_eq!(
        controller.state().last_notice().map(Notice::message),
        Some("Failed to filter quotes")
    );

    api.with(|state| state.list = Outcome::Break);
    controller.set_shorts_filter(false).await;
    assert_eq!(controller.state().quotes(), before.as_slice());
    assert_eq!(
        controller.state().last_notice().map(Notice::message),
        Some("Error filtering quotes")
    );
}

#[tokio::test]
async fn edit_for_unlisted_quote_leaves_form_closed() {
    let (mut controller, _api, _shell) = loaded_controller(true).await;

    assert!(!controller.open_edit_for(QuoteId(99)));

    assert_eq!(controller.state().edit(), &EditForm::default());
    assert_eq!(
        controller.state().last_notice().map(Notice::severity),
        Some(NoticeSeverity::Warning)
    );
}

#[tokio::test]
async fn edit_field_without_draft_is_ignored() {
    let (mut controller, _api, _shell) = loaded_controller(true).await;

    controller.edit_field(EditField::Keywords, "ignored");

    assert!(controller.state().edit().draft.is_none());
}

#[tokio::test]
async fn download_navigates_to_export_link() {
    let (mut controller, api, shell) = loaded_controller(true).await;

    controller.download_quotes(ExportFormat::Json).await;

    assert!(api.calls().is_empty());
    assert_eq!(
        shell.navigations(),
        vec![Url::parse("http://quotes.test/api/quotes/export/json").expect("url")]
    );
}
