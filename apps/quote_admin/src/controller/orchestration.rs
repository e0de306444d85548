//! Orchestration from user actions to quotes API calls and view-state updates.

use client_core::{ClientError, QuotesApi};
use shared::{
    domain::{EditField, QuoteId},
    protocol::{ExportFormat, QuoteRecord},
};
use tracing::{debug, error, info, warn};

use super::{
    events::{Notice, NoticeContext, ViewEvent},
    state::{EditDraft, ViewState},
};
use crate::shell::Shell;

pub const DELETE_CONFIRMATION: &str = "Are you sure you want to delete this quote?";

/// Mediates between the rendered quote list and the quotes service. Methods take
/// `&mut self`, so one action runs to completion before the next starts.
pub struct QuoteListController<A, S> {
    api: A,
    shell: S,
    state: ViewState,
}

impl<A: QuotesApi, S: Shell> QuoteListController<A, S> {
    pub fn new(api: A, shell: S) -> Self {
        Self {
            api,
            shell,
            state: ViewState::default(),
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn shell(&self) -> &S {
        &self.shell
    }

    pub async fn delete_quote(&mut self, id: QuoteId) {
        if !self.shell.confirm(DELETE_CONFIRMATION).await {
            debug!(quote_id = id.0, "delete declined");
            return;
        }

        match self.api.delete_quote(id).await {
            Ok(()) => {
                info!(quote_id = id.0, "deleted quote");
                self.state.apply(ViewEvent::QuoteRemoved(id));
                self.notify(Notice::info(NoticeContext::Delete, "Quote deleted successfully"));
            }
            Err(err) if err.is_rejection() => {
                warn!(quote_id = id.0, error = %err, "delete rejected");
                self.notify(Notice::error(NoticeContext::Delete, "Failed to delete quote"));
            }
            Err(err) => {
                error!(quote_id = id.0, error = %err, "delete error");
                self.notify(Notice::error(NoticeContext::Delete, "Error deleting quote"));
            }
        }
    }

    /// Fills the edit form with exactly the given values and shows it.
    pub fn open_edit_modal(&mut self, draft: EditDraft) {
        debug!(quote_id = draft.id.0, "opening edit form");
        self.state.apply(ViewEvent::EditOpened(draft));
    }

    /// Opens the edit form from the rendered record with this id.
    pub fn open_edit_for(&mut self, id: QuoteId) -> bool {
        match self.state.quote(id).map(EditDraft::from_record) {
            Some(draft) => {
                self.open_edit_modal(draft);
                true
            }
            None => {
                warn!(quote_id = id.0, "edit requested for a quote that is not listed");
                self.notify(Notice::warning(
                    NoticeContext::Edit,
                    format!("Quote {id} is not in the current list"),
                ));
                false
            }
        }
    }

    pub fn edit_field(&mut self, field: EditField, value: impl Into<String>) {
        if self.state.edit().draft.is_none() {
            debug!(field = field.wire_name(), "ignoring edit without an open draft");
            return;
        }
        self.state.apply(ViewEvent::EditFieldChanged {
            field,
            value: value.into(),
        });
    }

    pub fn close_edit_modal(&mut self) {
        self.state.apply(ViewEvent::EditClosed);
    }

    pub async fn save_edit(&mut self) {
        let Some(draft) = self.state.edit().draft.clone() else {
            self.notify(Notice::warning(
                NoticeContext::Edit,
                "No quote is open for editing",
            ));
            return;
        };

        match self.api.update_quote(draft.id, &draft.to_update()).await {
            Ok(stored) => {
                info!(quote_id = draft.id.0, "updated quote");
                self.close_edit_modal();
                self.notify(Notice::info(NoticeContext::Update, "Quote updated successfully"));
                self.resync_after_save(draft.id, stored).await;
            }
            Err(err) if err.is_rejection() => {
                warn!(quote_id = draft.id.0, error = %err, "update rejected");
                self.notify(Notice::error(NoticeContext::Update, "Failed to update quote"));
            }
            Err(err) => {
                error!(quote_id = draft.id.0, error = %err, "update error");
                self.notify(Notice::error(NoticeContext::Update, "Error updating quote"));
            }
        }
    }

    /// Handles a change of the "shorts only" toggle.
    pub async fn set_shorts_filter(&mut self, shorts_only: bool) {
        self.state.apply(ViewEvent::FilterChanged(shorts_only));
        self.load_quotes().await;
    }

    /// Re-fetches the list with the current filter.
    pub async fn refresh(&mut self) {
        self.load_quotes().await;
    }

    pub async fn download_quotes(&mut self, format: ExportFormat) {
        match self.api.export_url(format) {
            Ok(url) => {
                debug!(%url, "navigating to export");
                self.shell.navigate(&url).await;
            }
            Err(err) => {
                error!(%format, error = %err, "export link error");
                self.notify(Notice::error(NoticeContext::Export, "Error exporting quotes"));
            }
        }
    }

    /// Patches the saved record in place. The shorts filter is defined by the server, so an
    /// edit may move a record in or out of it; with the filter on, the list is re-fetched.
    async fn resync_after_save(&mut self, id: QuoteId, stored: Option<QuoteRecord>) {
        match stored {
            Some(record) if record.id == id && !self.state.shorts_only() => {
                self.state.apply(ViewEvent::QuotePatched(record));
            }
            _ => {
                if let Err(err) = self.fetch_quotes().await {
                    warn!(quote_id = id.0, error = %err, "list refresh after save failed");
                    self.notify(Notice::warning(
                        NoticeContext::Filter,
                        "Quote saved, but the list could not be refreshed",
                    ));
                }
            }
        }
    }

    async fn load_quotes(&mut self) {
        let shorts_only = self.state.shorts_only();
        match self.fetch_quotes().await {
            Ok(()) => {}
            Err(err) if err.is_rejection() => {
                warn!(shorts_only, error = %err, "quote list rejected");
                self.notify(Notice::error(NoticeContext::Filter, "Failed to filter quotes"));
            }
            Err(err) => {
                error!(shorts_only, error = %err, "filter error");
                self.notify(Notice::error(NoticeContext::Filter, "Error filtering quotes"));
            }
        }
    }

    /// Replaces the list only once a successful, parseable response is in hand.
    async fn fetch_quotes(&mut self) -> Result<(), ClientError> {
        let shorts_only = self.state.shorts_only();
        let quotes = self.api.list_quotes(shorts_only).await?;
        debug!(shorts_only, count = quotes.len(), "loaded quotes");
        self.state.apply(ViewEvent::QuotesLoaded(quotes));
        Ok(())
    }

    fn notify(&mut self, notice: Notice) {
        self.shell.notify(&notice);
        self.state.apply(ViewEvent::Notified(notice));
    }
}

#[cfg(test)]
#[path = "../tests/controller_tests.rs"]
mod tests;
