//! View events and user-facing notices.

use shared::{
    domain::{EditField, QuoteId},
    protocol::QuoteRecord,
};

use super::state::EditDraft;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    FilterChanged(bool),
    QuotesLoaded(Vec<QuoteRecord>),
    QuoteRemoved(QuoteId),
    QuotePatched(QuoteRecord),
    EditOpened(EditDraft),
    EditFieldChanged { field: EditField, value: String },
    EditClosed,
    Notified(Notice),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeSeverity {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeContext {
    Delete,
    Update,
    Filter,
    Edit,
    Export,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    severity: NoticeSeverity,
    context: NoticeContext,
    message: String,
}

impl Notice {
    pub fn info(context: NoticeContext, message: impl Into<String>) -> Self {
        Self::new(NoticeSeverity::Info, context, message)
    }

    pub fn warning(context: NoticeContext, message: impl Into<String>) -> Self {
        Self::new(NoticeSeverity::Warning, context, message)
    }

    pub fn error(context: NoticeContext, message: impl Into<String>) -> Self {
        Self::new(NoticeSeverity::Error, context, message)
    }

    fn new(severity: NoticeSeverity, context: NoticeContext, message: impl Into<String>) -> Self {
        Self {
            severity,
            context,
            message: message.into(),
        }
    }

    pub fn severity(&self) -> NoticeSeverity {
        self.severity
    }

    pub fn context(&self) -> NoticeContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_error(&self) -> bool {
        self.severity == NoticeSeverity::Error
    }
}
