//! Controller layer: view events, reducer-like state transitions, and request orchestration.

pub mod events;
pub mod orchestration;
pub mod state;

pub use events::{Notice, NoticeContext, NoticeSeverity};
pub use orchestration::QuoteListController;
