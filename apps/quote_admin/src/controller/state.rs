//! Client-side view state. Every change goes through [`ViewState::apply`].

use shared::{
    domain::{EditField, QuoteId},
    protocol::{QuoteRecord, QuoteUpdate},
};

use super::events::{Notice, ViewEvent};

/// Editable copy of one quote while the edit form is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDraft {
    pub id: QuoteId,
    pub quote: String,
    pub author: String,
    pub image_prompt: String,
    pub image_style: String,
    pub keywords: String,
}

impl EditDraft {
    pub fn from_record(record: &QuoteRecord) -> Self {
        Self {
            id: record.id,
            quote: record.quote.clone(),
            author: record.author.clone(),
            image_prompt: record.image_prompt.clone(),
            image_style: record.image_style.clone(),
            keywords: record.keywords.clone(),
        }
    }

    pub fn set_field(&mut self, field: EditField, value: String) {
        let slot = match field {
            EditField::Quote => &mut self.quote,
            EditField::Author => &mut self.author,
            EditField::ImagePrompt => &mut self.image_prompt,
            EditField::ImageStyle => &mut self.image_style,
            EditField::Keywords => &mut self.keywords,
        };
        *slot = value;
    }

    pub fn to_update(&self) -> QuoteUpdate {
        QuoteUpdate {
            quote: self.quote.clone(),
            author: self.author.clone(),
            image_prompt: self.image_prompt.clone(),
            image_style: self.image_style.clone(),
            keywords: self.keywords.clone(),
        }
    }
}

/// The edit surface. Closing it only hides it; the draft stays until the next open.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditForm {
    pub draft: Option<EditDraft>,
    pub visible: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ViewState {
    quotes: Vec<QuoteRecord>,
    shorts_only: bool,
    edit: EditForm,
    last_notice: Option<Notice>,
}

impl ViewState {
    pub fn quotes(&self) -> &[QuoteRecord] {
        &self.quotes
    }

    pub fn quote(&self, id: QuoteId) -> Option<&QuoteRecord> {
        self.quotes.iter().find(|record| record.id == id)
    }

    pub fn shorts_only(&self) -> bool {
        self.shorts_only
    }

    pub fn edit(&self) -> &EditForm {
        &self.edit
    }

    pub fn last_notice(&self) -> Option<&Notice> {
        self.last_notice.as_ref()
    }

    pub fn apply(&mut self, event: ViewEvent) {
        match event {
            ViewEvent::FilterChanged(shorts_only) => self.shorts_only = shorts_only,
            ViewEvent::QuotesLoaded(quotes) => self.quotes = quotes,
            ViewEvent::QuoteRemoved(id) => {
                if let Some(index) = self.quotes.iter().position(|record| record.id == id) {
                    self.quotes.remove(index);
                }
            }
            ViewEvent::QuotePatched(record) => {
                if let Some(slot) = self.quotes.iter_mut().find(|slot| slot.id == record.id) {
                    *slot = record;
                }
            }
            ViewEvent::EditOpened(draft) => {
                self.edit.draft = Some(draft);
                self.edit.visible = true;
            }
            ViewEvent::EditFieldChanged { field, value } => {
                if let Some(draft) = self.edit.draft.as_mut() {
                    draft.set_field(field, value);
                }
            }
            ViewEvent::EditClosed => self.edit.visible = false,
            ViewEvent::Notified(notice) => self.last_notice = Some(notice),
        }
    }
}
