use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

id_newtype!(QuoteId);

impl QuoteId {
    /// Identifier of the rendered element that holds this quote.
    pub fn element_id(self) -> String {
        format!("quote-{}", self.0)
    }
}

/// One of the five fields an admin may change on a quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditField {
    Quote,
    Author,
    ImagePrompt,
    ImageStyle,
    Keywords,
}

impl EditField {
    pub fn wire_name(self) -> &'static str {
        match self {
            EditField::Quote => "quote",
            EditField::Author => "author",
            EditField::ImagePrompt => "image_prompt",
            EditField::ImageStyle => "image_style",
            EditField::Keywords => "keywords",
        }
    }
}
