use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::{
    domain::QuoteId,
    error::{ApiError, ErrorCode},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteRecord {
    pub id: QuoteId,
    pub quote: String,
    pub author: String,
    pub image_prompt: String,
    pub image_style: String,
    pub keywords: String,
    /// `None` when the stored value is not an RFC 3339 instant.
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl QuoteRecord {
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

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(serde_json::Value::as_str)
        .and_then(|text| DateTime::parse_from_rfc3339(text.trim()).ok())
        .map(|instant| instant.with_timezone(&Utc)))
}

/// Body of `PUT /api/quotes/{id}`. Field order is the wire order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteUpdate {
    pub quote: String,
    pub author: String,
    pub image_prompt: String,
    pub image_style: String,
    pub keywords: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }

    /// Filename the service attaches to this export.
    pub fn default_filename(self) -> &'static str {
        match self {
            ExportFormat::Json => "quotes.json",
            ExportFormat::Csv => "quotes.csv",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = ApiError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(ApiError::new(
                ErrorCode::Validation,
                format!("invalid export format {other:?}; use 'json' or 'csv'"),
            )),
        }
    }
}
