//! Markup for the quote list.

use std::fmt::Write as _;

use chrono::{DateTime, FixedOffset, Utc};
use shared::protocol::QuoteRecord;

/// Indian Standard Time. No daylight saving, so a fixed offset is exact.
const DISPLAY_UTC_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;
/// Long weekday, long month, numeric day, 12-hour clock.
const DISPLAY_FORMAT: &str = "%A, %B %-d, %-I:%M %p";
const INVALID_TIMESTAMP: &str = "Invalid Date";

pub fn display_timestamp(timestamp: DateTime<Utc>) -> String {
    match FixedOffset::east_opt(DISPLAY_UTC_OFFSET_SECS) {
        Some(offset) => timestamp
            .with_timezone(&offset)
            .format(DISPLAY_FORMAT)
            .to_string(),
        None => timestamp.format(DISPLAY_FORMAT).to_string(),
    }
}

/// Display text for a record's creation time.
pub fn display_generated_at(timestamp: Option<DateTime<Utc>>) -> String {
    timestamp
        .map(display_timestamp)
        .unwrap_or_else(|| INVALID_TIMESTAMP.to_string())
}

pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// One `<div class="quote">` per record, in the order given. Action buttons carry only the
/// quote id; the record itself stays in the view state.
pub fn render_quotes(quotes: &[QuoteRecord]) -> String {
    quotes.iter().map(render_quote).collect()
}

pub fn render_quote(record: &QuoteRecord) -> String {
    format!(
        concat!(
            "<div class=\"quote\" id=\"{element_id}\">\n",
            "    <p>\"{quote}\"</p>\n",
            "    <p class=\"author\">- {author}</p>\n",
            "    <p class=\"prompt\"><strong>Image Prompt:</strong> {image_prompt}</p>\n",
            "    <p><strong>Style:</strong> {image_style}</p>\n",
            "    <p><strong>Keywords:</strong> {keywords}</p>\n",
            "    <p><strong>Generated At:</strong> {generated_at}</p>\n",
            "    <button data-action=\"delete\" data-quote-id=\"{id}\">Delete</button>\n",
            "    <button data-action=\"edit\" data-quote-id=\"{id}\">Edit</button>\n",
            "</div>\n",
        ),
        element_id = record.id.element_id(),
        quote = escape_html(&record.quote),
        author = escape_html(&record.author),
        image_prompt = escape_html(&record.image_prompt),
        image_style = escape_html(&record.image_style),
        keywords = escape_html(&record.keywords),
        generated_at = escape_html(&display_generated_at(record.timestamp)),
        id = record.id.0,
    )
}

/// Terminal rendering of the same list.
pub fn render_plain(quotes: &[QuoteRecord]) -> String {
    if quotes.is_empty() {
        return "No quotes.\n".to_string();
    }
    let mut out = String::new();
    for record in quotes {
        let _ = writeln!(out, "[{}] \"{}\"", record.id, record.quote);
        let _ = writeln!(out, "    - {}", record.author);
        let _ = writeln!(out, "    Image Prompt: {}", record.image_prompt);
        let _ = writeln!(out, "    Style: {}", record.image_style);
        let _ = writeln!(out, "    Keywords: {}", record.keywords);
        let _ = writeln!(
            out,
            "    Generated At: {}",
            display_generated_at(record.timestamp)
        );
    }
    out
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
