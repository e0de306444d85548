//! Host surface the controller talks to: confirmation prompts, notices, navigation.

use std::{
    path::{Path, PathBuf},
    sync::Mutex,
};

use anyhow::{Context, Result};
use async_trait::async_trait;
use client_core::QuotesClient;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, error, info};
use url::Url;

use crate::controller::{Notice, NoticeContext, NoticeSeverity};

#[async_trait]
pub trait Shell: Send + Sync {
    /// Blocks the current action until the user answers.
    async fn confirm(&self, prompt: &str) -> bool;
    fn notify(&self, notice: &Notice);
    /// Hands a URL to the host. The controller does not observe the outcome.
    async fn navigate(&self, url: &Url);
}

/// Shell for the command line: prompts on stdin, reports on stderr, and saves navigated
/// export links as files.
pub struct TerminalShell {
    client: QuotesClient,
    export_dir: PathBuf,
    assume_yes: bool,
    last_notice: Mutex<Option<Notice>>,
}

impl TerminalShell {
    pub fn new(client: QuotesClient, export_dir: impl Into<PathBuf>, assume_yes: bool) -> Self {
        Self {
            client,
            export_dir: export_dir.into(),
            assume_yes,
            last_notice: Mutex::new(None),
        }
    }

    /// Most recent notice shown, from the controller or from a download.
    pub fn last_notice(&self) -> Option<Notice> {
        self.last_notice
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    async fn save_download(&self, url: &Url) -> Result<PathBuf> {
        let download = self.client.download(url).await?;
        let filename = download
            .filename
            .as_deref()
            .and_then(safe_filename)
            .or_else(|| {
                url.path_segments()
                    .and_then(|mut segments| segments.next_back())
                    .and_then(safe_filename)
            })
            .unwrap_or_else(|| "download".to_string());
        tokio::fs::create_dir_all(&self.export_dir)
            .await
            .with_context(|| format!("failed to create {}", self.export_dir.display()))?;
        let path = self.export_dir.join(filename);
        tokio::fs::write(&path, &download.bytes)
            .await
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(path)
    }
}

#[async_trait]
impl Shell for TerminalShell {
    async fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        eprint!("{prompt} [y/N] ");
        let mut line = String::new();
        let mut stdin = BufReader::new(tokio::io::stdin());
        match stdin.read_line(&mut line).await {
            Ok(_) => is_affirmative(&line),
            Err(err) => {
                error!(error = %err, "failed to read confirmation");
                false
            }
        }
    }

    fn notify(&self, notice: &Notice) {
        let label = match notice.severity() {
            NoticeSeverity::Info => "ok",
            NoticeSeverity::Warning => "warning",
            NoticeSeverity::Error => "error",
        };
        debug!(context = ?notice.context(), label, "notice");
        eprintln!("{label}: {}", notice.message());
        if let Ok(mut last) = self.last_notice.lock() {
            *last = Some(notice.clone());
        }
    }

    async fn navigate(&self, url: &Url) {
        match self.save_download(url).await {
            Ok(path) => {
                info!(%url, path = %path.display(), "saved download");
                self.notify(&Notice::info(
                    NoticeContext::Export,
                    format!("Saved {}", path.display()),
                ));
            }
            Err(err) => {
                error!(%url, error = ?err, "download failed");
                self.notify(&Notice::error(NoticeContext::Export, "Error downloading quotes"));
            }
        }
    }
}

pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Keeps only the final path component so a server-supplied name cannot escape the
/// export directory.
fn safe_filename(raw: &str) -> Option<String> {
    let name = Path::new(raw.trim()).file_name()?.to_str()?;
    (!name.is_empty() && name != "..").then(|| name.to_string())
}

#[cfg(test)]
#[path = "tests/shell_tests.rs"]
mod tests;
