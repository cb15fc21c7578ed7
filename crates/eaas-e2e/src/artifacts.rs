// Scenario artifacts
//
// Screenshots (informational, never asserted on) and captured downloads,
// both written under the configured results directory.

use crate::error::Result;
use playwright_rs::protocol::Download;
use playwright_rs::{Page, ScreenshotOptions};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info};

static INVOICE_FILENAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(invoice|bill|receipt)[\w\-. ]*\.(pdf|html?|csv|txt)$")
        .unwrap_or_else(|e| panic!("invoice filename pattern must compile: {e}"))
});

/// Whether a suggested download filename looks like an invoice.
pub fn is_invoice_filename(name: &str) -> bool {
    INVOICE_FILENAME.is_match(name)
}

/// Layout of the results directory.
#[derive(Debug, Clone)]
pub struct ResultsDir {
    root: PathBuf,
}

impl ResultsDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn screenshots(&self) -> PathBuf {
        self.root.join("screenshots")
    }

    pub fn downloads(&self) -> PathBuf {
        self.root.join("downloads")
    }

    /// Full-page screenshot saved as `screenshots/<name>.png`.
    pub async fn screenshot(&self, page: &Page, name: &str) -> Result<PathBuf> {
        let dir = self.screenshots();
        tokio::fs::create_dir_all(&dir).await?;
        let path = dir.join(format!("{}.png", file_stem(name)));

        let options = ScreenshotOptions::builder().full_page(true).build();
        page.screenshot_to_file(&path, Some(options)).await?;
        debug!(path = %path.display(), "screenshot saved");
        Ok(path)
    }

    /// Saves `download` as `downloads/<suggested filename>`.
    pub async fn save_download(&self, download: &Download) -> Result<PathBuf> {
        let dir = self.downloads();
        tokio::fs::create_dir_all(&dir).await?;
        let path = dir.join(file_stem(download.suggested_filename()));
        download.save_as(&path).await?;
        info!(path = %path.display(), url = download.url(), "download saved");
        Ok(path)
    }
}

/// Reduces `name` to characters safe in a file name on every platform.
fn file_stem(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '-'
            }
        })
        .collect();
    let trimmed = cleaned.trim_matches(|c| c == '-' || c == '.');
    if trimmed.is_empty() {
        "artifact".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Subscription to the page's download events.
///
/// Arm it before the click that triggers the download, then wait for the
/// next event with a bounded timeout.
pub struct DownloadCapture {
    rx: mpsc::UnboundedReceiver<Download>,
}

impl DownloadCapture {
    pub async fn arm(page: &Page) -> Result<Self> {
        let (tx, rx) = mpsc::unbounded_channel();
        page.on_download(move |download| {
            let tx = tx.clone();
            async move {
                // Receiver gone means the scenario stopped listening.
                let _ = tx.send(download);
                Ok(())
            }
        })
        .await?;
        Ok(Self { rx })
    }

    /// Next download, or `None` if none started within `timeout`.
    pub async fn next(&mut self, timeout: Duration) -> Option<Download> {
        match tokio::time::timeout(timeout, self.rx.recv()).await {
            Ok(download) => download,
            Err(_) => {
                debug!(?timeout, "no download event");
                None
            }
        }
    }
}
