// Bounded waits
//
// Every asynchronous boundary in a scenario goes through one of these
// helpers. Each takes an explicit upper bound; none of them can block
// forever. Condition polling is preferred over fixed sleeps: `settle` is
// the only fixed delay and is reserved for animations.

use crate::error::{E2eError, Result};
use playwright_rs::{Locator, Page};
use regex::Regex;
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Interval between two evaluations of a polled condition
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Polls `check` until it yields `Some`, or fails after `timeout`.
///
/// `check` is always evaluated at least once, even with a zero timeout.
/// Errors returned by `check` abort the wait immediately.
pub async fn until<T, F, Fut>(what: &str, timeout: Duration, mut check: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>>>,
{
    let start = Instant::now();
    loop {
        if let Some(value) = check().await? {
            debug!(what, elapsed_ms = start.elapsed().as_millis() as u64, "condition met");
            return Ok(value);
        }
        if start.elapsed() >= timeout {
            return Err(E2eError::timeout(what, timeout));
        }
        trace!(what, "condition not met yet");
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}

/// Waits until the page URL contains `fragment`.
pub async fn url_contains(page: &Page, fragment: &str, timeout: Duration) -> Result<String> {
    let what = format!("url to contain '{fragment}'");
    until(&what, timeout, || async move {
        let url = page.url();
        Ok(url.contains(fragment).then_some(url))
    })
    .await
}

/// Waits until the page URL matches `pattern`.
pub async fn url_matches(page: &Page, pattern: &Regex, timeout: Duration) -> Result<String> {
    let what = format!("url to match /{}/", pattern.as_str());
    until(&what, timeout, || async move {
        let url = page.url();
        Ok(pattern.is_match(&url).then_some(url))
    })
    .await
}

/// Waits until the document reports `readyState == "complete"`.
///
/// Evaluation failures while a navigation is in flight count as "not ready
/// yet"; only the timeout ends the wait with an error.
pub async fn load_settled(page: &Page, timeout: Duration) -> Result<()> {
    until("document to finish loading", timeout, || async move {
        match page.evaluate_value("document.readyState").await {
            Ok(state) => Ok((state == "complete").then_some(())),
            Err(e) => {
                trace!("readyState unavailable: {e}");
                Ok(None)
            }
        }
    })
    .await
}

/// Waits until the trimmed inner text of `locator` differs from `previous`.
///
/// Used for polling-driven UI (live metrics, typing indicators) in place
/// of a fixed delay.
pub async fn text_changes(locator: &Locator, previous: &str, timeout: Duration) -> Result<String> {
    let what = format!("text of '{}' to change", locator.selector());
    until(&what, timeout, || async move {
        let current = locator.inner_text().await?;
        let current = current.trim();
        Ok::<_, E2eError>((current != previous.trim()).then(|| current.to_string()))
    })
    .await
}

/// Waits until `locator` matches at least `min` elements.
pub async fn count_at_least(locator: &Locator, min: usize, timeout: Duration) -> Result<usize> {
    let what = format!("at least {min} element(s) for '{}'", locator.selector());
    until(&what, timeout, || async move {
        let count = locator.count().await?;
        Ok::<_, E2eError>((count >= min).then_some(count))
    })
    .await
}

/// Fixed delay for genuinely time-based behaviour such as CSS transitions.
pub async fn settle(duration: Duration) {
    tokio::time::sleep(duration).await;
}
