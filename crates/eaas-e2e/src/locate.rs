// Resilient element location
//
// Some landmarks (the notification bell, the chat send button, plan cards)
// have no stable markup contract. A `Locate` lists the ways such an element
// may be found, most semantic first, and tries them in order until one
// yields a visible element or the time budget runs out.
//
// Outcomes are typed: `Probe::Absent` means every strategy was checked
// repeatedly for the whole budget and nothing visible matched. Any other
// browser failure is an error and fails the scenario.

use crate::error::{E2eError, Result};
use crate::wait;
use playwright_rs::{Locator, Page, expect};
use regex::{Regex, RegexBuilder};
use std::time::Duration;
use tracing::debug;

/// Case-insensitive match over a family of synonymous labels.
///
/// `phrase` patterns must cover the whole (trimmed) text, which keeps a
/// "Login" button pattern from matching a paragraph that mentions logging
/// in. `words` patterns only need one label to appear on word boundaries.
#[derive(Debug, Clone)]
pub struct TextPattern {
    source: String,
    regex: Regex,
}

impl TextPattern {
    /// Whole-text match against any of `labels`.
    pub fn phrase(labels: &[&str]) -> Self {
        Self::build(format!(r"^\s*(?:{})\s*$", alternation(labels)))
    }

    /// Word-bounded substring match against any of `labels`.
    pub fn words(labels: &[&str]) -> Self {
        Self::build(format!(r"\b(?:{})\b", alternation(labels)))
    }

    fn build(source: String) -> Self {
        let regex = RegexBuilder::new(&source)
            .case_insensitive(true)
            .build()
            .unwrap_or_else(|e| panic!("escaped label pattern must compile: {e}"));
        Self { source, regex }
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// The pattern as a Playwright `:text-matches()` pseudo-class.
    pub fn selector_suffix(&self) -> String {
        let quoted = self.source.replace('\\', r"\\").replace('"', "\\\"");
        format!(r#":text-matches("{quoted}", "i")"#)
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

fn alternation(labels: &[&str]) -> String {
    labels
        .iter()
        .map(|label| {
            // Spaces in a label tolerate any run of whitespace in the page text.
            label
                .split_whitespace()
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(r"\s+")
        })
        .collect::<Vec<_>>()
        .join("|")
}

/// Splits a CSS selector list on its top-level commas.
///
/// Commas inside quotes, brackets or parentheses (`[aria-label='a, b']`,
/// `:is(p, li)`) belong to the enclosing selector.
fn split_selector_list(list: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;
    for (i, c) in list.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(c),
            (None, '(' | '[') => depth += 1,
            (None, ')' | ']') => depth = depth.saturating_sub(1),
            (None, ',') if depth == 0 => {
                parts.push(list[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(list[start..].trim());
    parts.retain(|part| !part.is_empty());
    parts
}

/// One way of finding an element.
#[derive(Debug, Clone)]
pub enum Strategy {
    /// Plain CSS, expected to use semantic attributes
    /// (`placeholder`, `name`, `type`, `aria-label`, `href*=`).
    Css(String),
    /// Elements matching `scope` whose text matches `pattern`.
    Text { scope: String, pattern: TextPattern },
    /// `target` elements living in the same parent container as `anchor`.
    SiblingOf { anchor: String, target: String },
    /// First visible `candidates` element whose trimmed text is at most
    /// `max_text_len` characters, e.g. an icon-only button. `candidates` is
    /// plain CSS, evaluated with `querySelectorAll`.
    IconOnly {
        candidates: String,
        max_text_len: usize,
    },
}

impl Strategy {
    /// Selector for the selector-based strategies; `None` for `IconOnly`,
    /// which needs to inspect candidate text.
    pub fn selector(&self) -> Option<String> {
        match self {
            Strategy::Css(css) => Some(css.clone()),
            Strategy::Text { scope, pattern } => {
                let suffix = pattern.selector_suffix();
                let each: Vec<String> = split_selector_list(scope)
                    .into_iter()
                    .map(|part| format!("{part}{suffix}"))
                    .collect();
                Some(each.join(", "))
            }
            Strategy::SiblingOf { anchor, target } => {
                Some(format!("{anchor} >> nth=0 >> xpath=.. >> {target}"))
            }
            Strategy::IconOnly { .. } => None,
        }
    }

    /// Checks once, without waiting, for a visible match.
    async fn visible_match(&self, page: &Page) -> Result<Option<Locator>> {
        match self {
            Strategy::IconOnly {
                candidates,
                max_text_len,
            } => {
                // One evaluation reads every candidate, so a node that
                // detaches mid-scan cannot stall on an auto-waiting read.
                let raw = page.evaluate_value(&text_lengths_script(candidates)?).await?;
                let lengths: Vec<Option<usize>> = serde_json::from_str(&raw)?;
                Ok(match first_short_text(&lengths, *max_text_len) {
                    Some(index) => Some(page.locator(candidates).await.nth(index as i32)),
                    None => None,
                })
            }
            other => {
                let selector = other
                    .selector()
                    .ok_or_else(|| E2eError::Assertion("strategy without selector".into()))?;
                let first = page.locator(&selector).await.first();
                Ok(first.is_visible().await?.then_some(first))
            }
        }
    }
}

/// Script returning, for each element matching the CSS `candidates`, the
/// length in characters of its trimmed rendered text, or `null` when the
/// element is not visible.
fn text_lengths_script(candidates: &str) -> Result<String> {
    let selector = serde_json::to_string(candidates)?;
    Ok(format!(
        "JSON.stringify(Array.from(document.querySelectorAll({selector})).map((el) => {{ \
            const box = el.getBoundingClientRect(); \
            const style = window.getComputedStyle(el); \
            if (box.width === 0 || box.height === 0 || style.visibility === 'hidden') return null; \
            return Array.from((el.innerText || '').trim()).length; }}))"
    ))
}

/// Index of the first visible candidate whose text fits in `max_text_len`.
fn first_short_text(lengths: &[Option<usize>], max_text_len: usize) -> Option<usize> {
    lengths
        .iter()
        .position(|len| matches!(len, Some(n) if *n <= max_text_len))
}

/// Result of a bounded probe.
#[derive(Debug, Clone)]
pub enum Probe {
    /// A visible element was found by the strategy at index `strategy`.
    Found { locator: Locator, strategy: usize },
    /// Nothing visible matched within the probe budget.
    Absent,
}

impl Probe {
    pub fn is_found(&self) -> bool {
        matches!(self, Probe::Found { .. })
    }

    pub fn locator(&self) -> Option<&Locator> {
        match self {
            Probe::Found { locator, .. } => Some(locator),
            Probe::Absent => None,
        }
    }

    pub fn into_locator(self) -> Option<Locator> {
        match self {
            Probe::Found { locator, .. } => Some(locator),
            Probe::Absent => None,
        }
    }
}

/// An ordered list of strategies for one landmark.
#[derive(Debug, Clone)]
pub struct Locate {
    what: String,
    strategies: Vec<Strategy>,
}

impl Locate {
    pub fn new(what: impl Into<String>) -> Self {
        Self {
            what: what.into(),
            strategies: Vec::new(),
        }
    }

    pub fn css(mut self, selector: impl Into<String>) -> Self {
        self.strategies.push(Strategy::Css(selector.into()));
        self
    }

    pub fn text(mut self, scope: impl Into<String>, pattern: TextPattern) -> Self {
        self.strategies.push(Strategy::Text {
            scope: scope.into(),
            pattern,
        });
        self
    }

    pub fn sibling_of(mut self, anchor: impl Into<String>, target: impl Into<String>) -> Self {
        self.strategies.push(Strategy::SiblingOf {
            anchor: anchor.into(),
            target: target.into(),
        });
        self
    }

    pub fn icon_only(mut self, candidates: impl Into<String>, max_text_len: usize) -> Self {
        self.strategies.push(Strategy::IconOnly {
            candidates: candidates.into(),
            max_text_len,
        });
        self
    }

    pub fn what(&self) -> &str {
        &self.what
    }

    pub fn strategies(&self) -> &[Strategy] {
        &self.strategies
    }

    /// Tries every strategy, in order, until one matches or `timeout` elapses.
    ///
    /// Each polling round walks the whole list so an earlier strategy wins
    /// over a later one whenever both match in the same round.
    pub async fn probe(&self, page: &Page, timeout: Duration) -> Result<Probe> {
        let found = wait::until(&self.what, timeout, || async move {
            for (index, strategy) in self.strategies.iter().enumerate() {
                if let Some(locator) = strategy.visible_match(page).await? {
                    return Ok(Some((locator, index)));
                }
            }
            Ok::<_, E2eError>(None)
        })
        .await;

        match found {
            Ok((locator, strategy)) => {
                debug!(what = %self.what, strategy, selector = locator.selector(), "located");
                Ok(Probe::Found { locator, strategy })
            }
            Err(E2eError::Timeout { .. }) => {
                debug!(what = %self.what, ?timeout, "not present");
                Ok(Probe::Absent)
            }
            Err(e) => Err(e),
        }
    }

    /// Like [`probe`](Self::probe), but absence is a hard failure.
    pub async fn find(&self, page: &Page, timeout: Duration) -> Result<Locator> {
        self.probe(page, timeout)
            .await?
            .into_locator()
            .ok_or_else(|| E2eError::timeout(format!("{} to be visible", self.what), timeout))
    }
}

/// Bounded visibility probe for a single-element locator.
///
/// Returns `Ok(false)` only when the element stayed invisible for the whole
/// budget; other failures propagate.
pub async fn probe_visible(locator: &Locator, timeout: Duration) -> Result<bool> {
    match expect(locator.clone())
        .with_timeout(timeout)
        .to_be_visible()
        .await
    {
        Ok(()) => Ok(true),
        Err(playwright_rs::Error::AssertionTimeout(_)) => Ok(false),
        Err(e) => Err(e.into()),
    }
}
