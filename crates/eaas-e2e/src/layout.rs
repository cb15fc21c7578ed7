// Layout measurements for responsive scenarios

use crate::error::Result;
use playwright_rs::Page;
use serde::Deserialize;

const MEASURE: &str = "JSON.stringify({ \
    viewportWidth: window.innerWidth, \
    documentWidth: document.documentElement.scrollWidth, \
    bodyWidth: document.body ? document.body.scrollWidth : 0 })";

/// Widths reported by the rendered document, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutMetrics {
    pub viewport_width: u32,
    pub document_width: u32,
    pub body_width: u32,
}

impl LayoutMetrics {
    /// Whether any content is wider than the viewport.
    pub fn overflows(&self) -> bool {
        self.document_width > self.viewport_width || self.body_width > self.viewport_width
    }

    /// Width of content beyond the viewport edge.
    pub fn overflow_px(&self) -> u32 {
        self.document_width
            .max(self.body_width)
            .saturating_sub(self.viewport_width)
    }
}

pub async fn measure(page: &Page) -> Result<LayoutMetrics> {
    let raw = page.evaluate_value(MEASURE).await?;
    Ok(serde_json::from_str(&raw)?)
}
