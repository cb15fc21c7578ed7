// Suite configuration
//
// Everything the suite needs to know about its environment: where the
// application under test lives, which browser to drive, where to write
// artifacts and how much to stretch the built-in timeouts on slow machines.

use crate::error::{E2eError, Result};
use playwright_rs::Viewport;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

/// Environment variable holding the frontend base URL
pub const BASE_URL_VAR: &str = "EAAS_BASE_URL";
/// Environment variable selecting the browser engine
pub const BROWSER_VAR: &str = "BROWSER";
/// Environment variable toggling headless mode
pub const HEADLESS_VAR: &str = "HEADLESS";
/// Environment variable for the artifacts directory
pub const RESULTS_DIR_VAR: &str = "EAAS_RESULTS_DIR";
/// Environment variable for the timeout multiplier
pub const TIMEOUT_SCALE_VAR: &str = "EAAS_TIMEOUT_SCALE";
/// Environment variable for Playwright's slow-motion delay
pub const SLOW_MO_VAR: &str = "EAAS_SLOW_MO_MS";

const DEFAULT_BASE_URL: &str = "http://localhost:3000";
const DEFAULT_RESULTS_DIR: &str = "test-results";

/// Desktop viewport used when a scenario does not ask for a device profile
pub const DESKTOP_VIEWPORT: Viewport = Viewport {
    width: 1280,
    height: 720,
};

/// Browser engine driven by the suite
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BrowserKind {
    #[default]
    Chromium,
    Firefox,
    Webkit,
}

impl BrowserKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BrowserKind::Chromium => "chromium",
            BrowserKind::Firefox => "firefox",
            BrowserKind::Webkit => "webkit",
        }
    }
}

impl FromStr for BrowserKind {
    type Err = E2eError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chromium" | "chrome" => Ok(BrowserKind::Chromium),
            "firefox" => Ok(BrowserKind::Firefox),
            "webkit" | "safari" => Ok(BrowserKind::Webkit),
            other => Err(E2eError::Config(format!(
                "unknown browser '{other}' (expected chromium, firefox or webkit)"
            ))),
        }
    }
}

impl std::fmt::Display for BrowserKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration shared by every scenario of a suite run.
#[derive(Debug, Clone)]
pub struct SuiteConfig {
    base_url: Url,
    browser: BrowserKind,
    headless: bool,
    results_dir: PathBuf,
    timeout_scale: f64,
    slow_mo_ms: Option<f64>,
    viewport: Viewport,
}

impl SuiteConfig {
    /// Creates a configuration pointing at `base_url` with default settings.
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            browser: BrowserKind::default(),
            headless: true,
            results_dir: PathBuf::from(DEFAULT_RESULTS_DIR),
            timeout_scale: 1.0,
            slow_mo_ms: None,
            viewport: DESKTOP_VIEWPORT,
        })
    }

    /// Reads the configuration from the process environment.
    ///
    /// See the `*_VAR` constants for the recognised variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(BASE_URL_VAR).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let mut config = Self::new(&base_url)?;

        if let Some(browser) = lookup(BROWSER_VAR) {
            config.browser = browser.parse()?;
        }
        if let Some(headless) = lookup(HEADLESS_VAR) {
            config.headless = parse_bool(HEADLESS_VAR, &headless)?;
        }
        if let Some(dir) = lookup(RESULTS_DIR_VAR) {
            config.results_dir = PathBuf::from(dir);
        }
        if let Some(scale) = lookup(TIMEOUT_SCALE_VAR) {
            let scale: f64 = scale.trim().parse().map_err(|_| {
                E2eError::Config(format!("{TIMEOUT_SCALE_VAR} must be a number, got '{scale}'"))
            })?;
            config = config.with_timeout_scale(scale)?;
        }
        if let Some(slow_mo) = lookup(SLOW_MO_VAR) {
            let ms: f64 = slow_mo.trim().parse().map_err(|_| {
                E2eError::Config(format!("{SLOW_MO_VAR} must be a number, got '{slow_mo}'"))
            })?;
            config.slow_mo_ms = Some(ms);
        }

        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        self.base_url = parse_base_url(base_url)?;
        Ok(self)
    }

    pub fn with_browser(mut self, browser: BrowserKind) -> Self {
        self.browser = browser;
        self
    }

    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    pub fn with_results_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.results_dir = dir.into();
        self
    }

    /// Sets the multiplier applied to every built-in timeout.
    ///
    /// Must be a finite number greater than zero.
    pub fn with_timeout_scale(mut self, scale: f64) -> Result<Self> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(E2eError::Config(format!(
                "timeout scale must be a positive number, got {scale}"
            )));
        }
        self.timeout_scale = scale;
        Ok(self)
    }

    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn browser(&self) -> BrowserKind {
        self.browser
    }

    pub fn headless(&self) -> bool {
        self.headless
    }

    pub fn results_dir(&self) -> &std::path::Path {
        &self.results_dir
    }

    pub fn slow_mo_ms(&self) -> Option<f64> {
        self.slow_mo_ms
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport.clone()
    }

    /// Applies the configured timeout scale to `base`.
    pub fn scaled(&self, base: Duration) -> Duration {
        base.mul_f64(self.timeout_scale)
    }
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw.trim())?;
    if url.cannot_be_a_base() {
        return Err(E2eError::Config(format!("'{raw}' cannot be used as a base URL")));
    }
    // Route joining treats the base as a directory.
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn parse_bool(var: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(E2eError::Config(format!(
            "{var} must be a boolean, got '{other}'"
        ))),
    }
}
