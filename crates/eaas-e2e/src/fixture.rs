// Scenario fixtures
//
// A `Suite` owns the Playwright driver and one browser. Every scenario gets
// a brand-new browser context (no cookies, storage or DOM carried over) and
// a `ScenarioPage` handed to it explicitly. The context is closed on every
// exit path of the scenario: success, error and panic alike.
//
// Architecture:
//   Suite::scenario               fresh context + page -> body
//   Suite::authenticated_scenario fresh context + page -> login -> body
//   Suite::scenario_on_device     same, with a device profile's viewport

use crate::artifacts::ResultsDir;
use crate::config::{BrowserKind, SuiteConfig};
use crate::error::{E2eError, Result};
use crate::locate::{self, Locate, Probe};
use crate::routes::AppRoute;
use crate::session;
use crate::test_data::DeviceProfile;
use crate::wait;
use crate::{NAVIGATION_TIMEOUT, PROBE_TIMEOUT};
use futures_util::FutureExt;
use playwright_rs::{
    Browser, BrowserContext, BrowserContextOptions, GotoOptions, LaunchOptions, Locator, Page,
    Playwright, Viewport, WaitUntil,
};
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// How a scenario ended, when it did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum Outcome {
    Passed,
    /// Preconditions were not met (e.g. no bill to operate on); nothing was
    /// asserted. Skips are not failures.
    Skipped(String),
}

impl Outcome {
    pub fn skipped(reason: impl Into<String>) -> Self {
        Outcome::Skipped(reason.into())
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Outcome::Skipped(_))
    }
}

/// Shape of the browser context a scenario runs in.
#[derive(Debug, Clone)]
struct ContextSpec {
    device: Option<DeviceProfile>,
    login: bool,
}

/// Browser session shared by the scenarios of one test binary.
pub struct Suite {
    playwright: Playwright,
    browser: Browser,
    config: Arc<SuiteConfig>,
    results: ResultsDir,
}

impl Suite {
    /// Starts Playwright and launches the configured browser.
    pub async fn launch(config: SuiteConfig) -> Result<Self> {
        let playwright = Playwright::launch()
            .await
            .map_err(|e| E2eError::from(e).context("starting Playwright"))?;

        let browser_type = match config.browser() {
            BrowserKind::Chromium => playwright.chromium(),
            BrowserKind::Firefox => playwright.firefox(),
            BrowserKind::Webkit => playwright.webkit(),
        };

        let mut options = LaunchOptions::new().headless(config.headless());
        if let Some(ms) = config.slow_mo_ms() {
            options = options.slow_mo(ms);
        }
        let browser = browser_type
            .launch_with_options(options)
            .await
            .map_err(|e| E2eError::from(e).context(format!("launching {}", config.browser())))?;

        info!(
            browser = %config.browser(),
            version = browser.version(),
            base_url = %config.base_url(),
            "suite ready"
        );

        let results = ResultsDir::new(config.results_dir());
        Ok(Self {
            playwright,
            browser,
            config: Arc::new(config),
            results,
        })
    }

    pub fn config(&self) -> &SuiteConfig {
        &self.config
    }

    pub fn results(&self) -> &ResultsDir {
        &self.results
    }

    /// Runs `body` on an unauthenticated page in a fresh context.
    pub async fn scenario<F, Fut>(&self, name: &str, body: F) -> Result<Outcome>
    where
        F: FnOnce(ScenarioPage) -> Fut,
        Fut: Future<Output = Result<Outcome>>,
    {
        let spec = ContextSpec {
            device: None,
            login: false,
        };
        self.run(name, spec, body).await
    }

    /// Runs `body` on a page already logged in as the seeded account.
    ///
    /// A login failure fails the scenario; it is never skipped.
    pub async fn authenticated_scenario<F, Fut>(&self, name: &str, body: F) -> Result<Outcome>
    where
        F: FnOnce(ScenarioPage) -> Fut,
        Fut: Future<Output = Result<Outcome>>,
    {
        let spec = ContextSpec {
            device: None,
            login: true,
        };
        self.run(name, spec, body).await
    }

    /// Runs `body` in a context emulating `device`.
    pub async fn scenario_on_device<F, Fut>(
        &self,
        name: &str,
        device: DeviceProfile,
        login: bool,
        body: F,
    ) -> Result<Outcome>
    where
        F: FnOnce(ScenarioPage) -> Fut,
        Fut: Future<Output = Result<Outcome>>,
    {
        let spec = ContextSpec {
            device: Some(device),
            login,
        };
        self.run(name, spec, body).await
    }

    async fn run<F, Fut>(&self, name: &str, spec: ContextSpec, body: F) -> Result<Outcome>
    where
        F: FnOnce(ScenarioPage) -> Fut,
        Fut: Future<Output = Result<Outcome>>,
    {
        info!(scenario = name, "starting");
        let started = Instant::now();

        let context = self.new_context(&spec).await?;
        let page = match context.new_page().await {
            Ok(page) => page,
            Err(e) => {
                close_context(&context, name).await;
                return Err(E2eError::from(e).context(format!("opening page for '{name}'")));
            }
        };
        let scenario = ScenarioPage {
            page,
            config: Arc::clone(&self.config),
            results: self.results.clone(),
            name: name.to_string(),
        };

        let driven = AssertUnwindSafe(drive(scenario.clone(), spec.login, body))
            .catch_unwind()
            .await;

        let failed = !matches!(driven, Ok(Ok(_)));
        if failed {
            if let Err(e) = scenario.screenshot("failure").await {
                warn!(scenario = name, "failure screenshot not captured: {e}");
            }
        }
        close_context(&context, name).await;

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match driven {
            Ok(Ok(Outcome::Passed)) => {
                info!(scenario = name, elapsed_ms, "passed");
                Ok(Outcome::Passed)
            }
            Ok(Ok(Outcome::Skipped(reason))) => {
                warn!(scenario = name, elapsed_ms, %reason, "skipped");
                Ok(Outcome::Skipped(reason))
            }
            Ok(Err(e)) => Err(e.context(format!("scenario '{name}'"))),
            Err(panic) => std::panic::resume_unwind(panic),
        }
    }

    async fn new_context(&self, spec: &ContextSpec) -> Result<BrowserContext> {
        let viewport = spec
            .device
            .map(|d| Viewport::from(d.viewport))
            .unwrap_or_else(|| self.config.viewport());

        let mut builder = BrowserContextOptions::builder()
            .viewport(viewport)
            .accept_downloads(true);
        if let Some(device) = spec.device {
            // Firefox rejects mobile emulation.
            if device.mobile && self.config.browser() != BrowserKind::Firefox {
                builder = builder.is_mobile(true).has_touch(true);
            }
        }

        let context = self
            .browser
            .new_context_with_options(builder.build())
            .await
            .map_err(|e| E2eError::from(e).context("creating browser context"))?;
        Ok(context)
    }

    /// Closes the browser and stops the Playwright driver.
    pub async fn shutdown(self) -> Result<()> {
        self.browser.close().await?;
        self.playwright.shutdown().await?;
        Ok(())
    }
}

async fn drive<F, Fut>(scenario: ScenarioPage, login: bool, body: F) -> Result<Outcome>
where
    F: FnOnce(ScenarioPage) -> Fut,
    Fut: Future<Output = Result<Outcome>>,
{
    if login {
        session::login_as_demo(&scenario)
            .await
            .map_err(|e| e.context("session bootstrap"))?;
    }
    body(scenario).await
}

async fn close_context(context: &BrowserContext, name: &str) {
    if let Err(e) = context.close().await {
        warn!(scenario = name, "closing browser context failed: {e}");
    }
}

/// The page a scenario drives, plus the suite settings it needs.
///
/// Cheap to clone; clones drive the same browser page.
#[derive(Clone)]
pub struct ScenarioPage {
    page: Page,
    config: Arc<SuiteConfig>,
    results: ResultsDir,
    name: String,
}

impl ScenarioPage {
    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn config(&self) -> &SuiteConfig {
        &self.config
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn results(&self) -> &ResultsDir {
        &self.results
    }

    /// `base` stretched by the configured timeout scale.
    pub fn timeout(&self, base: Duration) -> Duration {
        self.config.scaled(base)
    }

    pub fn url(&self) -> String {
        self.page.url()
    }

    /// Navigates to `route` and waits for the network to go idle.
    pub async fn goto(&self, route: &AppRoute) -> Result<()> {
        let url = route.url(self.config.base_url())?;
        let options = GotoOptions::new()
            .timeout(self.timeout(NAVIGATION_TIMEOUT))
            .wait_until(WaitUntil::NetworkIdle);
        self.page
            .goto(url.as_str(), Some(options))
            .await
            .map_err(|e| E2eError::from(e).context(format!("navigating to {route}")))?;
        Ok(())
    }

    /// Whether the page currently shows `route` rather than a redirect target.
    pub fn is_at(&self, route: &AppRoute) -> bool {
        route.is_at(self.config.base_url(), &self.page.url())
    }

    /// Reloads and waits for the network to go idle.
    pub async fn reload(&self) -> Result<()> {
        let options = GotoOptions::new()
            .timeout(self.timeout(NAVIGATION_TIMEOUT))
            .wait_until(WaitUntil::NetworkIdle);
        self.page.reload(Some(options)).await?;
        Ok(())
    }

    pub async fn locator(&self, selector: &str) -> Locator {
        self.page.locator(selector).await
    }

    /// Probes an optional landmark with the standard probe budget.
    pub async fn probe(&self, locate: &Locate) -> Result<Probe> {
        locate.probe(&self.page, self.timeout(PROBE_TIMEOUT)).await
    }

    /// Probes an optional landmark with a custom budget.
    pub async fn probe_within(&self, locate: &Locate, timeout: Duration) -> Result<Probe> {
        locate.probe(&self.page, self.timeout(timeout)).await
    }

    /// Finds a mandatory landmark; absence after `timeout` is a failure.
    pub async fn find(&self, locate: &Locate, timeout: Duration) -> Result<Locator> {
        locate.find(&self.page, self.timeout(timeout)).await
    }

    /// Bounded visibility probe of a single CSS selector (first match).
    pub async fn is_visible_within(&self, selector: &str, timeout: Duration) -> Result<bool> {
        let locator = self.page.locator(selector).await.first();
        locate::probe_visible(&locator, self.timeout(timeout)).await
    }

    /// Fills `selector` if it becomes visible within the probe budget.
    ///
    /// Returns whether the field existed.
    pub async fn fill_if_present(&self, selector: &str, value: &str) -> Result<bool> {
        let field = self.page.locator(selector).await.first();
        if !locate::probe_visible(&field, self.timeout(PROBE_TIMEOUT)).await? {
            return Ok(false);
        }
        field.fill(value, None).await?;
        Ok(true)
    }

    /// Waits for the URL to contain `fragment` within the navigation budget.
    pub async fn expect_url(&self, fragment: &str) -> Result<String> {
        wait::url_contains(&self.page, fragment, self.timeout(NAVIGATION_TIMEOUT)).await
    }

    /// Value of `key` in the page's local storage; `None` when unset or empty.
    pub async fn local_storage(&self, key: &str) -> Result<Option<String>> {
        let key = serde_json::to_string(key)?;
        let raw = self
            .page
            .evaluate_value(&format!("JSON.stringify(window.localStorage.getItem({key}))"))
            .await?;
        let value: Option<String> = serde_json::from_str(&raw)?;
        Ok(value.filter(|v| !v.is_empty()))
    }

    /// Screenshot named after the scenario and `label`.
    pub async fn screenshot(&self, label: &str) -> Result<PathBuf> {
        self.results
            .screenshot(&self.page, &format!("{}-{label}", self.name))
            .await
    }
}

impl std::fmt::Debug for ScenarioPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScenarioPage")
            .field("name", &self.name)
            .field("url", &self.page.url())
            .finish()
    }
}
