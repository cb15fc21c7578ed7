//! Session bootstrap.
//!
//! Drives the login form the way a user would and waits for the redirect to
//! the authenticated landing route. The token format is the application's
//! business; callers only rely on authenticated routes becoming reachable.

use crate::error::{E2eError, Result};
use crate::fixture::ScenarioPage;
use crate::landmarks;
use crate::locate::Probe;
use crate::routes::AppRoute;
use crate::test_data::Credentials;
use crate::{NAVIGATION_TIMEOUT, PROBE_TIMEOUT, SHORT_ELEMENT_TIMEOUT};
use tracing::{debug, info};

/// Local storage key holding the session token
pub const TOKEN_KEY: &str = "token";

/// What the login form did after submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginAttempt {
    /// The application navigated to the dashboard.
    Redirected,
    /// The form stayed on `/login` and showed an error affordance.
    Rejected { url: String },
    /// The form stayed on `/login` without a visible error.
    Stayed { url: String },
}

/// Fills and submits the login form without waiting for the outcome.
pub async fn submit_login(page: &ScenarioPage, credentials: &Credentials) -> Result<()> {
    page.goto(&AppRoute::Login).await?;

    let email = page
        .find(&landmarks::email_input(), SHORT_ELEMENT_TIMEOUT)
        .await?;
    email.fill(&credentials.email, None).await?;

    let password = page
        .find(&landmarks::password_input(), SHORT_ELEMENT_TIMEOUT)
        .await?;
    password.fill(&credentials.password, None).await?;

    let submit = page
        .find(&landmarks::submit_button(), SHORT_ELEMENT_TIMEOUT)
        .await?;
    debug!(email = %credentials.email, "submitting login form");
    submit.click(None).await?;
    Ok(())
}

/// Logs in and waits for `/dashboard`.
///
/// A missing redirect is a hard failure: broken authentication must never
/// look like a skipped scenario.
pub async fn login(page: &ScenarioPage, credentials: &Credentials) -> Result<()> {
    submit_login(page, credentials).await?;
    page.expect_url(&AppRoute::Dashboard.path())
        .await
        .map_err(|e| e.context(format!("login as {}", credentials.email)))?;
    info!(email = %credentials.email, "logged in");
    Ok(())
}

/// Logs in as the seeded demo account.
pub async fn login_as_demo(page: &ScenarioPage) -> Result<()> {
    login(page, Credentials::valid_user()).await
}

/// Submits `credentials` and reports what the form did.
///
/// Used by scenarios that expect the login to be refused.
pub async fn attempt_login(page: &ScenarioPage, credentials: &Credentials) -> Result<LoginAttempt> {
    submit_login(page, credentials).await?;

    let rejected = page
        .probe_within(&landmarks::error_message(), SHORT_ELEMENT_TIMEOUT)
        .await?
        .is_found();
    let url = page.url();

    Ok(if url.contains(&AppRoute::Dashboard.path()) {
        LoginAttempt::Redirected
    } else if rejected {
        LoginAttempt::Rejected { url }
    } else {
        LoginAttempt::Stayed { url }
    })
}

/// Clicks the logout control and waits for `/login`.
///
/// The control may sit behind a user menu; the menu is opened when the
/// control is not directly visible.
pub async fn logout(page: &ScenarioPage) -> Result<()> {
    let control = match page.probe(&landmarks::logout_control()).await? {
        Probe::Found { locator, .. } => locator,
        Probe::Absent => {
            let menu = page
                .probe(&landmarks::user_menu())
                .await?
                .into_locator()
                .ok_or_else(|| E2eError::timeout("logout control or user menu", PROBE_TIMEOUT))?;
            menu.click(None).await?;
            page.find(&landmarks::logout_control(), SHORT_ELEMENT_TIMEOUT)
                .await?
        }
    };

    control.click(None).await?;
    wait_for_login_route(page).await?;
    info!("logged out");
    Ok(())
}

/// Waits for the login route, e.g. after logout or an unauthenticated visit.
pub async fn wait_for_login_route(page: &ScenarioPage) -> Result<String> {
    crate::wait::url_contains(
        page.page(),
        &AppRoute::Login.path(),
        page.timeout(NAVIGATION_TIMEOUT),
    )
    .await
}

/// The session token, if the application stored a non-empty one.
pub async fn stored_token(page: &ScenarioPage) -> Result<Option<String>> {
    page.local_storage(TOKEN_KEY).await
}
