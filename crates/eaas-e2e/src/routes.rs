// Application routes
//
// The only part of the frontend's router the suite relies on.

use crate::error::Result;
use url::Url;

/// Routes of the application under test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppRoute {
    Home,
    Login,
    Register,
    Dashboard,
    Billing,
    Bill(String),
    Profile,
    Subscription,
    Support,
    Ticket(String),
    ServicesPlans,
    Onboarding,
    AiAdvisor,
}

impl AppRoute {
    /// Routes checked for layout overflow on every device profile
    pub const PRIMARY: [AppRoute; 6] = [
        AppRoute::Home,
        AppRoute::Login,
        AppRoute::Register,
        AppRoute::Dashboard,
        AppRoute::Billing,
        AppRoute::Support,
    ];

    /// Path component of the route, always starting with `/`.
    pub fn path(&self) -> String {
        match self {
            AppRoute::Home => "/".to_string(),
            AppRoute::Login => "/login".to_string(),
            AppRoute::Register => "/register".to_string(),
            AppRoute::Dashboard => "/dashboard".to_string(),
            AppRoute::Billing => "/billing".to_string(),
            AppRoute::Bill(id) => format!("/billing/{id}"),
            AppRoute::Profile => "/profile".to_string(),
            AppRoute::Subscription => "/subscription".to_string(),
            AppRoute::Support => "/support".to_string(),
            AppRoute::Ticket(id) => format!("/support/{id}"),
            AppRoute::ServicesPlans => "/services-plans".to_string(),
            AppRoute::Onboarding => "/onboarding".to_string(),
            AppRoute::AiAdvisor => "/ai-advisor".to_string(),
        }
    }

    /// Whether the route is only reachable with a session.
    pub fn requires_session(&self) -> bool {
        !matches!(self, AppRoute::Home | AppRoute::Login | AppRoute::Register)
    }

    /// Absolute URL of the route under `base`.
    ///
    /// `base` is treated as a directory, so a frontend mounted under a
    /// sub-path keeps its prefix.
    pub fn url(&self, base: &Url) -> Result<Url> {
        Ok(base.join(self.path().trim_start_matches('/'))?)
    }

    /// Whether `current` is this route under `base`, i.e. the page was not
    /// redirected elsewhere. Query, fragment and a trailing slash are ignored.
    pub fn is_at(&self, base: &Url, current: &str) -> bool {
        let (Ok(expected), Ok(current)) = (self.url(base), Url::parse(current)) else {
            return false;
        };
        expected.origin() == current.origin()
            && expected.path().trim_end_matches('/') == current.path().trim_end_matches('/')
    }
}

impl std::fmt::Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path())
    }
}
