//! eaas-e2e: browser-driven end-to-end scenarios for the EaaS frontend
//!
//! This crate is the harness layer shared by the scenario files under
//! `tests/`: it establishes authenticated sessions, isolates every scenario
//! in its own browser context, locates elements whose markup is not a stable
//! contract, and bounds every wait.
//!
//! # Example
//!
//! ```ignore
//! use eaas_e2e::{AppRoute, Outcome, Suite, SuiteConfig, landmarks};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let suite = Suite::launch(SuiteConfig::from_env()?).await?;
//!
//!     suite
//!         .authenticated_scenario("billing lists bills", |page| async move {
//!             page.goto(&AppRoute::Billing).await?;
//!             if !page.probe(&landmarks::bill_item()).await?.is_found() {
//!                 return Ok(Outcome::skipped("no bills for the seeded account"));
//!             }
//!             Ok(Outcome::Passed)
//!         })
//!         .await?;
//!
//!     suite.shutdown().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Configuration
//!
//! See [`SuiteConfig::from_env`] for the environment variables the suite
//! reads (`EAAS_BASE_URL`, `BROWSER`, `HEADLESS`, ...).

use std::time::Duration;

pub mod artifacts;
pub mod config;
pub mod console;
mod error;
pub mod fixture;
pub mod landmarks;
pub mod layout;
pub mod locate;
pub mod routes;
pub mod session;
pub mod test_data;
pub mod wait;

/// Budget for probing optional elements before taking the alternate path.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Budget for expected elements on an already-loaded page.
pub const SHORT_ELEMENT_TIMEOUT: Duration = Duration::from_secs(5);

/// Budget for expected elements that depend on a backend round trip.
pub const ELEMENT_TIMEOUT: Duration = Duration::from_secs(10);

/// Budget for page-level navigation, redirects and network idle.
pub const NAVIGATION_TIMEOUT: Duration = Duration::from_secs(15);

/// Budget for slow asynchronous responses (AI advisor replies, payments).
pub const SLOW_RESPONSE_TIMEOUT: Duration = Duration::from_secs(15);

pub use error::{E2eError, Result};

pub use config::{BrowserKind, SuiteConfig};
pub use fixture::{Outcome, ScenarioPage, Suite};
pub use locate::{Locate, Probe, Strategy, TextPattern};
pub use routes::AppRoute;
pub use test_data::{Credentials, DeviceProfile, ScreenSize};
