// Shared test harness
//
// Each test binary includes this module with `mod common;`. A test calls
// `common::init_tracing()` and then `common::TestEnv::start()` to get a
// launched `Suite`. Without `EAAS_BASE_URL` the suite runs against the
// in-process stub application; with it, against the real deployment.

// Each test binary uses a different subset of these helpers.
#![allow(dead_code)]


use anyhow::Context;
use eaas_e2e::config::BASE_URL_VAR;
use eaas_e2e::{Outcome, Suite, SuiteConfig};
use std::path::Path;
use std::sync::Once;
use stub_app::{Seed, StubApp};

static TRACING: Once = Once::new();

/// Installs the fmt subscriber once per test binary.
///
/// Honours `RUST_LOG`; defaults to `info` for the suite and `warn` for the
/// rest.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn,eaas_e2e=info"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// A launched suite plus, when no external deployment is configured, the
/// stub application it points at.
pub struct TestEnv {
    suite: Suite,
    stub: Option<StubApp>,
}

impl TestEnv {
    /// Starts against `EAAS_BASE_URL`, or a freshly seeded stub.
    pub async fn start() -> anyhow::Result<Self> {
        Self::start_seeded(Seed::Demo).await
    }

    /// Like [`TestEnv::start`], with the stub seeded as `seed`.
    ///
    /// `seed` only matters for the stub; an external deployment owns its data.
    pub async fn start_seeded(seed: Seed) -> anyhow::Result<Self> {
        let config = SuiteConfig::from_env().context("reading suite configuration")?;
        Self::launch(seed, config).await
    }

    /// Like [`TestEnv::start`], writing screenshots and downloads under `dir`.
    pub async fn start_with_results(dir: &Path) -> anyhow::Result<Self> {
        let config = SuiteConfig::from_env()
            .context("reading suite configuration")?
            .with_results_dir(dir);
        Self::launch(Seed::Demo, config).await
    }

    async fn launch(seed: Seed, mut config: SuiteConfig) -> anyhow::Result<Self> {
        let stub = if std::env::var_os(BASE_URL_VAR).is_none() {
            let stub = StubApp::start(seed)
                .await
                .context("starting the stub EaaS app")?;
            config = config.with_base_url(&stub.url())?;
            Some(stub)
        } else {
            None
        };

        let suite = Suite::launch(config).await.context("launching the browser")?;
        Ok(Self { suite, stub })
    }

    pub fn suite(&self) -> &Suite {
        &self.suite
    }

    /// Whether scenarios run against the in-process stub.
    pub fn is_stub(&self) -> bool {
        self.stub.is_some()
    }

    pub async fn shutdown(self) -> anyhow::Result<()> {
        self.suite.shutdown().await?;
        if let Some(stub) = self.stub {
            stub.shutdown();
        }
        Ok(())
    }
}

/// Asserts a scenario passed.
///
/// Against the stub every precondition is seeded, so a skip there means a
/// selector or flow regressed. Against a real deployment skips are allowed.
pub fn expect_passed(env: &TestEnv, outcome: &Outcome) {
    if env.is_stub() {
        assert_eq!(outcome, &Outcome::Passed, "scenario skipped against the stub app");
    } else if let Outcome::Skipped(reason) = outcome {
        tracing::warn!(%reason, "scenario skipped");
    }
}
