//! Test data shared by every scenario.
//!
//! Records here are immutable after construction. The seeded accounts are
//! built once per process; registration payloads are minted per call with an
//! email that no earlier run (and no other call in this run) has used.

use playwright_rs::Viewport;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Login/registration payload for one account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

static VALID_USER: LazyLock<Credentials> = LazyLock::new(|| Credentials {
    email: "demo1@eaas.com".to_string(),
    password: "Demo@123".to_string(),
    name: Some("Demo User".to_string()),
    phone: None,
    address: None,
});

static INVALID_USER: LazyLock<Credentials> = LazyLock::new(|| Credentials {
    email: "invalid@eaas.com".to_string(),
    password: "WrongPassword123".to_string(),
    name: None,
    phone: None,
    address: None,
});

static REGISTRATION_COUNTER: AtomicU64 = AtomicU64::new(0);

impl Credentials {
    /// The seeded account every authenticated scenario logs in as.
    pub fn valid_user() -> &'static Credentials {
        &VALID_USER
    }

    /// An account the backend does not know.
    pub fn invalid_user() -> &'static Credentials {
        &INVALID_USER
    }

    /// A fresh registration payload with a process-unique email.
    ///
    /// The email combines the wall clock (distinct across runs) with a
    /// per-process counter (distinct across calls within a run).
    pub fn new_registration() -> Credentials {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        let seq = REGISTRATION_COUNTER.fetch_add(1, Ordering::Relaxed);

        Credentials {
            email: format!("test{millis}{seq}@eaas.com"),
            password: "Test@123".to_string(),
            name: Some("Test User".to_string()),
            phone: Some("9876543210".to_string()),
            address: Some("123 Test Street, Test City".to_string()),
        }
    }

    /// Same account with a different password.
    pub fn with_password(&self, password: &str) -> Credentials {
        Credentials {
            password: password.to_string(),
            ..self.clone()
        }
    }
}

/// Width and height of a device screen, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenSize {
    pub width: u32,
    pub height: u32,
}

impl From<ScreenSize> for Viewport {
    fn from(size: ScreenSize) -> Self {
        Viewport {
            width: size.width,
            height: size.height,
        }
    }
}

/// Target screen size class for responsive scenarios.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceProfile {
    pub name: &'static str,
    pub viewport: ScreenSize,
    /// Phones and tablets get touch and mobile emulation on their context.
    pub mobile: bool,
}

impl DeviceProfile {
    pub const IPHONE_12: DeviceProfile = DeviceProfile::handheld("iPhone 12", 390, 844);
    pub const GALAXY_S21: DeviceProfile = DeviceProfile::handheld("Samsung Galaxy S21", 360, 800);
    pub const IPAD: DeviceProfile = DeviceProfile::handheld("iPad", 768, 1024);
    pub const SMALL_PHONE: DeviceProfile = DeviceProfile::handheld("small phone", 320, 568);

    /// Every profile exercised by the mobile area.
    pub const ALL: [DeviceProfile; 4] = [
        DeviceProfile::IPHONE_12,
        DeviceProfile::GALAXY_S21,
        DeviceProfile::IPAD,
        DeviceProfile::SMALL_PHONE,
    ];

    const fn handheld(name: &'static str, width: u32, height: u32) -> Self {
        DeviceProfile {
            name,
            viewport: ScreenSize { width, height },
            mobile: true,
        }
    }

    /// Phones collapse navigation into a menu toggle; tablets may not.
    pub fn is_phone(&self) -> bool {
        self.viewport.width < 600
    }
}
