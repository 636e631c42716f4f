use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct TimeoutConfig {
    pub navigation: Duration,
    pub page_stable: Duration,
    pub check_interval: Duration,
    /// Pause after a click so price, image and option lists re-render
    pub settle_delay: Duration,
    /// How long a dismissible overlay may take to show up
    pub modal: Duration,
    /// Size and planter controls; short because absence is expected
    pub probe: Duration,
    /// Per-paragraph and per-price reads
    pub text_read: Duration,
    pub title: Duration,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            navigation: Duration::from_millis(30000),
            page_stable: Duration::from_millis(30000),
            check_interval: Duration::from_millis(100),
            settle_delay: Duration::from_millis(500),
            modal: Duration::from_millis(3000),
            probe: Duration::from_millis(500),
            text_read: Duration::from_millis(1000),
            title: Duration::from_millis(5000),
        }
    }
}

impl TimeoutConfig {
    pub fn with_navigation(mut self, ms: u64) -> Self {
        self.navigation = Duration::from_millis(ms);
        self
    }

    pub fn with_settle_delay(mut self, ms: u64) -> Self {
        self.settle_delay = Duration::from_millis(ms);
        self
    }

    pub fn fast() -> Self {
        Self {
            navigation: Duration::from_millis(20000),
            page_stable: Duration::from_millis(20000),
            check_interval: Duration::from_millis(50),
            settle_delay: Duration::from_millis(300),
            modal: Duration::from_millis(1500),
            probe: Duration::from_millis(300),
            text_read: Duration::from_millis(600),
            title: Duration::from_millis(3000),
        }
    }

    pub fn patient() -> Self {
        Self {
            navigation: Duration::from_millis(60000),
            page_stable: Duration::from_millis(60000),
            check_interval: Duration::from_millis(250),
            settle_delay: Duration::from_millis(1000),
            modal: Duration::from_millis(5000),
            probe: Duration::from_millis(1000),
            text_read: Duration::from_millis(2000),
            title: Duration::from_millis(10000),
        }
    }

    /// Everything zeroed; for in-memory pages that answer immediately.
    pub fn instant() -> Self {
        Self {
            navigation: Duration::ZERO,
            page_stable: Duration::ZERO,
            check_interval: Duration::ZERO,
            settle_delay: Duration::ZERO,
            modal: Duration::ZERO,
            probe: Duration::ZERO,
            text_read: Duration::ZERO,
            title: Duration::ZERO,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BrowserConfig {
    pub headless: bool,
    pub viewport_width: Option<u32>,
    pub viewport_height: Option<u32>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        // Desktop layout; the variant pickers collapse on narrow viewports.
        Self {
            headless: false,
            viewport_width: Some(1157),
            viewport_height: Some(1304),
        }
    }
}
