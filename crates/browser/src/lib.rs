//! Chromium-backed [`PageDriver`](sprout_core::PageDriver) built on chromiumoxide.

pub mod chromium;
pub mod shared;

pub use chromium::{ChromiumPage, ChromiumSession};
pub use sprout_core::{BrowserConfig, TimeoutConfig};
