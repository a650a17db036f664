//! Immutable run configuration.
//!
//! One [`RunConfig`] value is built up front and passed by reference into the
//! engine; nothing mutates it mid-run. Every timeout, settle delay, and retry
//! constant lives here rather than inline at the call sites.

use crate::retry::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};

/// Tunables for one reconciliation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Ceiling for every retried interactive step
    pub max_attempts: u32,
    /// Fixed pause between retries, in milliseconds
    pub retry_interval_ms: u64,
    /// Wait ceiling for editor fields and controls
    pub wait_timeout_ms: u64,
    /// Wait ceiling for locating a section container
    pub locate_timeout_ms: u64,
    /// Pause after scrolling a row into view before clicking it
    pub click_settle_ms: u64,
    /// Pause after a delete click, letting the row list re-render
    pub delete_settle_ms: u64,
    /// Pause after a save click, letting the portal process the submission
    pub save_settle_ms: u64,
    /// Pause after opening the budget tab
    pub tab_settle_ms: u64,
    /// Pause after loading a product page before scraping it
    pub page_delay_ms: u64,
    /// Directory holding per-item attachment images
    pub downloads_dir: PathBuf,
    /// Directory receiving per-item price screenshots
    pub screenshots_dir: PathBuf,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            retry_interval_ms: 500,
            wait_timeout_ms: 10_000,
            locate_timeout_ms: 15_000,
            click_settle_ms: 300,
            delete_settle_ms: 1_000,
            save_settle_ms: 2_000,
            tab_settle_ms: 5_000,
            page_delay_ms: 3_000,
            downloads_dir: PathBuf::from("downloads"),
            screenshots_dir: PathBuf::from("screenshots"),
        }
    }
}

impl RunConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: retry ceiling
    pub fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Builder method: pause between retries
    pub fn retry_interval_ms(mut self, ms: u64) -> Self {
        self.retry_interval_ms = ms;
        self
    }

    /// Builder method: collapse every settle/delay pause to `ms`
    pub fn settle_ms(mut self, ms: u64) -> Self {
        self.click_settle_ms = ms;
        self.delete_settle_ms = ms;
        self.save_settle_ms = ms;
        self.tab_settle_ms = ms;
        self.page_delay_ms = ms;
        self
    }

    /// Builder method: attachment directory
    pub fn downloads_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.downloads_dir = dir.into();
        self
    }

    /// Builder method: screenshot directory
    pub fn screenshots_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.screenshots_dir = dir.into();
        self
    }

    pub fn retry_interval(&self) -> Duration {
        Duration::from_millis(self.retry_interval_ms)
    }

    pub fn wait_timeout(&self) -> Duration {
        Duration::from_millis(self.wait_timeout_ms)
    }

    pub fn locate_timeout(&self) -> Duration {
        Duration::from_millis(self.locate_timeout_ms)
    }

    pub fn click_settle(&self) -> Duration {
        Duration::from_millis(self.click_settle_ms)
    }

    pub fn delete_settle(&self) -> Duration {
        Duration::from_millis(self.delete_settle_ms)
    }

    pub fn save_settle(&self) -> Duration {
        Duration::from_millis(self.save_settle_ms)
    }

    pub fn tab_settle(&self) -> Duration {
        Duration::from_millis(self.tab_settle_ms)
    }

    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }

    /// The retry policy applied to interactive steps
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, self.retry_interval())
    }
}
