//! # budget-sync
//!
//! A Rust library for reconciling a CSV budget dataset against a stateful,
//! form-based web portal, driven over the Chrome DevTools Protocol (CDP).
//!
//! ## Features
//!
//! - **Resilient reconciliation**: clear-then-recreate each budget section's
//!   line items with bounded retries around every interactive step; one
//!   failing item never aborts the run
//! - **Save protocol**: a small state machine that waits out the portal's
//!   disabled save button and survives intercepted clicks
//! - **Price extraction**: a best-effort cascade that scrapes a displayed
//!   price off arbitrary product pages and normalizes locale-formatted
//!   numbers
//! - **Dataset handling**: CSV loading with forward-filled section grouping,
//!   plus currency write-back of scraped costs
//!
//! ## Usage
//!
//! ```rust,no_run
//! use budget_sync::{
//!     ChromeDriver, ChromeOptions, Dataset, LocatorSet, Reconciler, RunConfig,
//! };
//!
//! # fn main() -> budget_sync::Result<()> {
//! let dataset = Dataset::load("Fall25_Bills_Budget.csv")?;
//! let sections = dataset.sections("Marine Robotics Group Fall 2025 Bill No. 7")?;
//!
//! let driver = ChromeDriver::launch(ChromeOptions::new().headless(false))?;
//! let config = RunConfig::new();
//! let locators = LocatorSet::default();
//!
//! let engine = Reconciler::new(&driver, &config, &locators);
//! engine.open_bill("https://example.campuslabs.com/engage/budgeting/requests#/edit/1")?;
//!
//! let report = engine.run(&sections);
//! report.log_summary();
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! - [`driver`]: the UI driver capability boundary and its CDP implementation
//! - [`locator`]: element descriptors; the single home of DOM-shape knowledge
//! - [`retry`]: bounded fixed-interval retry for flaky UI steps
//! - [`sync`]: the reconciliation engine, section clearing, item writing, and
//!   the save protocol
//! - [`price`]: the price extraction cascade and number normalization
//! - [`dataset`]: CSV loading, grouping, and cost write-back
//! - [`config`]: the immutable per-run configuration value
//! - [`error`]: error types and result aliases

pub mod config;
pub mod dataset;
pub mod driver;
pub mod error;
pub mod locator;
pub mod model;
pub mod price;
pub mod retry;
pub mod sync;

pub use config::RunConfig;
pub use dataset::Dataset;
pub use driver::{ChromeDriver, ChromeOptions, UiDriver};
pub use error::{DriverError, DriverResult, Result, SyncError};
pub use locator::{FormField, Locator, LocatorSet};
pub use model::{Item, ItemStatus, OutcomeRecord, RunReport, Section, SectionSummary};
pub use price::{parse_price, PriceScraper, PriceUpdate};
pub use retry::{RetryError, RetryPolicy};
pub use sync::{Reconciler, SaveOutcome, SaveProtocol};
