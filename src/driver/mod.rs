//! UI driver capability boundary.
//!
//! The reconciliation core is written entirely against [`UiDriver`]; the one
//! production implementation drives Chrome over CDP ([`chrome::ChromeDriver`]).
//! Tests substitute a scripted in-memory implementation.

pub mod chrome;

pub use chrome::{ChromeDriver, ChromeOptions};

use crate::error::DriverResult;
use crate::locator::Locator;
use std::path::Path;
use std::time::Duration;

/// Capability surface consumed by the reconciliation engine and price scraper
pub trait UiDriver {
    /// Opaque element handle. Handles may go stale as the page re-renders;
    /// interactions with a stale handle fail with a transient error.
    type Handle: Clone;

    /// Load a URL and block until navigation completes
    fn navigate(&self, url: &str) -> DriverResult<()>;

    fn current_url(&self) -> DriverResult<String>;

    /// Locate the first element matching `locator`, without waiting
    fn find_one(&self, locator: &Locator) -> DriverResult<Self::Handle>;

    /// Locate every element matching `locator`, in document order
    fn find_all(&self, locator: &Locator) -> DriverResult<Vec<Self::Handle>>;

    /// Poll for an element until it appears or `timeout` elapses
    fn wait_for(&self, locator: &Locator, timeout: Duration) -> DriverResult<Self::Handle>;

    fn click(&self, element: &Self::Handle) -> DriverResult<()>;

    /// Empty an input, notifying the page's change listeners
    fn clear(&self, element: &Self::Handle) -> DriverResult<()>;

    fn type_text(&self, element: &Self::Handle, text: &str) -> DriverResult<()>;

    /// Rendered text content of the element
    fn text(&self, element: &Self::Handle) -> DriverResult<String>;

    fn attribute(&self, element: &Self::Handle, name: &str) -> DriverResult<Option<String>>;

    fn scroll_into_view(&self, element: &Self::Handle) -> DriverResult<()>;

    /// Force a hidden control visible so it can be interacted with
    fn reveal(&self, element: &Self::Handle) -> DriverResult<()>;

    /// Supply an absolute file path to a file input
    fn upload_file(&self, element: &Self::Handle, path: &Path) -> DriverResult<()>;

    /// Capture the current page to an image file
    fn screenshot(&self, path: &Path) -> DriverResult<()>;

    /// Full rendered page markup
    fn page_source(&self) -> DriverResult<String>;
}
