//! Clearing a section's remote line items before re-creating them.

use crate::config::RunConfig;
use crate::driver::UiDriver;
use crate::locator::LocatorSet;
use log::{debug, warn};
use std::thread;

/// Result of clearing one section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearSummary {
    /// Remote rows deleted
    pub deleted: u32,
    /// True when the reconciler stopped making progress before the section
    /// enumerated empty
    pub gave_up: bool,
}

/// One full delete cycle either removed a row or found none left
enum Cycle {
    Deleted,
    Empty,
}

/// Empties a named section's remote line items, bottom-up
pub struct SectionReconciler<'a, D: UiDriver> {
    driver: &'a D,
    locators: &'a LocatorSet,
    config: &'a RunConfig,
}

impl<'a, D: UiDriver> SectionReconciler<'a, D> {
    pub fn new(driver: &'a D, locators: &'a LocatorSet, config: &'a RunConfig) -> Self {
        Self {
            driver,
            locators,
            config,
        }
    }

    /// Delete remote line items until an enumeration comes back empty.
    ///
    /// Rows are removed last-first so surviving rows keep their positions
    /// while the list re-renders. The number of deletions is bounded only by
    /// the remote state; each interactive step runs under the retry policy,
    /// and a step that exhausts its retries restarts the loop from a fresh
    /// enumeration. A full retry-ceiling's worth of consecutive cycles with
    /// no deletion ends the section as `gave_up`.
    pub fn clear(&self, section: &str) -> ClearSummary {
        let policy = self.config.retry_policy();
        let container = self.locators.section_container(section);
        let rows_locator = self.locators.line_items(section);

        let mut deleted = 0u32;
        let mut fruitless_cycles = 0u32;

        loop {
            let cycle = policy.attempt("delete line item", || {
                self.driver
                    .wait_for(&container, self.config.locate_timeout())?;

                let rows = self.driver.find_all(&rows_locator)?;
                let Some(last) = rows.last() else {
                    return Ok(Cycle::Empty);
                };
                debug!("section '{section}': {} rows remain", rows.len());

                self.driver.scroll_into_view(last)?;
                thread::sleep(self.config.click_settle());
                self.driver.click(last)?;

                let delete = self
                    .driver
                    .wait_for(&self.locators.delete_control(), self.config.wait_timeout())?;
                self.driver.scroll_into_view(&delete)?;
                self.driver.click(&delete)?;
                Ok(Cycle::Deleted)
            });

            match cycle {
                Ok((Cycle::Empty, _)) => {
                    debug!("section '{section}': cleared after {deleted} deletions");
                    return ClearSummary {
                        deleted,
                        gave_up: false,
                    };
                }
                Ok((Cycle::Deleted, _)) => {
                    deleted += 1;
                    fruitless_cycles = 0;
                    thread::sleep(self.config.delete_settle());
                }
                Err(err) => {
                    warn!("section '{section}': delete cycle failed, re-enumerating: {err}");
                    fruitless_cycles += 1;
                    if fruitless_cycles >= self.config.max_attempts.max(1) {
                        warn!("section '{section}': no progress, leaving {deleted} deletions done");
                        return ClearSummary {
                            deleted,
                            gave_up: true,
                        };
                    }
                }
            }
        }
    }
}
