//! Reconciliation engine: make the portal's line items match the dataset.
//!
//! Clear-then-recreate, section by section. No error from one item or one
//! section propagates out of [`Reconciler::run`]; the result is always an
//! outcome report, and because stale items are cleared before re-adding,
//! re-running an interrupted reconciliation is the supported recovery path.

pub mod save;
pub mod section;
pub mod writer;

pub use save::{SaveOutcome, SaveProtocol};
pub use section::{ClearSummary, SectionReconciler};
pub use writer::ItemWriter;

use crate::config::RunConfig;
use crate::driver::UiDriver;
use crate::error::Result;
use crate::locator::LocatorSet;
use crate::model::{RunReport, Section, SectionSummary};
use log::info;
use std::thread;

/// Drives a whole reconciliation run over one UI driver session
pub struct Reconciler<'a, D: UiDriver> {
    driver: &'a D,
    config: &'a RunConfig,
    locators: &'a LocatorSet,
}

impl<'a, D: UiDriver> Reconciler<'a, D> {
    pub fn new(driver: &'a D, config: &'a RunConfig, locators: &'a LocatorSet) -> Self {
        Self {
            driver,
            config,
            locators,
        }
    }

    /// Navigate to the bill's edit page and open its budget tab.
    ///
    /// Failing here is fatal: nothing has been reconciled yet and the rest
    /// of the run depends on the tab being open.
    pub fn open_bill(&self, url: &str) -> Result<()> {
        self.driver.navigate(url)?;

        let policy = self.config.retry_policy();
        policy
            .attempt("open budget tab", || {
                let tab = self
                    .driver
                    .wait_for(&self.locators.budget_tab(), self.config.locate_timeout())?;
                self.driver.click(&tab)
            })
            .map_err(|err| err.into_error())?;

        thread::sleep(self.config.tab_settle());
        Ok(())
    }

    /// Reconcile every section in order, accumulating per-item outcomes.
    ///
    /// Sections are processed independently: clearing that gives up or items
    /// that fail are recorded in the report and the run moves on.
    pub fn run(&self, sections: &[Section]) -> RunReport {
        let mut report = RunReport::default();

        let reconciler = SectionReconciler::new(self.driver, self.locators, self.config);
        let writer = ItemWriter::new(self.driver, self.locators, self.config);

        for section in sections {
            info!(
                "processing section '{}' ({} items)",
                section.name,
                section.items.len()
            );

            let clear = reconciler.clear(&section.name);
            let mut summary = SectionSummary {
                name: section.name.clone(),
                cleared: !clear.gave_up,
                deleted: clear.deleted,
                written: 0,
                failed: 0,
            };

            for item in &section.items {
                let outcome = writer.write(&section.name, item);
                if outcome.status.is_success() {
                    summary.written += 1;
                } else {
                    summary.failed += 1;
                }
                report.outcomes.push(outcome);
            }

            info!(
                "finished section '{}': {} written, {} failed",
                section.name, summary.written, summary.failed
            );
            report.sections.push(summary);
        }

        report
    }
}
