//! Writing one line item into a section's editor form.

use crate::config::RunConfig;
use crate::driver::UiDriver;
use crate::error::DriverResult;
use crate::locator::{FormField, LocatorSet};
use crate::model::{Item, ItemStatus, OutcomeRecord};
use crate::sync::save::SaveProtocol;
use log::{debug, info, warn};

/// Creates remote line items from dataset items, one at a time
pub struct ItemWriter<'a, D: UiDriver> {
    driver: &'a D,
    locators: &'a LocatorSet,
    config: &'a RunConfig,
}

impl<'a, D: UiDriver> ItemWriter<'a, D> {
    pub fn new(driver: &'a D, locators: &'a LocatorSet, config: &'a RunConfig) -> Self {
        Self {
            driver,
            locators,
            config,
        }
    }

    /// Write one item into the named section and report how it went.
    ///
    /// Failures are recorded, never raised: an item that cannot be opened,
    /// filled, or saved produces a failed outcome and leaves the caller free
    /// to move on to the next item.
    pub fn write(&self, section: &str, item: &Item) -> OutcomeRecord {
        let outcome = |status: ItemStatus, attempts: u32| OutcomeRecord {
            section: section.to_string(),
            item: item.clone(),
            status,
            attempts,
        };

        // The add control is re-located on every attempt: the previous
        // item's save may have invalidated the whole section subtree
        let policy = self.config.retry_policy();
        let open = policy.attempt("open line-item editor", || self.open_editor(section));

        let mut attempts = match open {
            Ok(((), n)) => {
                debug!("'{}': editor open after {n} attempt(s)", item.name);
                n
            }
            Err(err) => {
                warn!("'{}': could not open the editor: {err}", item.name);
                return outcome(ItemStatus::AddClickFailed, err.attempts());
            }
        };

        if let Err(err) = self.fill_fields(item) {
            warn!("'{}': field fill failed: {err}", item.name);
            return outcome(ItemStatus::FieldFillFailed, attempts);
        }

        match item.find_attachment(&self.config.downloads_dir) {
            Some(path) => {
                if let Err(err) = self.attach(&path) {
                    warn!(
                        "'{}': attaching {} failed: {err}",
                        item.name,
                        path.display()
                    );
                    return outcome(ItemStatus::FieldFillFailed, attempts);
                }
                info!("'{}': attached {}", item.name, path.display());
            }
            None => debug!("'{}': no attachment found", item.name),
        }

        let save = SaveProtocol::new(self.driver, self.locators, self.config).commit();
        attempts += save.attempts();

        if save.is_confirmed() {
            info!("'{}': saved", item.name);
            outcome(ItemStatus::Success, attempts)
        } else {
            warn!("'{}': save retries exhausted", item.name);
            outcome(ItemStatus::SaveFailed, attempts)
        }
    }

    /// Locate the section's add control, click it, and wait for the name
    /// field as confirmation that the editor opened
    fn open_editor(&self, section: &str) -> DriverResult<()> {
        self.driver.wait_for(
            &self.locators.section_container(section),
            self.config.locate_timeout(),
        )?;

        let add = self.driver.find_one(&self.locators.add_control(section))?;
        self.driver.scroll_into_view(&add)?;
        self.driver.click(&add)?;

        self.driver.wait_for(
            &self.locators.field(FormField::Name),
            self.config.wait_timeout(),
        )?;
        Ok(())
    }

    fn fill_fields(&self, item: &Item) -> DriverResult<()> {
        let values: [(FormField, String); 4] = [
            (FormField::Name, item.name.clone()),
            (FormField::Description, item.description.clone()),
            (FormField::Quantity, item.quantity_text()),
            (FormField::Price, item.unit_cost_text()),
        ];

        for (field, value) in values {
            let element = self.driver.find_one(&self.locators.field(field))?;
            self.driver.clear(&element)?;
            self.driver.type_text(&element, &value)?;
        }
        Ok(())
    }

    /// Reveal the hidden file input and hand it the absolute path
    fn attach(&self, path: &std::path::Path) -> DriverResult<()> {
        let input = self.driver.find_one(&self.locators.upload_input())?;
        self.driver.reveal(&input)?;

        let absolute = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        self.driver.upload_file(&input, &absolute)
    }
}
