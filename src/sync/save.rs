//! Save-control interaction state machine.
//!
//! The portal's save button stays disabled until its form validation allows
//! submission, and even once enabled a click can be intercepted by overlays
//! or invalidated by a re-render. Each cycle: locate the control, probe its
//! disabled attribute, and either wait or click. Exhaustion is an outcome
//! value; this module never raises past its caller.

use crate::config::RunConfig;
use crate::driver::UiDriver;
use crate::locator::LocatorSet;
use log::{debug, warn};
use std::thread;

/// How a save attempt ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The control was clicked and the settle delay elapsed. The portal is
    /// not asked to confirm the write; a silent server-side rejection is a
    /// known limitation of this protocol.
    Confirmed { attempts: u32 },
    /// The ceiling was reached without a successful click
    Failed { attempts: u32 },
}

impl SaveOutcome {
    pub fn is_confirmed(self) -> bool {
        matches!(self, Self::Confirmed { .. })
    }

    pub fn attempts(self) -> u32 {
        match self {
            Self::Confirmed { attempts } | Self::Failed { attempts } => attempts,
        }
    }
}

/// Expected, non-error probe states of the save control
enum Probe<H> {
    Ready(H),
    Disabled,
}

/// Drives one save-button interaction to a terminal outcome
pub struct SaveProtocol<'a, D: UiDriver> {
    driver: &'a D,
    locators: &'a LocatorSet,
    config: &'a RunConfig,
}

impl<'a, D: UiDriver> SaveProtocol<'a, D> {
    pub fn new(driver: &'a D, locators: &'a LocatorSet, config: &'a RunConfig) -> Self {
        Self {
            driver,
            locators,
            config,
        }
    }

    /// Attempt to commit the open editor
    pub fn commit(&self) -> SaveOutcome {
        let ceiling = self.config.max_attempts.max(1);

        for attempt in 1..=ceiling {
            match self.probe() {
                Ok(Probe::Disabled) => {
                    debug!("save control disabled, waiting ({attempt}/{ceiling})");
                    thread::sleep(self.config.retry_interval());
                }
                Ok(Probe::Ready(control)) => match self.press(&control) {
                    Ok(()) => {
                        thread::sleep(self.config.save_settle());
                        return SaveOutcome::Confirmed { attempts: attempt };
                    }
                    Err(err) => {
                        warn!("save click failed ({attempt}/{ceiling}): {err}");
                        thread::sleep(self.config.retry_interval());
                    }
                },
                Err(err) => {
                    warn!("save control unavailable ({attempt}/{ceiling}): {err}");
                    thread::sleep(self.config.retry_interval());
                }
            }
        }

        SaveOutcome::Failed { attempts: ceiling }
    }

    fn probe(&self) -> crate::error::DriverResult<Probe<D::Handle>> {
        let control = self
            .driver
            .wait_for(&self.locators.save_control(), self.config.wait_timeout())?;

        if let Some(flag) = self
            .driver
            .attribute(&control, &self.locators.disabled_attr)?
        {
            if is_truthy(&flag) {
                return Ok(Probe::Disabled);
            }
        }

        Ok(Probe::Ready(control))
    }

    fn press(&self, control: &D::Handle) -> crate::error::DriverResult<()> {
        self.driver.scroll_into_view(control)?;
        self.driver.click(control)
    }
}

fn is_truthy(flag: &str) -> bool {
    matches!(flag.trim().to_ascii_lowercase().as_str(), "true" | "1")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthy_flags() {
        assert!(is_truthy("true"));
        assert!(is_truthy("TRUE"));
        assert!(is_truthy(" 1 "));

        assert!(!is_truthy("false"));
        assert!(!is_truthy("0"));
        assert!(!is_truthy(""));
    }

    #[test]
    fn test_outcome_accessors() {
        assert!(SaveOutcome::Confirmed { attempts: 2 }.is_confirmed());
        assert!(!SaveOutcome::Failed { attempts: 5 }.is_confirmed());
        assert_eq!(SaveOutcome::Failed { attempts: 5 }.attempts(), 5);
    }
}
