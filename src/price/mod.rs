//! Best-effort price extraction from an arbitrary product page.
//!
//! An ordered cascade of structural strategies, each tried only if the one
//! before found nothing: site-specific price widgets, a whole+fraction
//! composition, generic price-ish attribute patterns, and finally a raw
//! markup scan. Selector failures inside a stage are swallowed; the cascade
//! reports at most one raw text candidate.

pub mod parse;

pub use parse::parse_price;

use crate::config::RunConfig;
use crate::driver::UiDriver;
use crate::locator::Locator;
use crate::model::Section;
use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use std::thread;

/// Site-specific price widget selectors, in priority order
const WIDGET_SELECTORS: &[&str] = &[
    "#corePriceDisplay_desktop_feature_div .a-offscreen",
    "#apex_desktop .a-offscreen",
    "#priceblock_ourprice",
    "#priceblock_dealprice",
    "#sns-base-price",
    "#newBuyBoxPrice",
    ".a-price .a-offscreen",
];

/// Split price widgets composed from a whole and a fractional node
const WHOLE_SELECTOR: &str = ".a-price-whole";
const FRACTION_SELECTOR: &str = ".a-price-fraction";

/// Generic fallbacks matched against class/id/data attributes
const GENERIC_SELECTORS: &[&str] = &[
    "[class*=\"price\"]",
    "[id*=\"price\"]",
    "[class*=\"cost\"]",
    "[id*=\"cost\"]",
    "[class*=\"amount\"]",
    "[data-price]",
    "[itemprop*=\"price\"]",
    "[data-testid*=\"price\"]",
];

/// Currency-like token for the last-resort scan of the raw markup
static PAGE_PRICE_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\$€£]?\s*\d[\d,]*\.?\d{0,2}").expect("page scan pattern is valid"));

/// A cost overwrite produced by the price pass, keyed by dataset row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceUpdate {
    pub row: usize,
    pub cost: f64,
}

/// Scrapes a displayed price off whatever page the driver currently shows
pub struct PriceScraper<'a, D: UiDriver> {
    driver: &'a D,
    config: &'a RunConfig,
}

impl<'a, D: UiDriver> PriceScraper<'a, D> {
    pub fn new(driver: &'a D, config: &'a RunConfig) -> Self {
        Self { driver, config }
    }

    /// Raw displayed-price text from the loaded page, if any stage hits
    pub fn extract(&self) -> Option<String> {
        self.first_numeric_text(WIDGET_SELECTORS)
            .or_else(|| self.whole_fraction())
            .or_else(|| self.first_numeric_text(GENERIC_SELECTORS))
            .or_else(|| self.page_scan())
    }

    /// One-shot pre-reconciliation enrichment: visit each item's product
    /// page, screenshot it, and overwrite the item's cost when a positive
    /// price is found. Returns the applied updates for CSV write-back.
    pub fn enrich(&self, sections: &mut [Section]) -> Vec<PriceUpdate> {
        let mut updates = Vec::new();

        for section in sections.iter_mut() {
            for item in &mut section.items {
                if item.link.trim().is_empty() {
                    debug!("'{}': no link, skipping price lookup", item.name);
                    continue;
                }

                info!("pricing '{}' from {}", item.name, item.link);
                if let Err(err) = self.driver.navigate(&item.link) {
                    warn!("'{}': page failed to load: {err}", item.name);
                    continue;
                }
                thread::sleep(self.config.page_delay());

                let raw = self.extract();

                // Screenshots are wanted whether or not a price turned up,
                // and a capture failure must not block normalization
                let shot = self
                    .config
                    .screenshots_dir
                    .join(format!("{}.png", item.name));
                if let Err(err) = self.driver.screenshot(&shot) {
                    warn!("'{}': screenshot failed: {err}", item.name);
                }

                match raw.as_deref().and_then(parse_price) {
                    Some(cost) if cost > 0.0 => {
                        info!("'{}': found cost {raw:?} -> ${cost:.2}", item.name);
                        item.unit_cost = cost;
                        updates.push(PriceUpdate {
                            row: item.row,
                            cost,
                        });
                    }
                    _ => {
                        warn!(
                            "'{}': could not parse a price from {:?}",
                            item.name,
                            raw.unwrap_or_default()
                        );
                    }
                }
            }
        }

        updates
    }

    fn first_numeric_text(&self, selectors: &[&str]) -> Option<String> {
        for selector in selectors {
            let handles = self
                .driver
                .find_all(&Locator::css(*selector))
                .unwrap_or_default();

            for handle in handles {
                if let Some(text) = self.element_text(&handle) {
                    if text.chars().any(|c| c.is_ascii_digit()) {
                        return Some(text);
                    }
                }
            }
        }
        None
    }

    /// Rendered text, falling back to the `innerText` and `content`
    /// attributes for offscreen/meta price nodes
    fn element_text(&self, handle: &D::Handle) -> Option<String> {
        if let Ok(text) = self.driver.text(handle) {
            let text = text.trim();
            if !text.is_empty() {
                return Some(text.to_string());
            }
        }
        for attr in ["innerText", "content"] {
            if let Ok(Some(value)) = self.driver.attribute(handle, attr) {
                let value = value.trim();
                if !value.is_empty() {
                    return Some(value.to_string());
                }
            }
        }
        None
    }

    fn whole_fraction(&self) -> Option<String> {
        let whole = self.first_text(WHOLE_SELECTOR)?.replace(',', "");
        let whole = whole.trim().to_string();
        let fraction = self.first_text(FRACTION_SELECTOR)?.trim().to_string();

        if !whole.is_empty()
            && whole.chars().all(|c| c.is_ascii_digit())
            && !fraction.is_empty()
            && fraction.chars().all(|c| c.is_ascii_digit())
        {
            Some(format!("{whole}.{fraction}"))
        } else {
            None
        }
    }

    fn first_text(&self, selector: &str) -> Option<String> {
        let handles = self
            .driver
            .find_all(&Locator::css(selector))
            .unwrap_or_default();
        let first = handles.first()?;
        self.driver.text(first).ok()
    }

    fn page_scan(&self) -> Option<String> {
        let html = self.driver.page_source().ok()?;
        PAGE_PRICE_TOKEN
            .find(&html)
            .map(|m| m.as_str().to_string())
    }
}

/// Create the screenshot directory, clearing image files left over from a
/// previous run. Best-effort: individual removals are allowed to fail.
pub fn prepare_screenshot_dir(dir: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(dir)?;
    for entry in std::fs::read_dir(dir)? {
        let Ok(entry) = entry else { continue };
        let path = entry.path();
        if path.is_file() {
            if let Err(err) = std::fs::remove_file(&path) {
                warn!("could not remove stale screenshot {}: {err}", path.display());
            }
        }
    }
    Ok(())
}
