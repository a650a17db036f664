//! Core data model: sections, items, and per-run outcome reporting.

use log::info;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Attachment extensions probed for an item, in priority order
pub const ATTACHMENT_EXTENSIONS: &[&str] = &[".png", ".jpg"];

/// A named budget section and its line items, in source order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub name: String,
    pub items: Vec<Item>,
}

/// One line item to be represented remotely
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Display label, also the attachment-lookup key
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub quantity: u32,
    pub unit_cost: f64,
    /// Product page used by the price pass; may be empty
    #[serde(default)]
    pub link: String,
    /// Index of the originating dataset row, for cost write-back
    #[serde(default)]
    pub row: usize,
}

impl Item {
    /// Resolve the local attachment for this item, if any.
    ///
    /// Probes `dir/<name><ext>` for each supported extension in priority
    /// order; the first existing file wins.
    pub fn find_attachment(&self, dir: &Path) -> Option<PathBuf> {
        for ext in ATTACHMENT_EXTENSIONS {
            let candidate = dir.join(format!("{}{ext}", self.name));
            if candidate.is_file() {
                return Some(candidate);
            }
        }
        None
    }

    /// Quantity as typed into the form
    pub fn quantity_text(&self) -> String {
        self.quantity.to_string()
    }

    /// Unit cost as typed into the form
    pub fn unit_cost_text(&self) -> String {
        format!("{:.2}", self.unit_cost)
    }
}

/// How writing one item ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemStatus {
    Success,
    /// The add-item control never opened the editor
    AddClickFailed,
    /// A required editor field or control was absent
    FieldFillFailed,
    /// The save protocol exhausted its retries
    SaveFailed,
}

impl ItemStatus {
    pub fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

/// Per-item result of a reconciliation attempt
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutcomeRecord {
    pub section: String,
    pub item: Item,
    pub status: ItemStatus,
    /// Interactive attempts spent on the item (add + save phases)
    pub attempts: u32,
}

/// Completion flags for one processed section
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionSummary {
    pub name: String,
    /// Whether clearing reached an empty enumeration
    pub cleared: bool,
    /// Remote rows deleted while clearing
    pub deleted: u32,
    pub written: usize,
    pub failed: usize,
}

/// Terminal artifact of a reconciliation run
#[derive(Debug, Default, Serialize)]
pub struct RunReport {
    pub outcomes: Vec<OutcomeRecord>,
    pub sections: Vec<SectionSummary>,
}

impl RunReport {
    pub fn failures(&self) -> impl Iterator<Item = &OutcomeRecord> {
        self.outcomes.iter().filter(|o| !o.status.is_success())
    }

    pub fn is_clean(&self) -> bool {
        self.failures().next().is_none() && self.sections.iter().all(|s| s.cleared)
    }

    /// Log the per-section tallies and every failed item
    pub fn log_summary(&self) {
        for section in &self.sections {
            info!(
                "section '{}': cleared={} deleted={} written={} failed={}",
                section.name, section.cleared, section.deleted, section.written, section.failed
            );
        }
        for outcome in self.failures() {
            info!(
                "failed: '{}' in '{}' ({:?} after {} attempts)",
                outcome.item.name, outcome.section, outcome.status, outcome.attempts
            );
        }
    }
}
