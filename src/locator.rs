//! Element descriptors for the remote budgeting form.
//!
//! The portal's markup is a versioned, brittle contract this crate depends on
//! but does not own. Every piece of DOM-shape knowledge lives in
//! [`LocatorSet`]; the rest of the crate only ever sees opaque [`Locator`]
//! values built here.

use serde::{Deserialize, Serialize};

/// Opaque element descriptor handed to a UI driver
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Locator {
    /// CSS selector
    Css(String),
    /// XPath expression
    XPath(String),
}

impl Locator {
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    pub fn xpath(expression: impl Into<String>) -> Self {
        Self::XPath(expression.into())
    }

    /// The underlying selector text, for logging
    pub fn as_str(&self) -> &str {
        match self {
            Self::Css(s) | Self::XPath(s) => s,
        }
    }
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Css(s) => write!(f, "css {s}"),
            Self::XPath(s) => write!(f, "xpath {s}"),
        }
    }
}

/// Fields of the line-item editor form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormField {
    Name,
    Description,
    Quantity,
    Price,
}

/// Descriptor templates for the budgeting form.
///
/// `{section}` in the anchor template is replaced with the section name.
/// The defaults match the CampusLabs Engage budgeting markup; a different
/// portal revision can supply its own set via configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocatorSet {
    /// XPath of a section's title anchor
    pub section_anchor: String,
    /// XPath hops from the title anchor up to the section container
    pub container_path: String,
    /// XPath appended to the container to enumerate line-item rows
    pub row_suffix: String,
    /// XPath appended to the container for the add-item control
    pub add_suffix: String,
    /// XPath of the delete control inside the open line-item editor
    pub delete_control: String,
    /// XPath of the editor's save control
    pub save_control: String,
    /// XPath of the budget tab on the bill page
    pub budget_tab: String,
    /// CSS selectors of the editor fields
    pub name_field: String,
    pub description_field: String,
    pub quantity_field: String,
    pub price_field: String,
    /// CSS selector of the (hidden) attachment file input
    pub upload_input: String,
    /// Attribute whose truthy value marks the save control not-yet-ready
    pub disabled_attr: String,
}

impl Default for LocatorSet {
    fn default() -> Self {
        Self {
            section_anchor:
                "//h4[@class='groupTitle bdg-margin-vert']/a[contains(text(), '{section}')]".into(),
            container_path: "/../../..".into(),
            row_suffix: "//a[@ng-click='editLineItem(lineItem)']".into(),
            add_suffix: "//a[contains(@class,'add')]".into(),
            delete_control: "//a[@ng-click='deleteLineItem()']".into(),
            save_control: "//a[contains(@class,'button-success') and contains(text(),'Save')]"
                .into(),
            budget_tab: "//a[contains(@analytics-event, 'Tab Budget')]".into(),
            name_field: "#Name".into(),
            description_field: "#Description".into(),
            quantity_field: "#Quantity".into(),
            price_field: "#Price".into(),
            upload_input: "#fileUploadInput".into(),
            disabled_attr: "ng-disabled".into(),
        }
    }
}

impl LocatorSet {
    fn container(&self, section: &str) -> String {
        let anchor = self.section_anchor.replace("{section}", section);
        format!("{anchor}{}", self.container_path)
    }

    /// Container element of a named section
    pub fn section_container(&self, section: &str) -> Locator {
        Locator::xpath(self.container(section))
    }

    /// Every line-item row currently present in a named section
    pub fn line_items(&self, section: &str) -> Locator {
        Locator::xpath(format!("{}{}", self.container(section), self.row_suffix))
    }

    /// The add-item control of a named section
    pub fn add_control(&self, section: &str) -> Locator {
        Locator::xpath(format!("{}{}", self.container(section), self.add_suffix))
    }

    pub fn delete_control(&self) -> Locator {
        Locator::xpath(self.delete_control.clone())
    }

    pub fn save_control(&self) -> Locator {
        Locator::xpath(self.save_control.clone())
    }

    pub fn budget_tab(&self) -> Locator {
        Locator::xpath(self.budget_tab.clone())
    }

    pub fn field(&self, field: FormField) -> Locator {
        let selector = match field {
            FormField::Name => &self.name_field,
            FormField::Description => &self.description_field,
            FormField::Quantity => &self.quantity_field,
            FormField::Price => &self.price_field,
        };
        Locator::css(selector.clone())
    }

    pub fn upload_input(&self) -> Locator {
        Locator::css(self.upload_input.clone())
    }
}
