//! Scripted in-memory [`UiDriver`] used by the integration tests.
//!
//! Models just enough of the portal's budgeting form to exercise the
//! reconciliation state machines: sections hold rows, an add click opens an
//! editor form, a save click commits it, and failure modes (intercepted
//! clicks, disabled save control, missing fields) are scriptable.

#![allow(dead_code)]

use budget_sync::{DriverError, DriverResult, FormField, Locator, LocatorSet, UiDriver};
use indexmap::IndexMap;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Element handles the scripted page hands out
#[derive(Debug, Clone, PartialEq)]
pub enum Handle {
    Section(String),
    Row { section: String, index: usize },
    Add(String),
    Delete,
    Save,
    Field(FormField),
    Upload,
    BudgetTab,
    Text(String),
}

/// A line item as the scripted portal stores it
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RemoteItem {
    pub name: String,
    pub description: String,
    pub quantity: String,
    pub price: String,
    pub attachment: Option<PathBuf>,
}

#[derive(Debug, Default)]
pub struct State {
    /// Section name -> its current rows
    pub remote: IndexMap<String, Vec<RemoteItem>>,
    /// The open editor form, if any
    pub form: Option<(String, RemoteItem)>,
    pub forms_opened: u32,
    pub selected_row: Option<(String, usize)>,
    pub delete_clicks: u32,
    pub deleted_indices: Vec<usize>,
    pub save_clicks: u32,
    /// Remaining polls for which the save control reports disabled
    pub disabled_polls: u32,
    pub disabled_seen: u32,
    /// Section name -> remaining add clicks to intercept
    pub add_intercepts: HashMap<String, u32>,
    /// (form ordinal, field) that is absent from that form
    pub missing_field: Option<(u32, FormField)>,
    /// Remaining save clicks to intercept
    pub save_intercepts: u32,
    pub uploads: Vec<PathBuf>,
    pub screenshots: Vec<PathBuf>,
    pub screenshot_fails: bool,
    pub page_html: String,
    /// CSS selector -> texts of the matching elements
    pub css_texts: HashMap<String, Vec<String>>,
    pub navigations: Vec<String>,
}

pub struct ScriptedDriver {
    pub locators: LocatorSet,
    pub state: RefCell<State>,
}

impl ScriptedDriver {
    pub fn new() -> Self {
        Self {
            locators: LocatorSet::default(),
            state: RefCell::new(State::default()),
        }
    }

    /// Seed a section with `rows` pre-existing stale rows
    pub fn seed_section(&self, name: &str, rows: usize) {
        let items = (0..rows)
            .map(|i| RemoteItem {
                name: format!("stale-{i}"),
                ..Default::default()
            })
            .collect();
        self.state.borrow_mut().remote.insert(name.to_string(), items);
    }

    /// Open an editor form directly, bypassing the add control
    pub fn open_form(&self, section: &str) {
        let mut state = self.state.borrow_mut();
        state.form = Some((section.to_string(), RemoteItem::default()));
        state.forms_opened += 1;
    }

    /// Script the texts returned for a CSS selector
    pub fn set_texts(&self, selector: &str, texts: &[&str]) {
        self.state.borrow_mut().css_texts.insert(
            selector.to_string(),
            texts.iter().map(|t| t.to_string()).collect(),
        );
    }

    fn lookup(&self, locator: &Locator) -> DriverResult<Handle> {
        let state = self.state.borrow();

        for section in state.remote.keys() {
            if *locator == self.locators.section_container(section) {
                return Ok(Handle::Section(section.clone()));
            }
            if *locator == self.locators.add_control(section) {
                return Ok(Handle::Add(section.clone()));
            }
        }

        if *locator == self.locators.delete_control() {
            return if state.selected_row.is_some() {
                Ok(Handle::Delete)
            } else {
                Err(DriverError::NotFound("delete control".into()))
            };
        }

        if *locator == self.locators.save_control() {
            return if state.form.is_some() {
                Ok(Handle::Save)
            } else {
                Err(DriverError::NotFound("save control".into()))
            };
        }

        for field in [
            FormField::Name,
            FormField::Description,
            FormField::Quantity,
            FormField::Price,
        ] {
            if *locator == self.locators.field(field) {
                if state.form.is_none() {
                    return Err(DriverError::NotFound(format!("{field:?} field")));
                }
                if let Some((ordinal, missing)) = state.missing_field {
                    if state.forms_opened == ordinal && missing == field {
                        return Err(DriverError::NotFound(format!("{field:?} field")));
                    }
                }
                return Ok(Handle::Field(field));
            }
        }

        if *locator == self.locators.upload_input() {
            return if state.form.is_some() {
                Ok(Handle::Upload)
            } else {
                Err(DriverError::NotFound("upload input".into()))
            };
        }

        if *locator == self.locators.budget_tab() {
            return Ok(Handle::BudgetTab);
        }

        Err(DriverError::NotFound(locator.to_string()))
    }
}

impl UiDriver for ScriptedDriver {
    type Handle = Handle;

    fn navigate(&self, url: &str) -> DriverResult<()> {
        self.state.borrow_mut().navigations.push(url.to_string());
        Ok(())
    }

    fn current_url(&self) -> DriverResult<String> {
        Ok(self
            .state
            .borrow()
            .navigations
            .last()
            .cloned()
            .unwrap_or_else(|| "about:blank".into()))
    }

    fn find_one(&self, locator: &Locator) -> DriverResult<Handle> {
        self.lookup(locator)
    }

    fn find_all(&self, locator: &Locator) -> DriverResult<Vec<Handle>> {
        let state = self.state.borrow();

        for section in state.remote.keys() {
            if *locator == self.locators.line_items(section) {
                let count = state.remote[section].len();
                return Ok((0..count)
                    .map(|index| Handle::Row {
                        section: section.clone(),
                        index,
                    })
                    .collect());
            }
        }

        if let Locator::Css(selector) = locator {
            if let Some(texts) = state.css_texts.get(selector) {
                return Ok(texts.iter().cloned().map(Handle::Text).collect());
            }
        }

        Ok(Vec::new())
    }

    fn wait_for(&self, locator: &Locator, _timeout: Duration) -> DriverResult<Handle> {
        // A wait that never sees its element surfaces as a timeout
        self.lookup(locator).map_err(|err| match err {
            DriverError::NotFound(what) => DriverError::WaitTimeout(what),
            other => other,
        })
    }

    fn click(&self, element: &Handle) -> DriverResult<()> {
        let mut state = self.state.borrow_mut();
        match element {
            Handle::Row { section, index } => {
                state.selected_row = Some((section.clone(), *index));
                Ok(())
            }
            Handle::Add(section) => {
                if let Some(remaining) = state.add_intercepts.get_mut(section) {
                    if *remaining > 0 {
                        *remaining -= 1;
                        return Err(DriverError::ClickIntercepted("add control".into()));
                    }
                }
                state.form = Some((section.clone(), RemoteItem::default()));
                state.forms_opened += 1;
                state.selected_row = None;
                Ok(())
            }
            Handle::Delete => {
                let Some((section, index)) = state.selected_row.take() else {
                    return Err(DriverError::StaleElement("no row selected".into()));
                };
                let rows = state
                    .remote
                    .get_mut(&section)
                    .ok_or_else(|| DriverError::StaleElement(section.clone()))?;
                if index >= rows.len() {
                    return Err(DriverError::StaleElement("row already gone".into()));
                }
                rows.remove(index);
                state.delete_clicks += 1;
                state.deleted_indices.push(index);
                Ok(())
            }
            Handle::Save => {
                if state.save_intercepts > 0 {
                    state.save_intercepts -= 1;
                    return Err(DriverError::ClickIntercepted("save control".into()));
                }
                let Some((section, item)) = state.form.take() else {
                    return Err(DriverError::StaleElement("no form open".into()));
                };
                state.remote.entry(section).or_default().push(item);
                state.save_clicks += 1;
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn clear(&self, element: &Handle) -> DriverResult<()> {
        if let Handle::Field(field) = element {
            if let Some((_, item)) = self.state.borrow_mut().form.as_mut() {
                field_slot(item, *field).clear();
            }
        }
        Ok(())
    }

    fn type_text(&self, element: &Handle, text: &str) -> DriverResult<()> {
        if let Handle::Field(field) = element {
            if let Some((_, item)) = self.state.borrow_mut().form.as_mut() {
                field_slot(item, *field).push_str(text);
            }
        }
        Ok(())
    }

    fn text(&self, element: &Handle) -> DriverResult<String> {
        match element {
            Handle::Text(text) => Ok(text.clone()),
            _ => Ok(String::new()),
        }
    }

    fn attribute(&self, element: &Handle, name: &str) -> DriverResult<Option<String>> {
        if matches!(element, Handle::Save) && name == self.locators.disabled_attr {
            let mut state = self.state.borrow_mut();
            if state.disabled_polls > 0 {
                state.disabled_polls -= 1;
                state.disabled_seen += 1;
                return Ok(Some("true".into()));
            }
            return Ok(Some("false".into()));
        }
        Ok(None)
    }

    fn scroll_into_view(&self, _element: &Handle) -> DriverResult<()> {
        Ok(())
    }

    fn reveal(&self, _element: &Handle) -> DriverResult<()> {
        Ok(())
    }

    fn upload_file(&self, element: &Handle, path: &Path) -> DriverResult<()> {
        if matches!(element, Handle::Upload) {
            let mut state = self.state.borrow_mut();
            if let Some((_, item)) = state.form.as_mut() {
                item.attachment = Some(path.to_path_buf());
            }
            state.uploads.push(path.to_path_buf());
        }
        Ok(())
    }

    fn screenshot(&self, path: &Path) -> DriverResult<()> {
        let mut state = self.state.borrow_mut();
        if state.screenshot_fails {
            return Err(DriverError::ScreenshotFailed(path.display().to_string()));
        }
        state.screenshots.push(path.to_path_buf());
        Ok(())
    }

    fn page_source(&self) -> DriverResult<String> {
        Ok(self.state.borrow().page_html.clone())
    }
}

fn field_slot(item: &mut RemoteItem, field: FormField) -> &mut String {
    match field {
        FormField::Name => &mut item.name,
        FormField::Description => &mut item.description,
        FormField::Quantity => &mut item.quantity,
        FormField::Price => &mut item.price,
    }
}
