//! Browser handles and the [`Page`] implementation over the live document.

use std::rc::Rc;

use rkb_game::{ElementSpec, Field, FieldHandle, Page, Placement, SetupError, SetupResult};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlInputElement, Node, Storage, Window};

#[must_use]
pub fn window() -> Option<Window> {
    web_sys::window()
}

#[must_use]
pub fn document() -> Option<Document> {
    window().and_then(|win| win.document())
}

/// Access the browser `localStorage` handle.
///
/// # Errors
/// Returns an error if the browser window cannot be accessed or `localStorage` is unavailable.
pub fn local_storage() -> Result<Storage, JsValue> {
    window()
        .ok_or_else(|| JsValue::from_str("window unavailable"))?
        .local_storage()?
        .ok_or_else(|| JsValue::from_str("localStorage unavailable"))
}

/// Convert a JavaScript value into a readable string for error reporting.
#[must_use]
pub fn js_error_message(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|err| err.message().into())
        })
        .unwrap_or_else(|| format!("{value:?}"))
}

/// Log an error message to the browser console.
pub fn console_error(message: &str) {
    web_sys::console::error_1(&JsValue::from(message));
}

fn page_error(value: &JsValue) -> SetupError {
    SetupError::Page(js_error_message(value))
}

/// A live element; inputs expose `value`/`checked`, anything else its text.
#[derive(Debug, Clone)]
pub struct DomField {
    element: Element,
}

impl DomField {
    #[must_use]
    pub const fn new(element: Element) -> Self {
        Self { element }
    }

    #[must_use]
    pub const fn element(&self) -> &Element {
        &self.element
    }

    fn input(&self) -> Option<&HtmlInputElement> {
        self.element.dyn_ref::<HtmlInputElement>()
    }
}

impl Field for DomField {
    fn value(&self) -> String {
        match self.input() {
            Some(input) => input.value(),
            None => self.element.text_content().unwrap_or_default(),
        }
    }

    fn set_value(&self, value: &str) {
        match self.input() {
            Some(input) => input.set_value(value),
            None => self.element.set_text_content(Some(value)),
        }
    }

    fn set_class(&self, class_name: &str) {
        self.element.set_class_name(class_name);
    }

    fn set_text(&self, text: &str) {
        self.element.set_text_content(Some(text));
    }

    fn is_checked(&self) -> bool {
        self.input().is_some_and(HtmlInputElement::checked)
    }

    fn set_checked(&self, checked: bool) {
        if let Some(input) = self.input() {
            input.set_checked(checked);
            let synced = if checked {
                input.set_attribute("checked", "checked")
            } else {
                input.remove_attribute("checked")
            };
            if let Err(err) = synced {
                log::warn!(
                    "could not sync checked attribute on '{}': {}",
                    input.id(),
                    js_error_message(&err)
                );
            }
        }
    }
}

/// The randomizer page as served to the browser.
///
/// Keys follow the core convention: `.name` selects by class, anything else
/// is an element id.
#[derive(Debug, Clone)]
pub struct DomPage {
    document: Document,
}

impl DomPage {
    #[must_use]
    pub const fn new(document: Document) -> Self {
        Self { document }
    }

    #[must_use]
    pub const fn document(&self) -> &Document {
        &self.document
    }

    fn find(&self, key: &str) -> Option<Element> {
        if key.starts_with('.') {
            self.document.query_selector(key).ok().flatten()
        } else {
            self.document
                .get_element_by_id(key.trim_start_matches('#'))
        }
    }

    fn anchor(&self, key: &str) -> SetupResult<Element> {
        self.find(key)
            .ok_or_else(|| SetupError::MissingSection(key.to_string()))
    }

    fn build(&self, spec: &ElementSpec) -> Result<Node, JsValue> {
        if spec.is_text_node() {
            let text = self
                .document
                .create_text_node(spec.text.as_deref().unwrap_or_default());
            return Ok(text.into());
        }
        let element = self.document.create_element(&spec.tag)?;
        for (name, value) in &spec.attrs {
            element.set_attribute(name, value)?;
        }
        if let Some(text) = &spec.text {
            element.set_text_content(Some(text));
        }
        for child in &spec.children {
            element.append_child(&self.build(child)?)?;
        }
        Ok(element.into())
    }
}

impl Page for DomPage {
    fn contains(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    fn insert(&mut self, spec: ElementSpec, at: Placement) -> SetupResult<()> {
        let anchor = self.anchor(at.anchor())?;
        let node = self.build(&spec).map_err(|err| page_error(&err))?;
        let inserted = match &at {
            Placement::Append(_) => anchor.append_child(&node),
            Placement::Prepend(_) => anchor.insert_before(&node, anchor.first_child().as_ref()),
            Placement::After(key) => {
                let parent = anchor
                    .parent_node()
                    .ok_or_else(|| SetupError::MissingSection(key.clone()))?;
                parent.insert_before(&node, anchor.next_sibling().as_ref())
            }
        };
        inserted.map(|_| ()).map_err(|err| page_error(&err))
    }

    fn field(&self, key: &str) -> Option<FieldHandle> {
        self.find(key)
            .map(|element| Rc::new(DomField::new(element)) as FieldHandle)
    }
}
