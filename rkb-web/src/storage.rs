//! Form settings mirrored into `localStorage`.
//!
//! Checkboxes and text inputs are stored under their id, radio groups under
//! their name with the checked radio's id as value.

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{Document, Event, HtmlInputElement, Storage};

use crate::error::WebError;

/// Value restored into a text or number input with nothing stored.
pub const DEFAULT_TEXT: &str = "50";

const MONITORED: &str = "data-monitored";

/// What an input reads back from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Restored {
    Text(String),
    Checked(bool),
    /// Id of the radio to check within the group.
    Radio(Option<String>),
}

/// Storage key an input is saved under.
#[must_use]
pub fn storage_key(input_type: &str, id: &str, name: &str) -> String {
    if input_type == "radio" {
        name.to_string()
    } else {
        id.to_string()
    }
}

/// Decide what an input of `input_type` shows given its stored value.
#[must_use]
pub fn restored(input_type: &str, stored: Option<String>) -> Restored {
    match input_type {
        "checkbox" => Restored::Checked(stored.as_deref() != Some("false")),
        "radio" => Restored::Radio(stored),
        _ => Restored::Text(
            stored
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| DEFAULT_TEXT.to_string()),
        ),
    }
}

/// Value an input is saved as.
#[must_use]
pub fn saved_value(input_type: &str, id: &str, value: &str, checked: bool) -> String {
    match input_type {
        "checkbox" => checked.to_string(),
        "radio" => id.to_string(),
        _ => value.to_string(),
    }
}

fn inputs(document: &Document) -> Result<Vec<HtmlInputElement>, WebError> {
    let nodes = document.query_selector_all("input")?;
    Ok((0..nodes.length())
        .filter_map(|index| nodes.item(index))
        .filter_map(|node| node.dyn_into::<HtmlInputElement>().ok())
        .collect())
}

fn set_checked(input: &HtmlInputElement, checked: bool) -> Result<(), WebError> {
    input.set_checked(checked);
    if checked {
        input.set_attribute("checked", "checked")?;
    } else {
        input.remove_attribute("checked")?;
    }
    Ok(())
}

/// Apply stored settings to every input on the page.
///
/// # Errors
///
/// Returns an error when the inputs cannot be queried or storage refuses a read.
pub fn restore(document: &Document, storage: &Storage) -> Result<(), WebError> {
    for input in inputs(document)? {
        let kind = input.type_();
        let key = storage_key(&kind, &input.id(), &input.name());
        match restored(&kind, storage.get_item(&key)?) {
            Restored::Text(value) => input.set_value(&value),
            Restored::Checked(checked) => set_checked(&input, checked)?,
            Restored::Radio(Some(id)) => set_checked(&input, input.id() == id)?,
            Restored::Radio(None) => {}
        }
    }
    Ok(())
}

fn save(storage: &Storage, input: &HtmlInputElement) -> Result<(), WebError> {
    let kind = input.type_();
    let key = storage_key(&kind, &input.id(), &input.name());
    let value = saved_value(&kind, &input.id(), &input.value(), input.checked());
    storage.set_item(&key, &value)?;
    Ok(())
}

/// Save every input whenever it changes.
///
/// Inputs already watched are skipped, so this can run on every setup.
///
/// # Errors
///
/// Returns an error when the inputs cannot be queried or a listener cannot be attached.
pub fn monitor(document: &Document, storage: &Storage) -> Result<(), WebError> {
    for input in inputs(document)? {
        if input.has_attribute(MONITORED) {
            continue;
        }
        let storage = storage.clone();
        let on_change = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let Some(input) = event
                .target()
                .and_then(|target| target.dyn_into::<HtmlInputElement>().ok())
            else {
                return;
            };
            if let Err(err) = save(&storage, &input) {
                crate::dom::console_error(&format!("could not save setting: {err}"));
            }
        });
        input.add_event_listener_with_callback("change", on_change.as_ref().unchecked_ref())?;
        on_change.forget();
        input.set_attribute(MONITORED, "true")?;
    }
    Ok(())
}
