//! Bootstrap: wire the setup engine to the `randomSetup` button.

use std::cell::RefCell;
use std::rc::Rc;

use rkb_game::{ExpansionRegistry, Randomizer, SetupEngine, shared};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{Event, HtmlElement};

use crate::dom::{self, DomPage};
use crate::error::WebError;
use crate::storage;

/// Button that triggers a new setup.
pub const RANDOM_SETUP: &str = ".randomSetup";

/// `Math.random` as a [`Randomizer`].
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserRandom;

impl Randomizer for BrowserRandom {
    fn next_unit(&mut self) -> f64 {
        js_sys::Math::random()
    }
}

/// Rebuild the controls, restore saved settings and draw a new setup.
///
/// # Errors
///
/// Returns the first setup or browser error; fields keep their previous
/// contents in that case.
pub fn new_board_setup(engine: &mut SetupEngine, page: &mut DomPage) -> Result<(), WebError> {
    engine.initialize(page)?;
    match dom::local_storage() {
        Ok(store) => {
            storage::restore(page.document(), &store)?;
            storage::monitor(page.document(), &store)?;
        }
        Err(err) => log::warn!(
            "settings will not persist: {}",
            dom::js_error_message(&err)
        ),
    }
    let outcome = engine.randomize(&*page)?;
    log::debug!("new setup: {:?}", outcome.selection);
    Ok(())
}

/// Build the engine for `expansions` and run a setup on every button click.
///
/// One setup is drawn immediately so the page never opens empty.
///
/// # Errors
///
/// Fails when the document or button is missing, an expansion name is
/// unknown, or the click listener cannot be attached.
pub fn start(expansions: &[&str]) -> Result<(), WebError> {
    let document = dom::document().ok_or(WebError::Missing("document"))?;
    let engine = SetupEngine::with_expansions(
        shared(BrowserRandom),
        &ExpansionRegistry::with_builtin(),
        expansions,
    )?;
    let button = document
        .query_selector(RANDOM_SETUP)?
        .and_then(|element| element.dyn_into::<HtmlElement>().ok())
        .ok_or(WebError::Missing("randomSetup button"))?;

    let engine = Rc::new(RefCell::new(engine));
    let page = Rc::new(RefCell::new(DomPage::new(document)));
    let on_click = Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
        let mut engine = engine.borrow_mut();
        let mut page = page.borrow_mut();
        if let Err(err) = new_board_setup(&mut engine, &mut page) {
            dom::console_error(&format!("random setup failed: {err}"));
        }
    });
    button.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
    on_click.forget();
    button.click();
    Ok(())
}

