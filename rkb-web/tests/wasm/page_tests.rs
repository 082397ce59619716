#![cfg(target_arch = "wasm32")]

use rkb_game::{
    BUILTIN_EXPANSIONS, ElementSpec, ExpansionRegistry, Page, Placement, ScriptedRandom,
    SetupEngine, shared,
};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::HtmlInputElement;

use rkb_web::dom::{self, DomPage};
use rkb_web::{app, storage};

wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

fn reset_body() {
    let doc = dom::document().expect("document");
    let body = doc.body().expect("document body");
    body.set_inner_html(
        "<button class=\"randomSetup\">Random setup</button><div class=\"content\"></div>",
    );
    dom::local_storage().expect("localStorage").clear().expect("clear storage");
}

fn page() -> DomPage {
    DomPage::new(dom::document().expect("document"))
}

fn input(id: &str) -> HtmlInputElement {
    dom::document()
        .expect("document")
        .get_element_by_id(id)
        .expect("input exists")
        .dyn_into()
        .expect("is an input")
}

#[wasm_bindgen_test]
fn checkbox_field_keeps_checked_attribute_in_sync() {
    reset_body();
    let mut page = page();
    page.insert(rkb_game::page::checked_checkbox("caves"), Placement::append(".content"))
        .expect("append checkbox");
    let field = page.field("caves").expect("field");
    field.set_checked(false);
    assert!(!input("caves").checked());
    assert!(!input("caves").has_attribute("checked"));
    field.set_checked(true);
    assert!(input("caves").checked());
    assert_eq!(input("caves").get_attribute("checked").as_deref(), Some("checked"));
}

#[wasm_bindgen_test]
fn insert_places_elements_around_anchor() {
    reset_body();
    let mut page = page();
    page.insert(ElementSpec::new("div").class("boards"), Placement::prepend(".content"))
        .expect("prepend boards");
    page.insert(ElementSpec::new("div").class("goals"), Placement::after(".boards"))
        .expect("goals after boards");
    page.insert(
        ElementSpec::new("output").id("b0").text("Farm"),
        Placement::append(".boards"),
    )
    .expect("append output");

    let doc = dom::document().expect("document");
    let content = doc.query_selector(".content").unwrap().unwrap();
    assert_eq!(content.child_element_count(), 2);
    assert_eq!(content.first_element_child().unwrap().class_name(), "boards");
    assert!(page.contains("#b0"));
    assert_eq!(page.field("b0").expect("field").value(), "Farm");
}

#[wasm_bindgen_test]
fn missing_anchor_reports_section() {
    reset_body();
    let mut page = page();
    let err = page
        .insert(ElementSpec::new("div"), Placement::after(".sidebar"))
        .unwrap_err();
    assert_eq!(err, rkb_game::SetupError::MissingSection(".sidebar".into()));
}

#[wasm_bindgen_test]
fn engine_writes_fields_into_document() {
    reset_body();
    let mut page = page();
    let mut engine = SetupEngine::with_expansions(
        shared(ScriptedRandom::reversing(vec![0.0])),
        &ExpansionRegistry::with_builtin(),
        &BUILTIN_EXPANSIONS,
    )
    .expect("builtin expansions");
    let outcome = engine.run(&mut page).expect("setup runs");

    let board = dom::document()
        .unwrap()
        .get_element_by_id("b0")
        .expect("board output");
    assert!(
        board
            .text_content()
            .unwrap_or_default()
            .starts_with(&outcome.view.boards[0].value)
    );
    assert!(input("nomads").checked());
}

#[wasm_bindgen_test]
fn storage_restores_saved_settings() {
    reset_body();
    let mut page = page();
    let mut engine = SetupEngine::with_expansions(
        shared(ScriptedRandom::constant(0.0)),
        &ExpansionRegistry::with_builtin(),
        &["capitol"],
    )
    .expect("capitol");
    engine.initialize(&mut page).expect("initialise");

    let store = dom::local_storage().expect("localStorage");
    store.set_item("capitol", "false").unwrap();
    store.set_item("capitolRulesVsOdds", "capitolOdds").unwrap();
    store.set_item("p", "3").unwrap();
    storage::restore(page.document(), &store).expect("restore");

    assert!(!input("capitol").checked());
    assert!(input("capitolOdds").checked());
    assert!(!input("capitolRules").checked());
    assert_eq!(input("capitolOddsOdds").value(), "50");
    assert_eq!(input("p").value(), "3");
}

#[wasm_bindgen_test]
fn changes_are_saved() {
    reset_body();
    let mut page = page();
    let mut engine = SetupEngine::new(shared(ScriptedRandom::constant(0.0)));
    engine.initialize(&mut page).expect("initialise");
    let store = dom::local_storage().expect("localStorage");
    storage::monitor(page.document(), &store).expect("monitor");
    storage::monitor(page.document(), &store).expect("monitor twice");

    let base = input("base");
    base.set_checked(false);
    let event = web_sys::Event::new("change").unwrap();
    base.dispatch_event(&event).unwrap();
    assert_eq!(store.get_item("base").unwrap().as_deref(), Some("false"));
}

#[wasm_bindgen_test]
fn start_draws_a_setup_on_load() {
    reset_body();
    app::start(&BUILTIN_EXPANSIONS).expect("start");
    let goal = dom::document()
        .unwrap()
        .get_element_by_id("c0")
        .expect("goal output");
    assert!(!goal.text_content().unwrap_or_default().is_empty());
}
