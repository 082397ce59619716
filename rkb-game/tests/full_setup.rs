use rkb_game::{
    BUILTIN_EXPANSIONS, Direction, ExpansionRegistry, MemoryPage, Page, ScriptedRandom,
    SetupEngine, SetupOutcome, shared,
};

fn engine_with(expansions: &[&str], script: ScriptedRandom) -> SetupEngine {
    SetupEngine::with_expansions(shared(script), &ExpansionRegistry::with_builtin(), expansions)
        .unwrap()
}

fn value_of(page: &MemoryPage, id: &str) -> String {
    page.field(id).unwrap().value()
}

fn board_names(outcome: &SetupOutcome) -> Vec<&str> {
    outcome
        .selection
        .boards
        .iter()
        .map(|b| b.name.as_str())
        .collect()
}

fn goal_names(outcome: &SetupOutcome) -> Vec<&str> {
    outcome
        .selection
        .goals
        .iter()
        .map(|g| g.name.as_str())
        .collect()
}

#[test]
fn reversed_base_game_setup() {
    let mut page = MemoryPage::new();
    let mut engine = engine_with(&[], ScriptedRandom::reversing(vec![0.0]));
    let outcome = engine.run(&mut page).unwrap();

    assert_eq!(board_names(&outcome), vec!["Paddock", "Harbor", "Barn", "Tavern"]);
    assert_eq!(goal_names(&outcome), vec!["Farmers", "Citizens", "Lords"]);
    assert_eq!(outcome.selection.starting_player, Some(1));

    assert_eq!(value_of(&page, "b0"), "Paddock");
    assert_eq!(value_of(&page, "b3"), "Tavern");
    assert_eq!(value_of(&page, "c2"), "Lords");
    assert_eq!(page.element("pc").unwrap().text(), "Player 1 starts");
}

#[test]
fn every_expansion_checked_draws_from_the_last_box() {
    let mut page = MemoryPage::new();
    let mut engine = engine_with(&BUILTIN_EXPANSIONS, ScriptedRandom::reversing(vec![0.0]));
    let outcome = engine.run(&mut page).unwrap();

    assert_eq!(
        board_names(&outcome),
        vec!["University", "Cathedral", "Mountain Station", "Bazaar"]
    );
    assert!(outcome.selection.boards.iter().all(|b| b.kind == "harvest"));
    assert_eq!(goal_names(&outcome), vec!["Rovers", "Homesteaders", "Travellers"]);
    assert_eq!(outcome.selection.tasks.len(), 4);
    assert!(outcome.selection.tasks.iter().all(|t| t.name.is_empty()));
    let island = outcome.selection.island.unwrap();
    assert!(!island.use_island);
    assert!(outcome.selection.boards.iter().all(|b| b.cave.is_none()));
    assert!(
        outcome
            .selection
            .boards
            .iter()
            .all(|b| !b.capitol.unwrap().use_capitol)
    );

    assert_eq!(value_of(&page, "b0"), "University");
    assert_eq!(page.element("b0").unwrap().class_name(), "harvest");
    assert_eq!(value_of(&page, "t0"), "\u{a0}");
    assert_eq!(value_of(&page, "i0"), "");
}

#[test]
fn minis_decorate_base_boards_under_rules() {
    let mut page = MemoryPage::new();
    let mut engine = engine_with(&BUILTIN_EXPANSIONS, ScriptedRandom::reversing(vec![0.0]));
    engine.initialize(&mut page).unwrap();
    for id in ["nomads", "crossroads", "marshlands", "harvest"] {
        page.field(id).unwrap().set_checked(false);
    }
    let outcome = engine.randomize(&page).unwrap();

    assert_eq!(board_names(&outcome), vec!["Paddock", "Harbor", "Barn", "Tavern"]);
    assert_eq!(goal_names(&outcome), vec!["Farmers", "Citizens", "Lords"]);
    let harbor = &outcome.selection.boards[1];
    assert_eq!(harbor.cave, Some(true));
    let capitol = harbor.capitol.unwrap();
    assert!(capitol.use_capitol);
    assert_eq!(capitol.direction, Direction::North);
    assert!(outcome.selection.island.unwrap().use_island);

    assert_eq!(value_of(&page, "b0"), "Paddock (Cave)");
    assert_eq!(value_of(&page, "b1"), "Harbor (Cave) (Capitol N)");
    assert_eq!(value_of(&page, "i0"), "Island");
    assert_eq!(page.element("i0").unwrap().class_name(), "island");
}

#[test]
fn unchecked_minis_leave_boards_plain() {
    let mut page = MemoryPage::new();
    let mut engine = engine_with(&["island", "caves", "capitol"], ScriptedRandom::reversing(vec![0.0]));
    engine.initialize(&mut page).unwrap();
    for id in ["island", "caves", "capitol"] {
        page.field(id).unwrap().set_checked(false);
    }
    let outcome = engine.randomize(&page).unwrap();
    assert_eq!(value_of(&page, "b1"), "Harbor");
    assert!(!outcome.selection.island.unwrap().use_island);
    assert!(outcome.selection.boards.iter().all(|b| b.cave.is_none()));
}

#[test]
fn only_nomads_checked_still_draws_base_goals() {
    let mut page = MemoryPage::new();
    let mut engine = engine_with(&["nomads"], ScriptedRandom::constant(0.0));
    engine.initialize(&mut page).unwrap();
    page.field("base").unwrap().set_checked(false);
    let outcome = engine.randomize(&page).unwrap();

    assert_eq!(outcome.selection.boards.len(), 4);
    assert!(outcome.selection.boards.iter().all(|b| b.kind == "nomads"));
    assert_eq!(outcome.selection.goals.len(), 3);
}

#[test]
fn board_classes_do_not_shadow_checkboxes() {
    let mut page = MemoryPage::new();
    let mut engine = engine_with(&["nomads"], ScriptedRandom::reversing(vec![0.0]));
    engine.run(&mut page).unwrap();
    page.field("nomads").unwrap().set_checked(false);
    engine.initialize(&mut page).unwrap();
    let outcome = engine.randomize(&page).unwrap();
    assert!(outcome.selection.boards.iter().all(|b| b.kind == "base"));
}

#[test]
fn player_count_is_read_from_the_page() {
    let mut page = MemoryPage::new();
    let mut engine = engine_with(&[], ScriptedRandom::constant(0.75));
    engine.initialize(&mut page).unwrap();
    page.field("p").unwrap().set_value("4");
    let outcome = engine.randomize(&page).unwrap();
    assert_eq!(outcome.selection.starting_player, Some(4));
    assert_eq!(page.element("pc").unwrap().text(), "Player 4 starts");
}

#[test]
fn outcome_serialises_with_camel_case_keys() {
    let mut page = MemoryPage::new();
    let mut engine = engine_with(&["island"], ScriptedRandom::reversing(vec![0.0]));
    let outcome = engine.run(&mut page).unwrap();
    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["selection"]["startingPlayer"], 1);
    assert_eq!(json["selection"]["island"]["useIsland"], true);
    assert_eq!(json["selection"]["boards"][0]["type"], "base");
    assert_eq!(json["view"]["boards"][0]["className"], "base");
}

#[test]
fn page_markup_carries_written_fields() {
    let mut page = MemoryPage::new();
    let mut engine = engine_with(&BUILTIN_EXPANSIONS, ScriptedRandom::reversing(vec![0.0]));
    engine.run(&mut page).unwrap();
    let html = page.to_html();
    assert!(html.contains("<h3>MAP</h3>"));
    assert!(html.contains("<h3>TASKS</h3>"));
    assert!(html.contains(">University</output>"));
    assert!(html.contains("Player 1 starts"));
}

#[test]
fn board_decorations_do_not_depend_on_expansion_order() {
    let boards_for = |order: &[&str]| {
        let mut page = MemoryPage::new();
        let mut engine = engine_with(order, ScriptedRandom::reversing(vec![0.0]));
        let outcome = engine.run(&mut page).unwrap();
        assert!(outcome.selection.boards[1].capitol.unwrap().use_capitol);
        (0..4)
            .map(|index| value_of(&page, &format!("b{index}")))
            .collect::<Vec<_>>()
    };
    let caves_first = boards_for(&["caves", "capitol"]);
    let capitol_first = boards_for(&["capitol", "caves"]);
    assert_eq!(caves_first[1], "Harbor (Cave) (Capitol N)");
    assert_eq!(capitol_first, caves_first);
}
