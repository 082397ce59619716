//! The map: four board tiles drawn from every checked box.

use crate::cards::{self, SharedRandom};
use crate::catalog::catalog;
use crate::error::{SetupError, SetupResult};
use crate::page::{ElementSpec, Page, Placement, locate, output_field, require_page};
use crate::part::Part;
use crate::state::{BoardPick, BoardView, ConfigState, Fields, Selection, ViewModel};

/// Boards making up one map.
pub const BOARD_COUNT: usize = 4;

const FLIPPED_MARK: &str = " (↷)";

/// Page ids of the board outputs, in field order.
const BOARD_IDS: [&str; BOARD_COUNT] = ["b0", "b1", "b2", "b3"];

#[must_use]
pub fn board_field(index: usize) -> String {
    format!("board{index}")
}

/// Base-game boards and the map section.
#[derive(Clone)]
pub struct Boards {
    rng: SharedRandom,
}

impl Boards {
    #[must_use]
    pub fn new(rng: SharedRandom) -> Self {
        Self { rng }
    }
}

/// Register `boards` as the pool of `kind`, replacing an earlier list.
pub fn add_boards(kind: &str, boards: Vec<String>, state: &mut ConfigState) {
    state.contents.boards.set(kind, boards);
}

/// Board kinds whose checkbox is on the page and checked.
///
/// Falls back to the base game when nothing is checked.
#[must_use]
pub fn selected_types(state: &ConfigState, page: &dyn Page) -> Vec<String> {
    let checked: Vec<String> = state
        .contents
        .boards
        .keys()
        .filter(|kind| page.is_checked(kind))
        .map(ToString::to_string)
        .collect();
    if checked.is_empty() {
        return vec!["base".to_string()];
    }
    checked
}

fn add_boards_section(page: &mut dyn Page) -> SetupResult<()> {
    if page.contains(".boards") {
        return Ok(());
    }
    let section = BOARD_IDS.iter().fold(
        ElementSpec::new("div")
            .class("boards")
            .child(ElementSpec::new("h3").text("MAP")),
        |section, id| section.child(output_field(id).attr("size", "25")),
    );
    page.insert(section, Placement::prepend(".content"))
}

/// Register the base pool and build the map section with its fields.
///
/// # Errors
///
/// Returns [`SetupError::MissingSection`] when the page has no `content`
/// section.
pub fn prepare(page: &mut dyn Page, mut state: ConfigState) -> SetupResult<ConfigState> {
    state.add_name("base");
    add_boards("base", catalog().base.boards.clone(), &mut state);
    add_boards_section(page)?;
    state.fields.insert("boards", locate(page, ".boards")?);
    for (index, id) in BOARD_IDS.iter().enumerate() {
        state.fields.insert(&board_field(index), locate(page, id)?);
    }
    Ok(state)
}

impl Part for Boards {
    fn id(&self) -> &'static str {
        "base"
    }

    fn init(&self, page: Option<&mut dyn Page>, state: ConfigState) -> SetupResult<ConfigState> {
        prepare(require_page(page)?, state)
    }

    fn update(
        &self,
        state: &ConfigState,
        mut result: Selection,
        page: Option<&dyn Page>,
    ) -> SetupResult<Selection> {
        let page = page.ok_or(SetupError::MissingContext)?;
        let selected = selected_types(state, page);
        let pool: Vec<BoardPick> = state
            .contents
            .boards
            .iter()
            .filter(|(kind, _)| selected.iter().any(|s| s == kind))
            .flat_map(|(kind, names)| names.iter().map(move |name| BoardPick::new(name, kind)))
            .collect();

        let mut rng = self.rng.borrow_mut();
        let mut drawn = cards::draw(cards::shuffle(pool, &mut *rng), BOARD_COUNT);
        for board in &mut drawn {
            board.flipped = rng.next_unit() > 0.5;
        }
        log::debug!(
            "boards from {selected:?}: {:?}",
            drawn.iter().map(|b| b.name.as_str()).collect::<Vec<_>>()
        );
        result.boards = drawn;
        Ok(result)
    }

    fn render(&self, result: &Selection, mut view: ViewModel) -> ViewModel {
        view.boards = result
            .boards
            .iter()
            .map(|board| {
                let mut value = board.name.clone();
                if board.flipped {
                    value.push_str(FLIPPED_MARK);
                }
                BoardView {
                    value,
                    class_name: board.kind.clone(),
                    ..BoardView::default()
                }
            })
            .collect();
        view
    }

    fn view(&self, view: &ViewModel, fields: &Fields) -> SetupResult<()> {
        for index in 0..BOARD_COUNT {
            let field = fields.require(&board_field(index))?;
            match view.boards.get(index) {
                Some(board) => {
                    field.set_value(&board.value);
                    field.set_class(&board.class_name);
                }
                None => {
                    field.set_value("");
                    field.set_class("");
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{ScriptedRandom, SeededRandom, shared};
    use crate::page::{MemoryPage, checked_checkbox};

    fn init_boards(page: &mut MemoryPage, rng: SharedRandom) -> (Boards, ConfigState) {
        let boards = Boards::new(rng);
        let state = boards.init(Some(page), ConfigState::new()).unwrap();
        (boards, state)
    }

    fn drawn_names(result: &Selection) -> Vec<&str> {
        result.boards.iter().map(|b| b.name.as_str()).collect()
    }

    #[test]
    fn init_records_base_name_and_boards() {
        let mut page = MemoryPage::new();
        let (_, state) = init_boards(&mut page, shared(SeededRandom::from_seed(1)));
        assert!(state.has_name("base"));
        assert_eq!(state.contents.boards.get("base").map(<[String]>::len), Some(8));
    }

    #[test]
    fn init_adds_section_once() {
        let mut page = MemoryPage::new();
        let (boards, state) = init_boards(&mut page, shared(SeededRandom::from_seed(1)));
        let state = boards.init(Some(&mut page), state).unwrap();
        let _fresh = boards.init(Some(&mut page), ConfigState::new()).unwrap();
        assert_eq!(page.count(".boards"), 1);
        for id in BOARD_IDS {
            assert_eq!(page.count(id), 1);
        }
        assert!(state.fields.contains("boards"));
        assert!(state.fields.contains("board3"));
    }

    #[test]
    fn init_requires_page() {
        let boards = Boards::new(shared(SeededRandom::from_seed(1)));
        let err = boards.init(None, ConfigState::new()).unwrap_err();
        assert_eq!(err, SetupError::MissingContext);
    }

    #[test]
    fn update_requires_page() {
        let mut page = MemoryPage::new();
        let (boards, state) = init_boards(&mut page, shared(SeededRandom::from_seed(1)));
        let err = boards.update(&state, Selection::default(), None).unwrap_err();
        assert_eq!(err, SetupError::MissingContext);
    }

    #[test]
    fn selects_four_typed_boards() {
        let mut page = MemoryPage::new();
        let (boards, state) = init_boards(&mut page, shared(SeededRandom::from_seed(99)));
        let result = boards.update(&state, Selection::default(), Some(&page)).unwrap();
        assert_eq!(result.boards.len(), BOARD_COUNT);
        assert!(result.boards.iter().all(|b| b.kind == "base"));
    }

    #[test]
    fn reversed_deck_selects_last_four_boards() {
        let mut page = MemoryPage::new();
        let rng = shared(ScriptedRandom::reversing(vec![0.0]));
        let (boards, state) = init_boards(&mut page, rng);
        let result = boards.update(&state, Selection::default(), Some(&page)).unwrap();
        assert_eq!(drawn_names(&result), vec!["Paddock", "Harbor", "Barn", "Tavern"]);
    }

    #[test]
    fn zero_random_selects_boards_after_oracle() {
        let mut page = MemoryPage::new();
        let (boards, state) = init_boards(&mut page, shared(ScriptedRandom::constant(0.0)));
        let result = boards.update(&state, Selection::default(), Some(&page)).unwrap();
        assert_eq!(drawn_names(&result), vec!["Farm", "Oasis", "Tower", "Tavern"]);
        assert!(result.boards.iter().all(|b| !b.flipped));
    }

    #[test]
    fn high_random_flips_boards() {
        let mut page = MemoryPage::new();
        let (boards, state) = init_boards(&mut page, shared(ScriptedRandom::constant(0.99)));
        let result = boards.update(&state, Selection::default(), Some(&page)).unwrap();
        assert!(result.boards.iter().all(|b| b.flipped));
    }

    #[test]
    fn flips_are_drawn_per_board() {
        let mut page = MemoryPage::new();
        // Seven shuffle draws, then one flip draw per board.
        let mut script = vec![0.999; 7];
        script.extend([0.9, 0.1, 0.9, 0.1]);
        let (boards, state) = init_boards(&mut page, shared(ScriptedRandom::new(script)));
        let result = boards.update(&state, Selection::default(), Some(&page)).unwrap();
        let flips: Vec<bool> = result.boards.iter().map(|b| b.flipped).collect();
        assert_eq!(flips, vec![true, false, true, false]);
    }

    #[test]
    fn checked_expansion_joins_pool_and_unchecked_base_leaves_it() {
        let mut page = MemoryPage::new();
        let (boards, mut state) = init_boards(&mut page, shared(ScriptedRandom::reversing(vec![0.0])));
        add_boards("nomads", vec!["Quarry".into(), "Caravan".into()], &mut state);
        page.insert(checked_checkbox("nomads"), Placement::append(".content"))
            .unwrap();
        assert_eq!(selected_types(&state, &page), vec!["nomads".to_string()]);

        page.insert(checked_checkbox("base"), Placement::append(".content"))
            .unwrap();
        assert_eq!(selected_types(&state, &page), vec!["base".to_string(), "nomads".to_string()]);
        let result = boards.update(&state, Selection::default(), Some(&page)).unwrap();
        assert_eq!(drawn_names(&result), vec!["Caravan", "Quarry", "Paddock", "Harbor"]);
        assert_eq!(result.boards[0].kind, "nomads");

        page.field("base").unwrap().set_checked(false);
        let result = boards.update(&state, Selection::default(), Some(&page)).unwrap();
        assert_eq!(drawn_names(&result), vec!["Caravan", "Quarry"]);
    }

    #[test]
    fn nothing_checked_defaults_to_base() {
        let mut page = MemoryPage::new();
        let (_, state) = init_boards(&mut page, shared(SeededRandom::from_seed(3)));
        assert_eq!(selected_types(&state, &page), vec!["base".to_string()]);
    }

    #[test]
    fn render_marks_flipped_boards() {
        let boards = Boards::new(shared(SeededRandom::from_seed(3)));
        let mut flipped = BoardPick::new("Barn", "base");
        flipped.flipped = true;
        let result = Selection {
            boards: vec![BoardPick::new("Farm", "base"), flipped],
            ..Selection::default()
        };
        let view = boards.render(&result, ViewModel::default());
        assert_eq!(view.boards[0].value, "Farm");
        assert_eq!(view.boards[0].class_name, "base");
        assert_eq!(view.boards[1].value, "Barn (↷)");
    }

    #[test]
    fn view_writes_boards_and_clears_missing_slots() {
        let mut page = MemoryPage::new();
        let (boards, state) = init_boards(&mut page, shared(SeededRandom::from_seed(3)));
        let view = ViewModel {
            boards: vec![BoardView {
                value: "Tower".into(),
                class_name: "base".into(),
                ..BoardView::default()
            }],
            ..ViewModel::default()
        };
        page.field("b1").unwrap().set_value("stale");
        boards.view(&view, &state.fields).unwrap();
        assert_eq!(page.field("b0").unwrap().value(), "Tower");
        assert_eq!(page.element("b0").unwrap().class_name(), "base");
        assert_eq!(page.field("b1").unwrap().value(), "");
    }
}
