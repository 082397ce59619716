//! Caves mini expansion.

use crate::boards::board_field;
use crate::cards::SharedRandom;
use crate::catalog::mini_spec;
use crate::error::SetupResult;
use crate::expansions::activation::{add_mini, ensure_sidebar, mini_applies};
use crate::page::{Page, require_page};
use crate::part::Part;
use crate::state::{ConfigState, Fields, Selection, ViewModel};

pub const ID: &str = "caves";

const CAVE_MARK: &str = " (Cave)";

#[derive(Clone)]
pub struct Caves {
    rng: SharedRandom,
}

impl Caves {
    #[must_use]
    pub fn new(rng: SharedRandom) -> Self {
        Self { rng }
    }
}

/// Oasis boards have no mountains to dig into.
#[must_use]
pub fn board_has_cave(name: &str) -> bool {
    !name.starts_with("Oasis")
}

impl Part for Caves {
    fn id(&self) -> &'static str {
        ID
    }

    fn init(&self, page: Option<&mut dyn Page>, state: ConfigState) -> SetupResult<ConfigState> {
        let page = require_page(page)?;
        let state = ensure_sidebar(page, state)?;
        add_mini(&mini_spec(ID), page, state)
    }

    fn update(
        &self,
        state: &ConfigState,
        mut result: Selection,
        _page: Option<&dyn Page>,
    ) -> SetupResult<Selection> {
        let triggered = result
            .boards
            .iter()
            .any(|board| state.mini.holds(ID, &board.name));
        if !triggered || !mini_applies(state, ID, &mut *self.rng.borrow_mut()) {
            return Ok(result);
        }
        for board in &mut result.boards {
            board.cave = Some(board_has_cave(&board.name));
        }
        log::debug!("caves placed");
        Ok(result)
    }

    fn render(&self, result: &Selection, mut view: ViewModel) -> ViewModel {
        for (board, shown) in result.boards.iter().zip(view.boards.iter_mut()) {
            shown.cave = board.has_cave().then(|| CAVE_MARK.to_string());
        }
        view
    }

    fn view(&self, view: &ViewModel, fields: &Fields) -> SetupResult<()> {
        for (index, board) in view.boards.iter().enumerate() {
            if board.cave.is_some() {
                fields.require(&board_field(index))?.set_value(&board.label());
            }
        }
        Ok(())
    }
}
