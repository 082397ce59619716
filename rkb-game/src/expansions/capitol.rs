//! Capitol mini expansion: a capitol on boards printed with two castles.

use crate::boards::board_field;
use crate::cards::SharedRandom;
use crate::catalog::mini_spec;
use crate::error::{SetupError, SetupResult};
use crate::expansions::activation::{add_mini, ensure_sidebar, mini_applies};
use crate::page::{Page, require_page};
use crate::part::Part;
use crate::state::{CapitolPick, ConfigState, Direction, Fields, Selection, ViewModel};

pub const ID: &str = "capitol";

#[derive(Clone)]
pub struct Capitol {
    rng: SharedRandom,
}

impl Capitol {
    #[must_use]
    pub fn new(rng: SharedRandom) -> Self {
        Self { rng }
    }
}

/// Whether the board carries the two castles a capitol needs.
#[must_use]
pub fn has_two_castles(board: &str, state: &ConfigState) -> bool {
    state.mini.holds(ID, board)
}

impl Part for Capitol {
    fn id(&self) -> &'static str {
        ID
    }

    fn init(&self, page: Option<&mut dyn Page>, state: ConfigState) -> SetupResult<ConfigState> {
        let page = require_page(page)?;
        if state.contents.boards.is_empty() {
            return Err(SetupError::MissingBoardsData);
        }
        if !page.contains(".boards") {
            return Err(SetupError::MissingSection(".boards".into()));
        }
        let state = ensure_sidebar(page, state)?;
        add_mini(&mini_spec(ID), page, state)
    }

    fn update(
        &self,
        state: &ConfigState,
        mut result: Selection,
        _page: Option<&dyn Page>,
    ) -> SetupResult<Selection> {
        let mut rng = self.rng.borrow_mut();
        let applies = mini_applies(state, ID, &mut *rng);
        let direction = if rng.next_unit() < 0.5 {
            Direction::North
        } else {
            Direction::South
        };
        for board in &mut result.boards {
            board.capitol = Some(CapitolPick {
                use_capitol: applies && has_two_castles(&board.name, state),
                direction,
            });
        }
        log::debug!("capitol applies: {applies}, facing {direction}");
        Ok(result)
    }

    fn render(&self, result: &Selection, mut view: ViewModel) -> ViewModel {
        for (board, shown) in result.boards.iter().zip(view.boards.iter_mut()) {
            shown.capitol = board
                .capitol
                .filter(|capitol| capitol.use_capitol)
                .map(|capitol| format!(" (Capitol {})", capitol.direction));
        }
        view
    }

    fn view(&self, view: &ViewModel, fields: &Fields) -> SetupResult<()> {
        for (index, board) in view.boards.iter().enumerate() {
            if board.capitol.is_some() {
                fields.require(&board_field(index))?.set_value(&board.label());
            }
        }
        Ok(())
    }
}
