//! Island mini expansion: an extra tile laid next to a water board.

use crate::cards::SharedRandom;
use crate::catalog::mini_spec;
use crate::error::SetupResult;
use crate::expansions::activation::{add_mini, ensure_sidebar, mini_applies};
use crate::page::{Page, Placement, locate, output_field, require_page};
use crate::part::Part;
use crate::state::{ConfigState, FieldView, Fields, IslandPick, Selection, ViewModel};

pub const ID: &str = "island";

/// Page id and field name of the island output.
pub const ISLAND_FIELD: &str = "i0";

#[derive(Clone)]
pub struct Island {
    rng: SharedRandom,
}

impl Island {
    #[must_use]
    pub fn new(rng: SharedRandom) -> Self {
        Self { rng }
    }
}

#[must_use]
pub fn is_water_board(board: &str, state: &ConfigState) -> bool {
    state.mini.holds(ID, board)
}

impl Part for Island {
    fn id(&self) -> &'static str {
        ID
    }

    fn init(&self, page: Option<&mut dyn Page>, state: ConfigState) -> SetupResult<ConfigState> {
        let page = require_page(page)?;
        let mut state = ensure_sidebar(page, state)?;
        if !page.contains(ISLAND_FIELD) {
            page.insert(output_field(ISLAND_FIELD), Placement::append(".boards"))?;
        }
        state.fields.insert(ISLAND_FIELD, locate(page, ISLAND_FIELD)?);
        add_mini(&mini_spec(ID), page, state)
    }

    fn update(
        &self,
        state: &ConfigState,
        mut result: Selection,
        _page: Option<&dyn Page>,
    ) -> SetupResult<Selection> {
        let mut island = IslandPick::default();
        let near_water = result
            .boards
            .iter()
            .any(|board| is_water_board(&board.name, state));
        if near_water {
            let mut rng = self.rng.borrow_mut();
            if mini_applies(state, ID, &mut *rng) {
                island.use_island = true;
                island.flipped = rng.next_unit() >= 0.5;
            }
        }
        log::debug!("island: {island:?}");
        result.island = Some(island);
        Ok(result)
    }

    fn render(&self, result: &Selection, mut view: ViewModel) -> ViewModel {
        let shown = match result.island {
            Some(island) if island.use_island => {
                let value = if island.flipped { "Island (↷)" } else { "Island" };
                FieldView::new(value, ID)
            }
            _ => FieldView::default(),
        };
        view.island = Some(shown);
        view
    }

    fn view(&self, view: &ViewModel, fields: &Fields) -> SetupResult<()> {
        let shown = view.island.clone().unwrap_or_default();
        let field = fields.require(ISLAND_FIELD)?;
        field.set_value(&shown.value);
        field.set_class(&shown.class_name);
        Ok(())
    }
}
