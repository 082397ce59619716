//! Expansions that only add boards and goals: Nomads, Marshlands and Harvest.

use crate::boards::add_boards;
use crate::catalog::expansion_info;
use crate::error::SetupResult;
use crate::expansions::activation::{add_expansion_entry, ensure_sidebar};
use crate::page::{Page, require_page};
use crate::part::Part;
use crate::state::ConfigState;

/// A full expansion whose tiles and goals simply join the pools.
///
/// Selection, rendering and display are left to the boards and goals parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentExpansion {
    id: &'static str,
}

impl ContentExpansion {
    #[must_use]
    pub const fn new(id: &'static str) -> Self {
        Self { id }
    }

    #[must_use]
    pub const fn nomads() -> Self {
        Self::new("nomads")
    }

    #[must_use]
    pub const fn marshlands() -> Self {
        Self::new("marshlands")
    }

    #[must_use]
    pub const fn harvest() -> Self {
        Self::new("harvest")
    }
}

impl Part for ContentExpansion {
    fn id(&self) -> &'static str {
        self.id
    }

    fn init(&self, page: Option<&mut dyn Page>, state: ConfigState) -> SetupResult<ConfigState> {
        let page = require_page(page)?;
        let mut state = ensure_sidebar(page, state)?;
        let info = expansion_info(self.id);
        state.add_name(self.id);
        add_boards(self.id, info.boards.clone(), &mut state);
        state.contents.goals.set(self.id, info.goals.clone());
        let checkbox = add_expansion_entry(page, &info)?;
        state.fields.insert(self.id, checkbox);
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SetupError;
    use crate::page::MemoryPage;
    use crate::state::Selection;

    fn init(part: ContentExpansion) -> (MemoryPage, ConfigState) {
        let mut page = MemoryPage::new();
        let state = part.init(Some(&mut page), ConfigState::new()).unwrap();
        (page, state)
    }

    #[test]
    fn nomads_register_boards_goals_and_checkbox() {
        let (page, state) = init(ContentExpansion::nomads());
        assert!(state.has_name("nomads"));
        assert_eq!(
            state.contents.boards.get("nomads").unwrap(),
            ["Quarry", "Caravan", "Village", "Garden"]
        );
        assert_eq!(
            state.contents.goals.get("nomads").unwrap(),
            ["Families", "Shepherds", "Ambassadors"]
        );
        assert!(page.is_checked("nomads"));
        assert!(state.fields.contains("nomads"));
        assert!(page.to_html().contains("title=\"Quarry, Caravan, Village, Garden\""));
    }

    #[test]
    fn marshlands_and_harvest_bring_six_goals() {
        for part in [ContentExpansion::marshlands(), ContentExpansion::harvest()] {
            let (_, state) = init(part);
            assert_eq!(state.contents.boards.get(part.id()).map(<[String]>::len), Some(4));
            assert_eq!(state.contents.goals.get(part.id()).map(<[String]>::len), Some(6));
        }
    }

    #[test]
    fn init_is_idempotent() {
        let mut page = MemoryPage::new();
        let part = ContentExpansion::harvest();
        let state = part.init(Some(&mut page), ConfigState::new()).unwrap();
        let state = part.init(Some(&mut page), state).unwrap();
        assert_eq!(page.count("harvest"), 1);
        assert_eq!(state.names.iter().filter(|n| *n == "harvest").count(), 1);
    }

    #[test]
    fn init_requires_page() {
        let err = ContentExpansion::nomads()
            .init(None, ConfigState::new())
            .unwrap_err();
        assert_eq!(err, SetupError::MissingContext);
    }

    #[test]
    fn update_passes_selection_through() {
        let (page, state) = init(ContentExpansion::marshlands());
        let result = Selection {
            starting_player: Some(2),
            ..Selection::default()
        };
        let updated = ContentExpansion::marshlands()
            .update(&state, result.clone(), Some(&page))
            .unwrap();
        assert_eq!(updated, result);
    }
}
