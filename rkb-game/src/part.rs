//! The unit every board pool, card deck and expansion plugs in as.

use crate::error::SetupResult;
use crate::page::Page;
use crate::state::{ConfigState, Fields, Selection, ViewModel};

/// A composable slice of the setup: the base boards, the goals, the player
/// count or one expansion.
///
/// Parts hold no selection state. Each cycle threads the same values through
/// every part in registration order, so a later part can read and extend
/// what an earlier one produced.
pub trait Part {
    /// Identifier the part is registered under.
    fn id(&self) -> &'static str;

    /// Build the part's page section and register its pools and fields.
    ///
    /// Must be idempotent: a second call on the same page reuses the elements
    /// already there.
    ///
    /// # Errors
    ///
    /// Fails when the page is missing or lacks a section the part attaches to.
    fn init(&self, page: Option<&mut dyn Page>, state: ConfigState) -> SetupResult<ConfigState>;

    /// Contribute to the random selection.
    ///
    /// # Errors
    ///
    /// Fails when a collaborator the selection depends on is missing.
    fn update(
        &self,
        state: &ConfigState,
        result: Selection,
        page: Option<&dyn Page>,
    ) -> SetupResult<Selection> {
        let _ = (state, page);
        Ok(result)
    }

    /// Turn the selection into display values. Pure.
    fn render(&self, result: &Selection, view: ViewModel) -> ViewModel {
        let _ = result;
        view
    }

    /// Write display values into the registered fields.
    ///
    /// # Errors
    ///
    /// Fails when a field the part writes was never registered.
    fn view(&self, view: &ViewModel, fields: &Fields) -> SetupResult<()> {
        let _ = (view, fields);
        Ok(())
    }
}

impl std::fmt::Debug for dyn Part {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Part({})", self.id())
    }
}
