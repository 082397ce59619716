//! Builds one random selection from every part in turn.

use crate::error::SetupResult;
use crate::page::Page;
use crate::part::Part;
use crate::state::{ConfigState, Selection};

/// Fold each part's `update` over an empty [`Selection`].
///
/// # Errors
///
/// Stops at the first part that fails and returns its error.
pub fn update(
    state: &ConfigState,
    parts: &[Box<dyn Part>],
    page: Option<&dyn Page>,
) -> SetupResult<Selection> {
    parts.iter().try_fold(Selection::default(), |result, part| {
        log::debug!("presenting {}", part.id());
        part.update(state, result, page)
    })
}
