//! Turns a selection into display values and writes them to the page.

use crate::error::{SetupError, SetupResult};
use crate::part::Part;
use crate::state::{Fields, Selection, ViewModel};

/// Render with every part, then let every part write its fields.
///
/// Nothing is written until the whole view model exists.
///
/// # Errors
///
/// Returns [`SetupError::MissingResult`] without a selection, or the first
/// error raised by a part's `view`.
pub fn update(
    result: Option<&Selection>,
    parts: &[Box<dyn Part>],
    fields: &Fields,
) -> SetupResult<ViewModel> {
    let result = result.ok_or(SetupError::MissingResult)?;
    let view = parts
        .iter()
        .fold(ViewModel::default(), |view, part| part.render(result, view));
    for part in parts {
        log::debug!("viewing {}", part.id());
        part.view(&view, fields)?;
    }
    Ok(view)
}
