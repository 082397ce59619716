//! One button press worth of work: initialise, present, view.

use serde::{Deserialize, Serialize};

use crate::boards::Boards;
use crate::cards::SharedRandom;
use crate::error::SetupResult;
use crate::expansions::ExpansionRegistry;
use crate::goals::Goals;
use crate::page::Page;
use crate::part::Part;
use crate::players::Players;
use crate::state::{ConfigState, Selection, ViewModel};
use crate::{presenter, viewer};

/// Selection and the display values written for it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetupOutcome {
    pub selection: Selection,
    pub view: ViewModel,
}

/// Ordered parts sharing one random source.
///
/// The boards, goals and players parts always come first; expansions follow
/// in the order they were requested.
pub struct SetupEngine {
    rng: SharedRandom,
    parts: Vec<Box<dyn Part>>,
    state: ConfigState,
}

impl std::fmt::Debug for SetupEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SetupEngine")
            .field("parts", &self.parts)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

fn init_part(part: &dyn Part, page: &mut dyn Page, state: ConfigState) -> SetupResult<ConfigState> {
    part.init(Some(page), state)
}

impl SetupEngine {
    /// Engine with the base game parts only.
    #[must_use]
    pub fn new(rng: SharedRandom) -> Self {
        let parts: Vec<Box<dyn Part>> = vec![
            Box::new(Boards::new(rng.clone())),
            Box::new(Goals::new(rng.clone())),
            Box::new(Players::new(rng.clone())),
        ];
        Self {
            rng,
            parts,
            state: ConfigState::new(),
        }
    }

    /// Engine with the base parts followed by the named expansions.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SetupError::UnknownExpansion`] for a name the
    /// registry does not know.
    pub fn with_expansions<S: AsRef<str>>(
        rng: SharedRandom,
        registry: &ExpansionRegistry,
        names: &[S],
    ) -> SetupResult<Self> {
        let mut engine = Self::new(rng);
        let expansions = registry.register_expansions(names, &engine.rng)?;
        engine.parts.extend(expansions);
        Ok(engine)
    }

    pub fn add_part(&mut self, part: Box<dyn Part>) {
        self.parts.push(part);
    }

    #[must_use]
    pub fn parts(&self) -> &[Box<dyn Part>] {
        &self.parts
    }

    #[must_use]
    pub const fn state(&self) -> &ConfigState {
        &self.state
    }

    #[must_use]
    pub const fn rng(&self) -> &SharedRandom {
        &self.rng
    }

    /// Rebuild the configuration by running every part's `init` on `page`.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a part; the previous configuration
    /// is kept in that case.
    pub fn initialize(&mut self, page: &mut dyn Page) -> SetupResult<()> {
        let mut state = ConfigState::new();
        for part in &self.parts {
            state = init_part(part.as_ref(), page, state)?;
        }
        log::debug!(
            "initialised {} parts, active names {:?}",
            self.parts.len(),
            state.names
        );
        self.state = state;
        Ok(())
    }

    /// Draw a selection against the current page settings.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a part's `update`.
    pub fn present(&self, page: &dyn Page) -> SetupResult<Selection> {
        presenter::update(&self.state, &self.parts, Some(page))
    }

    /// Render `selection` and write it into the registered fields.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a part's `view`.
    pub fn display(&self, selection: &Selection) -> SetupResult<ViewModel> {
        viewer::update(Some(selection), &self.parts, &self.state.fields)
    }

    /// Present and display with the configuration already built.
    ///
    /// # Errors
    ///
    /// See [`SetupEngine::present`] and [`SetupEngine::display`].
    pub fn randomize(&self, page: &dyn Page) -> SetupResult<SetupOutcome> {
        let selection = self.present(page)?;
        let view = self.display(&selection)?;
        Ok(SetupOutcome { selection, view })
    }

    /// Full cycle: initialise, present, display.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by any part.
    pub fn run(&mut self, page: &mut dyn Page) -> SetupResult<SetupOutcome> {
        self.initialize(page)?;
        self.randomize(page)
    }
}
