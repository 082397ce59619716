//! Random Kingdom Builder setup
//!
//! Platform-agnostic core of the setup randomizer: board, goal and task
//! selection, the expansion parts and the update/render/view pipeline they
//! plug into. This crate does not touch the browser; pages are reached
//! through the [`Page`] trait.

pub mod boards;
pub mod cards;
pub mod catalog;
pub mod error;
pub mod expansions;
pub mod goals;
pub mod page;
pub mod part;
pub mod players;
pub mod presenter;
pub mod setup;
pub mod state;
pub mod viewer;

// Re-export commonly used types
pub use boards::{BOARD_COUNT, Boards, add_boards, selected_types};
pub use cards::{Randomizer, ScriptedRandom, SeededRandom, SharedRandom, draw, shared, shuffle};
pub use catalog::{Catalog, ExpansionInfo, MiniSpec, catalog};
pub use error::{SetupError, SetupResult};
pub use expansions::{
    BUILTIN_EXPANSIONS, Capitol, Caves, ContentExpansion, Crossroads, ExpansionRegistry, Island,
    PartFactory, RuleType,
};
pub use goals::{GOAL_COUNT, Goals};
pub use page::{ElementSpec, Field, FieldHandle, MemoryField, MemoryPage, Page, Placement};
pub use part::Part;
pub use players::{MAX_PLAYERS, MIN_PLAYERS, Players};
pub use setup::{SetupEngine, SetupOutcome};
pub use state::{
    BoardPick, BoardView, CapitolPick, CardPick, ConfigState, Contents, Direction, FieldView,
    Fields, IslandPick, Pools, Selection, ViewModel,
};
