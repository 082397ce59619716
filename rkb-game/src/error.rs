//! Error types for the setup pipeline.

/// Errors raised when a part is asked to work without a collaborator it needs.
///
/// Soft conditions (no qualifying board, an empty pool, a 0% odds setting)
/// are never errors; they flow through the pipeline as `false` or empty
/// values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SetupError {
    /// No page was supplied to an operation that reads or builds the page.
    #[error("missing context: a page is required")]
    MissingContext,

    /// A part that decorates boards was initialised before any board pool.
    #[error("missing boards data")]
    MissingBoardsData,

    /// A page section a part attaches to has not been created yet.
    #[error("missing {0} section")]
    MissingSection(String),

    /// A logical field was not registered during initialisation.
    #[error("missing field '{0}'")]
    MissingField(String),

    /// The viewer was asked to display a selection that does not exist.
    #[error("missing selection result")]
    MissingResult,

    /// No factory is registered for the requested expansion identifier.
    #[error("unknown expansion: {0}")]
    UnknownExpansion(String),

    /// The page implementation rejected an element operation.
    #[error("page error: {0}")]
    Page(String),
}

/// Convenience result type for setup operations.
pub type SetupResult<T> = Result<T, SetupError>;
