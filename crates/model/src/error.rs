use thiserror::Error;

/// Errors raised by the document model and the format readers/writers.
#[derive(Debug, Error)]
pub enum Error {
    /// A mutation would violate the content grammar or an invariant.
    #[error("structure error: {0}")]
    Structure(String),

    /// A region id is already registered.
    #[error("duplicate region id: {0}")]
    DuplicateId(String),

    /// A region reference does not resolve in the document's region table.
    #[error("unknown region: {0}")]
    MissingRegion(String),

    /// A value is outside its declared domain (bad style value, negative time).
    #[error("domain error: {0}")]
    Domain(String),

    /// Input bytes do not match the grammar of the source format.
    #[error("parse error: {0}")]
    Parse(String),

    /// An input construct is outside the supported subset.
    #[error("unsupported feature: {0}")]
    UnsupportedFeature(String),

    /// A filter violated document or ISD invariants.
    #[error("filter error: {0}")]
    Filter(String),

    #[error("i/o error")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn structure(msg: impl Into<String>) -> Self {
        Error::Structure(msg.into())
    }

    pub(crate) fn domain(msg: impl Into<String>) -> Self {
        Error::Domain(msg.into())
    }
}
