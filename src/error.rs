//! Error types.
//!
//! Configuration errors mean "fix your input" and are raised before any packing work.
//! Packing errors come out of the engine itself.

use thiserror::Error;

use crate::strategy::Strategy;
use crate::types::Rect;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("bin size not set")]
    MissingBinSize,

    #[error("bin dimensions must be non-zero, got {0}")]
    ZeroBinSize(Rect),

    #[error("no boxes to pack")]
    NoBoxes,

    #[error("box #{id} has a zero dimension ({rect})")]
    ZeroBoxSize { id: usize, rect: Rect },

    #[error("unknown strategy '{0}', expected one of: {ids}", ids = Strategy::id_list())]
    UnknownStrategy(String),

    #[error("invalid box dimension range {min}..={max}")]
    InvalidDimRange { min: u32, max: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PackError {
    /// Only raised under [`crate::options::OversizePolicy::Reject`].
    #[error("box #{id} ({rect}) does not fit in bin {bin}")]
    Oversized { id: usize, rect: Rect, bin: Rect },

    #[error("packing cancelled")]
    Cancelled,

    #[error("packing time limit exceeded")]
    DeadlineExceeded,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Pack(#[from] PackError),
}
