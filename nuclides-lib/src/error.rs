use thiserror::Error;

use crate::nuclide::NuclideKey;

/// Broad failure category of a [`NuclidesError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    OutOfRange,
    UnknownProperty,
    Schema,
    InvalidInput,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum NuclidesError {
    #[error("unknown element: {0}")]
    UnknownElement(String),
    #[error("unknown nuclide: Z={z}, A={a}")]
    UnknownNuclide { z: u8, a: u16 },
    #[error("unknown nuclide: Z={}, A={} has no {} state", .0.z, .0.a, .0.state.name())]
    UnknownNuclideState(NuclideKey),
    #[error("element {0} has no naturally occurring isotopes")]
    NoNaturalIsotopes(String),
    #[error("atomic number {0} out of range [1, 118]")]
    OutOfRange(u32),
    #[error("unknown property: {0}")]
    UnknownProperty(String),
    #[error("schema violation: {0}")]
    Schema(String),
    #[error("invalid chemical formula: {0}")]
    InvalidFormula(String),
    #[error("invalid composition: {0}")]
    InvalidComposition(String),
    #[error("data error: {0}")]
    Data(String),
}

pub type Result<T> = std::result::Result<T, NuclidesError>;

impl NuclidesError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownElement(_)
            | Self::UnknownNuclide { .. }
            | Self::UnknownNuclideState(_)
            | Self::NoNaturalIsotopes(_) => ErrorKind::NotFound,
            Self::OutOfRange(_) => ErrorKind::OutOfRange,
            Self::UnknownProperty(_) => ErrorKind::UnknownProperty,
            Self::Schema(_) => ErrorKind::Schema,
            Self::InvalidFormula(_) | Self::InvalidComposition(_) | Self::Data(_) => {
                ErrorKind::InvalidInput
            }
        }
    }
}
