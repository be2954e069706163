use std::fmt;
use std::str::FromStr;

use crate::error::NuclidesError;
use crate::nuclide::NuclearState;

/// Columns of the element table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ElementProperty {
    AtomicNumber,
    Symbol,
    Name,
    AtomicMass,
    Period,
    Group,
    GroupBlock,
    StandardState,
    Electronegativity,
    IonizationEnergy,
    Density,
}

/// Columns of the nuclide table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum NuclideProperty {
    MassNumber,
    State,
    NuclideMass,
    IsotopicComposition,
    HalfLife,
}

impl ElementProperty {
    pub const ALL: [ElementProperty; 11] = [
        Self::AtomicNumber,
        Self::Symbol,
        Self::Name,
        Self::AtomicMass,
        Self::Period,
        Self::Group,
        Self::GroupBlock,
        Self::StandardState,
        Self::Electronegativity,
        Self::IonizationEnergy,
        Self::Density,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::AtomicNumber => "atomic_number",
            Self::Symbol => "symbol",
            Self::Name => "name",
            Self::AtomicMass => "atomic_mass",
            Self::Period => "period",
            Self::Group => "group",
            Self::GroupBlock => "group_block",
            Self::StandardState => "standard_state",
            Self::Electronegativity => "electronegativity",
            Self::IonizationEnergy => "ionization_energy",
            Self::Density => "density",
        }
    }
}

impl NuclideProperty {
    pub const ALL: [NuclideProperty; 5] = [
        Self::MassNumber,
        Self::State,
        Self::NuclideMass,
        Self::IsotopicComposition,
        Self::HalfLife,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::MassNumber => "mass_number",
            Self::State => "state",
            Self::NuclideMass => "nuclide_mass",
            Self::IsotopicComposition => "isotopic_composition",
            Self::HalfLife => "half_life",
        }
    }
}

/// Accepts the snake_case column name. `z` is also accepted for the atomic number.
impl FromStr for ElementProperty {
    type Err = NuclidesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "z" {
            return Ok(Self::AtomicNumber);
        }
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| NuclidesError::UnknownProperty(s.to_string()))
    }
}

/// Accepts the snake_case column name, plus `a` for the mass number and
/// `relative_atomic_mass` for the nuclide mass.
impl FromStr for NuclideProperty {
    type Err = NuclidesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "a" => return Ok(Self::MassNumber),
            "relative_atomic_mass" => return Ok(Self::NuclideMass),
            _ => {}
        }
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| NuclidesError::UnknownProperty(s.to_string()))
    }
}

impl fmt::Display for ElementProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for NuclideProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single cell read from one of the tables.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropertyValue<'a> {
    Integer(u32),
    Float(f64),
    Text(&'a str),
    State(NuclearState),
}

impl<'a> PropertyValue<'a> {
    /// Numeric view of the value; integers are widened, text is `None`.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Self::Integer(v) => Some(f64::from(v)),
            Self::Float(v) => Some(v),
            Self::Text(_) | Self::State(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&'a str> {
        match *self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(s) => f.write_str(s),
            Self::State(s) => write!(f, "{s}"),
        }
    }
}
