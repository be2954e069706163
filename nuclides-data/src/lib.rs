#![no_std]

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

/// The complete nuclides database, deserialized from the embedded blob.
///
/// Both tables are stored column by column; every column of a table has
/// the same number of rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NuclideDatabase {
    pub version: Vec<VersionRecord>,
    pub elements: ElementColumns,
    pub nuclides: NuclideColumns,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionRecord {
    pub tag: String,
    pub date: String,
    pub notes: String,
}

/// One row per element, ascending by atomic number.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ElementColumns {
    pub atomic_number: Vec<u8>,
    pub symbol: Vec<String>,
    pub name: Vec<String>,
    /// Standard atomic weight, a.u.
    pub atomic_mass: Vec<f64>,
    pub period: Vec<u8>,
    /// Absent for the f-block rows that have no group assignment.
    pub group: Vec<Option<u8>>,
    pub group_block: Vec<String>,
    pub standard_state: Vec<Option<String>>,
    /// Pauling scale.
    pub electronegativity: Vec<Option<f64>>,
    /// First ionization energy, eV.
    pub ionization_energy: Vec<Option<f64>>,
    /// g/cm³
    pub density: Vec<Option<f64>>,
}

/// One row per known nuclide, ascending by (atomic_number, mass_number, state).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NuclideColumns {
    pub atomic_number: Vec<u8>,
    pub mass_number: Vec<u16>,
    /// 0 = ground state, 1 = metastable.
    pub state: Vec<u8>,
    /// Relative atomic mass of the nuclide, a.u.
    pub molar_mass: Vec<f64>,
    /// Natural abundance among the isotopes of the same element.
    pub isotopic_composition: Vec<Option<f64>>,
    /// Seconds.
    pub half_life: Vec<Option<f64>>,
}

impl ElementColumns {
    pub fn len(&self) -> usize {
        self.atomic_number.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atomic_number.is_empty()
    }
}

impl NuclideColumns {
    pub fn len(&self) -> usize {
        self.atomic_number.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atomic_number.is_empty()
    }
}
