/// Avogadro's number (mol^-1)
pub const AVOGADRO: f64 = 6.02214076e23;

/// Atomic mass constant, 1/12 of the mass of a carbon-12 atom (kg)
pub const ATOMIC_MASS_CONSTANT: f64 = 1.66053906660e-27;

/// Highest atomic number in the element table.
pub const MAX_ATOMIC_NUMBER: u8 = 118;

/// Mass number marking a natural isotopic mix in a composition entry.
pub const NATURAL_MASS_NUMBER: u16 = 0;
