use approx::assert_relative_eq;
use nuclides::constants::{ATOMIC_MASS_CONSTANT, AVOGADRO, MAX_ATOMIC_NUMBER, NATURAL_MASS_NUMBER};
use nuclides::{CompositionEntry, NuclideDb};

#[test]
fn test_atomic_mass_constant_matches_avogadro() {
    assert_relative_eq!(ATOMIC_MASS_CONSTANT * 1000.0 * AVOGADRO, 1.0, epsilon = 2e-9);
}

#[test]
fn test_table_bounds() {
    let db = NuclideDb::new();
    assert_eq!(db.element_table().len(), usize::from(MAX_ATOMIC_NUMBER));
    assert!(CompositionEntry::new(1, NATURAL_MASS_NUMBER, 1.0).is_natural());
}
