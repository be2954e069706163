use approx::assert_relative_eq;
use nuclides::{CompositionEntry, ErrorKind, NuclideDb, NuclidesError, normalize_fractions};

fn water_by_mass(db: &NuclideDb) -> Vec<CompositionEntry> {
    vec![
        CompositionEntry::new(1, 1, 2.0 * db.atomic_mass(1).unwrap()),
        CompositionEntry::new(8, 16, db.atomic_mass(8).unwrap()),
    ]
}

#[test]
fn test_convert_to_atomic_fraction_water() {
    let db = NuclideDb::new();
    let mut water = water_by_mass(&db);
    db.convert_to_atomic_fraction(&mut water).unwrap();
    assert_relative_eq!(water[0].fraction, 2.0, epsilon = 1.5e-3);
    assert_relative_eq!(water[1].fraction, 1.0, epsilon = 1.5e-3);
    assert_eq!((water[0].z, water[0].a), (1, 1));
}

#[test]
fn test_conversion_is_reversible() {
    let db = NuclideDb::new();
    let original = vec![
        CompositionEntry::new(92, 235, 0.05),
        CompositionEntry::new(92, 238, 0.95),
    ];
    let mut entries = original.clone();
    db.convert_to_atomic_fraction(&mut entries).unwrap();
    assert!(entries[0].fraction < 0.05);
    db.convert_to_mass_fraction(&mut entries).unwrap();
    for (after, before) in entries.iter().zip(&original) {
        assert_relative_eq!(after.fraction, before.fraction, max_relative = 1e-14);
    }
}

#[test]
fn test_failed_conversion_leaves_input_untouched() {
    let db = NuclideDb::new();
    let original = vec![
        CompositionEntry::new(1, 1, 1.0),
        CompositionEntry::new(8, 99, 1.0),
    ];
    let mut entries = original.clone();
    let err = db.convert_to_atomic_fraction(&mut entries).unwrap_err();
    assert_eq!(err, NuclidesError::UnknownNuclide { z: 8, a: 99 });
    assert_eq!(entries, original);

    let err = db.convert_to_mass_fraction(&mut entries).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(entries, original);
}

#[test]
fn test_conversion_rejects_natural_and_negative_entries() {
    let db = NuclideDb::new();
    let mut natural = vec![CompositionEntry::natural(8, 1.0)];
    assert_eq!(
        db.convert_to_atomic_fraction(&mut natural).unwrap_err().kind(),
        ErrorKind::NotFound
    );

    let mut negative = vec![CompositionEntry::new(8, 16, -1.0)];
    assert_eq!(
        db.convert_to_atomic_fraction(&mut negative).unwrap_err().kind(),
        ErrorKind::InvalidInput
    );
    assert_eq!(negative[0].fraction, -1.0);
}

#[test]
fn test_expand_natural_presence() {
    let db = NuclideDb::new();
    let composition = [
        CompositionEntry::natural(1, 2.0),
        CompositionEntry::from((8, 16, 1.0)),
    ];
    let expected = vec![
        CompositionEntry::new(1, 1, 2.0 * 0.999885),
        CompositionEntry::new(1, 2, 2.0 * 0.000115),
        CompositionEntry::new(8, 16, 1.0),
    ];
    let actual: Vec<CompositionEntry> = db
        .expand_natural_presence(composition)
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(actual, expected);
}

#[test]
fn test_expansion_conserves_total_fraction() {
    let db = NuclideDb::new();
    let composition = vec![
        CompositionEntry::natural(26, 0.7),
        CompositionEntry::natural(24, 0.2),
        CompositionEntry::natural(28, 0.1),
    ];
    let expanded: Vec<CompositionEntry> = db
        .expand_natural_presence(composition)
        .collect::<Result<_, _>>()
        .unwrap();
    let total: f64 = expanded.iter().map(|e| e.fraction).sum();
    assert_relative_eq!(total, 1.0, epsilon = 1e-9);
    assert!(expanded.iter().all(|e| !e.is_natural()));

    let iron: Vec<u16> = expanded.iter().filter(|e| e.z == 26).map(|e| e.a).collect();
    assert_eq!(iron, vec![54, 56, 57, 58]);
}

#[test]
fn test_expansion_of_tantalum_keeps_metastable_isotope() {
    let db = NuclideDb::new();
    let expanded: Vec<CompositionEntry> = db
        .expand_natural_presence([CompositionEntry::natural(73, 1.0)])
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(
        expanded,
        vec![
            CompositionEntry::new(73, 180, 0.0001201),
            CompositionEntry::new(73, 181, 0.9998799),
        ]
    );
}

#[test]
fn test_expansion_is_lazy_and_stops_after_error() {
    let db = NuclideDb::new();
    let composition = vec![
        CompositionEntry::new(8, 16, 1.0),
        CompositionEntry::natural(43, 1.0),
        CompositionEntry::natural(1, 1.0),
    ];
    let mut iter = db.expand_natural_presence(composition);
    assert_eq!(iter.next(), Some(Ok(CompositionEntry::new(8, 16, 1.0))));
    assert_eq!(
        iter.next(),
        Some(Err(NuclidesError::NoNaturalIsotopes("Tc".into())))
    );
    assert_eq!(iter.next(), None);
    assert_eq!(iter.next(), None);
}

#[test]
fn test_expansion_of_unknown_element() {
    let db = NuclideDb::new();
    let mut iter = db.expand_natural_presence([CompositionEntry::natural(0, 1.0)]);
    assert_eq!(iter.next().unwrap().unwrap_err().kind(), ErrorKind::OutOfRange);
    assert!(iter.next().is_none());
}

#[test]
fn test_expand_then_convert() {
    let db = NuclideDb::new();
    let mut entries: Vec<CompositionEntry> = db
        .expand_natural_presence([CompositionEntry::natural(6, 1.0)])
        .collect::<Result<_, _>>()
        .unwrap();
    db.convert_to_atomic_fraction(&mut entries).unwrap();
    normalize_fractions(&mut entries).unwrap();
    let total: f64 = entries.iter().map(|e| e.fraction).sum();
    assert_relative_eq!(total, 1.0, epsilon = 1e-12);
}

#[test]
fn test_normalize_fractions() {
    let mut entries = vec![
        CompositionEntry::new(1, 1, 2.0),
        CompositionEntry::new(8, 16, 6.0),
    ];
    normalize_fractions(&mut entries).unwrap();
    assert_relative_eq!(entries[0].fraction, 0.25);
    assert_relative_eq!(entries[1].fraction, 0.75);

    let mut empty: Vec<CompositionEntry> = Vec::new();
    assert_eq!(
        normalize_fractions(&mut empty).unwrap_err().kind(),
        ErrorKind::InvalidInput
    );
    let mut zero = vec![CompositionEntry::new(1, 1, 0.0)];
    assert!(normalize_fractions(&mut zero).is_err());
}

#[test]
fn test_from_molecular_formula() {
    let db = NuclideDb::new();
    let water = db.from_molecular_formula("H2O").unwrap();
    assert_eq!(water.len(), 2);
    assert_eq!((water[0].z, water[0].a), (1, 0));
    assert_eq!((water[1].z, water[1].a), (8, 0));
    assert_relative_eq!(water[0].fraction, 2.0 / 3.0, epsilon = 1e-12);
    assert_relative_eq!(water[1].fraction, 1.0 / 3.0, epsilon = 1e-12);
}

#[test]
fn test_from_molecular_formula_heavy_water() {
    let db = NuclideDb::new();
    let entries = db.from_molecular_formula("HDO").unwrap();
    let keys: Vec<(u8, u16)> = entries.iter().map(|e| (e.z, e.a)).collect();
    assert_eq!(keys, vec![(1, 0), (1, 2), (8, 0)]);

    let tritiated = db.from_molecular_formula("T2O").unwrap();
    assert_eq!((tritiated[0].z, tritiated[0].a), (1, 3));
}

#[test]
fn test_from_molecular_formula_sorted_by_atomic_number() {
    let db = NuclideDb::new();
    let entries = db.from_molecular_formula("Mn(SO4)2(H2O)7").unwrap();
    let zs: Vec<u8> = entries.iter().map(|e| e.z).collect();
    assert_eq!(zs, vec![1, 8, 16, 25]);
    let total: f64 = entries.iter().map(|e| e.fraction).sum();
    assert_relative_eq!(total, 1.0, epsilon = 1e-12);
}

#[test]
fn test_from_molecular_formula_rejects_unknown_symbol() {
    let db = NuclideDb::new();
    let err = db.from_molecular_formula("Xx2O").unwrap_err();
    assert!(matches!(err, NuclidesError::InvalidFormula(ref m) if m.contains("Xx")));
    assert_eq!(db.from_molecular_formula("h2o").unwrap_err().kind(), ErrorKind::InvalidInput);
}

#[test]
fn test_from_molecular_formula_unbalanced_nesting_is_an_error() {
    let db = NuclideDb::new();
    let err = db.from_molecular_formula(&"(".repeat(500_000)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

#[test]
fn test_mean_atomic_mass() {
    let db = NuclideDb::new();
    let water = db.from_molecular_formula("H2O").unwrap();
    let expected = (2.0 * 1.008 + 15.999) / 3.0;
    assert_relative_eq!(db.mean_atomic_mass(&water).unwrap(), expected, epsilon = 1e-12);

    let deuterium = [CompositionEntry::new(1, 2, 1.0)];
    assert_relative_eq!(
        db.mean_atomic_mass(&deuterium).unwrap(),
        2.01410177812,
        epsilon = 1e-12
    );

    assert_eq!(
        db.mean_atomic_mass(&[]).unwrap_err().kind(),
        ErrorKind::InvalidInput
    );
}
