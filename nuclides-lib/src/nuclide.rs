use std::collections::HashMap;
use std::fmt;
use std::ops::Range;

use nuclides_data::NuclideColumns;

use crate::db::{NuclideDb, check_len};
use crate::element::{Element, ElementRef, ElementTable};
use crate::error::{NuclidesError, Result};
use crate::property::{ElementProperty, NuclideProperty, PropertyValue};

/// Tolerance on the sum of natural abundances of one element.
pub const COMPOSITION_SUM_TOLERANCE: f64 = 1e-3;

/// Nuclear excitation state. Ground states sort before metastable ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum NuclearState {
    #[default]
    Ground,
    Metastable,
}

impl NuclearState {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Ground),
            1 => Some(Self::Metastable),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        match self {
            Self::Ground => 0,
            Self::Metastable => 1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Ground => "ground",
            Self::Metastable => "metastable",
        }
    }
}

impl fmt::Display for NuclearState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ground => "g",
            Self::Metastable => "m",
        })
    }
}

/// Primary key of the nuclide table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NuclideKey {
    pub z: u8,
    pub a: u16,
    pub state: NuclearState,
}

impl NuclideKey {
    pub fn new(z: u8, a: u16) -> Self {
        NuclideKey {
            z,
            a,
            state: NuclearState::Ground,
        }
    }

    pub fn metastable(z: u8, a: u16) -> Self {
        NuclideKey {
            z,
            a,
            state: NuclearState::Metastable,
        }
    }
}

impl fmt::Display for NuclideKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.z, self.a)?;
        if self.state == NuclearState::Metastable {
            f.write_str("m")?;
        }
        Ok(())
    }
}

/// The nuclide table, sorted by key, with a point index and per-element row ranges.
#[derive(Debug)]
pub struct NuclideTable {
    columns: NuclideColumns,
    keys: Vec<NuclideKey>,
    by_key: HashMap<NuclideKey, usize>,
    /// (Z, A) to the row of the lowest state with that mass number.
    by_mass_number: HashMap<(u8, u16), usize>,
    /// Indexed by Z - 1.
    element_rows: Vec<Range<usize>>,
}

impl NuclideTable {
    /// Validates the columns against `elements` and builds the indices.
    ///
    /// Rows may arrive in any order; they are sorted by (Z, A, state). Fails
    /// with a schema error on a duplicate key, an unknown Z, an invalid state,
    /// a non-positive mass, a composition outside [0, 1], or an element whose
    /// natural abundances do not sum to 1.
    pub fn from_columns(columns: NuclideColumns, elements: &ElementTable) -> Result<Self> {
        let n = columns.len();
        check_len("nuclides", "mass_number", columns.mass_number.len(), n)?;
        check_len("nuclides", "state", columns.state.len(), n)?;
        check_len("nuclides", "molar_mass", columns.molar_mass.len(), n)?;
        check_len(
            "nuclides",
            "isotopic_composition",
            columns.isotopic_composition.len(),
            n,
        )?;
        check_len("nuclides", "half_life", columns.half_life.len(), n)?;

        let mut keys = Vec::with_capacity(n);
        for row in 0..n {
            let z = columns.atomic_number[row];
            let a = columns.mass_number[row];
            elements
                .resolve(ElementRef::Z(z))
                .map_err(|_| NuclidesError::Schema(format!("nuclide row {row} has unknown Z={z}")))?;
            let state = NuclearState::from_u8(columns.state[row]).ok_or_else(|| {
                NuclidesError::Schema(format!(
                    "nuclide {z}-{a} has invalid state {}",
                    columns.state[row]
                ))
            })?;
            let mass = columns.molar_mass[row];
            if !(mass.is_finite() && mass > 0.0) {
                return Err(NuclidesError::Schema(format!(
                    "nuclide {z}-{a} has non-positive mass {mass}"
                )));
            }
            if let Some(c) = columns.isotopic_composition[row] {
                if !(0.0..=1.0).contains(&c) {
                    return Err(NuclidesError::Schema(format!(
                        "nuclide {z}-{a} has isotopic composition {c} outside [0, 1]"
                    )));
                }
            }
            keys.push(NuclideKey { z, a, state });
        }

        let (columns, keys) = if keys.is_sorted() {
            (columns, keys)
        } else {
            let mut order: Vec<usize> = (0..n).collect();
            order.sort_by_key(|&row| keys[row]);
            (permute_columns(&columns, &order), permute(&keys, &order))
        };

        let mut by_key = HashMap::with_capacity(n);
        let mut by_mass_number = HashMap::with_capacity(n);
        for (row, &key) in keys.iter().enumerate() {
            if by_key.insert(key, row).is_some() {
                return Err(NuclidesError::Schema(format!("duplicate nuclide key {key}")));
            }
            // Rows are sorted, so the first row seen for (Z, A) has the lowest state.
            by_mass_number.entry((key.z, key.a)).or_insert(row);
        }

        let mut element_rows = vec![0..0; elements.len()];
        let mut start = 0;
        while start < n {
            let z = keys[start].z;
            let end = start + keys[start..].iter().take_while(|k| k.z == z).count();
            element_rows[usize::from(z) - 1] = start..end;
            start = end;
        }

        for (index, rows) in element_rows.iter().enumerate() {
            let sum: f64 = columns.isotopic_composition[rows.clone()]
                .iter()
                .flatten()
                .filter(|&&c| c > 0.0)
                .sum();
            if sum > 0.0 && (sum - 1.0).abs() > COMPOSITION_SUM_TOLERANCE {
                return Err(NuclidesError::Schema(format!(
                    "natural abundances of Z={} sum to {sum}",
                    index + 1
                )));
            }
        }

        Ok(NuclideTable {
            columns,
            keys,
            by_key,
            by_mass_number,
            element_rows,
        })
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Raw column storage, sorted by key.
    pub fn columns(&self) -> &NuclideColumns {
        &self.columns
    }

    pub fn keys(&self) -> &[NuclideKey] {
        &self.keys
    }

    pub fn row_of(&self, key: NuclideKey) -> Option<usize> {
        self.by_key.get(&key).copied()
    }

    /// Row of the lowest available state of (Z, A).
    pub fn row_of_mass_number(&self, z: u8, a: u16) -> Option<usize> {
        self.by_mass_number.get(&(z, a)).copied()
    }

    /// Rows belonging to one element; empty for an unknown Z.
    pub fn element_rows(&self, z: u8) -> Range<usize> {
        usize::from(z)
            .checked_sub(1)
            .and_then(|i| self.element_rows.get(i))
            .cloned()
            .unwrap_or(0..0)
    }

    /// Natural abundance of a row, `None` unless it is strictly positive.
    pub(crate) fn natural_abundance(&self, row: usize) -> Option<f64> {
        self.columns.isotopic_composition[row].filter(|&c| c > 0.0)
    }
}

fn permute<T: Clone>(values: &[T], order: &[usize]) -> Vec<T> {
    order.iter().map(|&row| values[row].clone()).collect()
}

fn permute_columns(columns: &NuclideColumns, order: &[usize]) -> NuclideColumns {
    NuclideColumns {
        atomic_number: permute(&columns.atomic_number, order),
        mass_number: permute(&columns.mass_number, order),
        state: permute(&columns.state, order),
        molar_mass: permute(&columns.molar_mass, order),
        isotopic_composition: permute(&columns.isotopic_composition, order),
        half_life: permute(&columns.half_life, order),
    }
}

/// A row of the nuclide table, with access to its element.
#[derive(Clone, Copy)]
pub struct Nuclide<'a> {
    table: &'a NuclideTable,
    elements: &'a ElementTable,
    row: usize,
}

impl<'a> Nuclide<'a> {
    pub fn key(&self) -> NuclideKey {
        self.table.keys[self.row]
    }

    pub fn z(&self) -> u8 {
        self.key().z
    }

    pub fn a(&self) -> u16 {
        self.key().a
    }

    pub fn state(&self) -> NuclearState {
        self.key().state
    }

    /// Relative atomic mass of the nuclide, a.u.
    pub fn mass(&self) -> f64 {
        self.table.columns.molar_mass[self.row]
    }

    pub fn isotopic_composition(&self) -> Option<f64> {
        self.table.columns.isotopic_composition[self.row]
    }

    pub fn is_natural(&self) -> bool {
        self.table.natural_abundance(self.row).is_some()
    }

    /// Seconds. `None` for stable nuclides and where no value is tabulated.
    pub fn half_life(&self) -> Option<f64> {
        self.table.columns.half_life[self.row]
    }

    pub fn element(&self) -> Element<'a> {
        self.elements.element_of(self.z())
    }

    pub fn symbol(&self) -> &'a str {
        self.elements.symbol_of(self.z())
    }

    pub fn property(&self, property: NuclideProperty) -> Option<PropertyValue<'a>> {
        use NuclideProperty as P;
        match property {
            P::MassNumber => Some(PropertyValue::Integer(u32::from(self.a()))),
            P::State => Some(PropertyValue::State(self.state())),
            P::NuclideMass => Some(PropertyValue::Float(self.mass())),
            P::IsotopicComposition => self.isotopic_composition().map(PropertyValue::Float),
            P::HalfLife => self.half_life().map(PropertyValue::Float),
        }
    }
}

impl fmt::Display for Nuclide<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.symbol(), self.a())?;
        if self.state() == NuclearState::Metastable {
            f.write_str("m")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Nuclide<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Nuclide")
            .field("key", &self.key())
            .field("mass", &self.mass())
            .field("isotopic_composition", &self.isotopic_composition())
            .finish()
    }
}

impl NuclideDb {
    fn nuclide_at(&self, row: usize) -> Nuclide<'static> {
        Nuclide {
            table: self.nuclide_table(),
            elements: self.element_table(),
            row,
        }
    }

    /// Nuclide (Z, A) in its lowest available state. Ta-180 resolves to its
    /// metastable state since that is the only one tabulated.
    pub fn nuclide<'r>(
        &self,
        element: impl Into<ElementRef<'r>>,
        a: u16,
    ) -> Result<Nuclide<'static>> {
        let z = self.element_table().resolve(element.into())?;
        self.nuclide_table()
            .row_of_mass_number(z, a)
            .map(|row| self.nuclide_at(row))
            .ok_or(NuclidesError::UnknownNuclide { z, a })
    }

    /// Exact (Z, A, state) lookup. If (Z, A) is tabulated only in another
    /// state the error is [`NuclidesError::UnknownNuclideState`].
    pub fn nuclide_by_key(&self, key: NuclideKey) -> Result<Nuclide<'static>> {
        self.element_table().resolve(ElementRef::Z(key.z))?;
        let table = self.nuclide_table();
        match table.row_of(key) {
            Some(row) => Ok(self.nuclide_at(row)),
            None if table.row_of_mass_number(key.z, key.a).is_some() => {
                Err(NuclidesError::UnknownNuclideState(key))
            }
            None => Err(NuclidesError::UnknownNuclide { z: key.z, a: key.a }),
        }
    }

    /// Relative atomic mass of nuclide (Z, A), a.u.
    pub fn nuclide_mass<'r>(&self, element: impl Into<ElementRef<'r>>, a: u16) -> Result<f64> {
        Ok(self.nuclide(element, a)?.mass())
    }

    pub fn nuclide_property<'r>(
        &self,
        element: impl Into<ElementRef<'r>>,
        a: u16,
        property: NuclideProperty,
    ) -> Result<Option<PropertyValue<'static>>> {
        Ok(self.nuclide(element, a)?.property(property))
    }

    /// Look up a column by name, trying nuclide columns before element columns.
    pub fn nuclide_property_by_name<'r>(
        &self,
        element: impl Into<ElementRef<'r>>,
        a: u16,
        property: &str,
    ) -> Result<Option<PropertyValue<'static>>> {
        let nuclide = self.nuclide(element, a)?;
        if let Ok(p) = property.parse::<NuclideProperty>() {
            return Ok(nuclide.property(p));
        }
        let p: ElementProperty = property.parse()?;
        Ok(nuclide.element().property(p))
    }

    /// Naturally occurring isotopes of an element as (A, abundance), ascending by A.
    /// Empty for elements with no natural isotopes.
    pub fn isotopic_composition<'r>(
        &self,
        element: impl Into<ElementRef<'r>>,
    ) -> Result<Vec<(u16, f64)>> {
        let z = self.element_table().resolve(element.into())?;
        let table = self.nuclide_table();
        Ok(table
            .element_rows(z)
            .filter_map(|row| {
                table
                    .natural_abundance(row)
                    .map(|c| (table.keys[row].a, c))
            })
            .collect())
    }

    /// Every tabulated nuclide of an element, natural or not, ascending by (A, state).
    pub fn isotopes<'r>(
        &self,
        element: impl Into<ElementRef<'r>>,
    ) -> Result<impl ExactSizeIterator<Item = Nuclide<'static>>> {
        let z = self.element_table().resolve(element.into())?;
        let db = *self;
        Ok(self
            .nuclide_table()
            .element_rows(z)
            .map(move |row| db.nuclide_at(row)))
    }

    /// All nuclides, sorted by key.
    pub fn nuclides(&self) -> impl ExactSizeIterator<Item = Nuclide<'static>> + use<> {
        let db = *self;
        (0..db.nuclide_table().len()).map(move |row| db.nuclide_at(row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn columns(rows: &[(u8, u16, u8, f64, Option<f64>)]) -> NuclideColumns {
        NuclideColumns {
            atomic_number: rows.iter().map(|r| r.0).collect(),
            mass_number: rows.iter().map(|r| r.1).collect(),
            state: rows.iter().map(|r| r.2).collect(),
            molar_mass: rows.iter().map(|r| r.3).collect(),
            isotopic_composition: rows.iter().map(|r| r.4).collect(),
            half_life: vec![None; rows.len()],
        }
    }

    #[test]
    fn test_sorts_and_indexes_rows() {
        let elements = NuclideDb::new().element_table();
        let table = NuclideTable::from_columns(
            columns(&[
                (2, 4, 0, 4.0026, Some(1.0)),
                (1, 2, 0, 2.014, Some(0.25)),
                (1, 1, 0, 1.0078, Some(0.75)),
                (1, 3, 0, 3.016, None),
            ]),
            elements,
        )
        .unwrap();

        assert_eq!(table.columns().mass_number, vec![1, 2, 3, 4]);
        assert_eq!(table.columns().molar_mass[0], 1.0078);
        assert_eq!(table.element_rows(1), 0..3);
        assert_eq!(table.element_rows(2), 3..4);
        assert_eq!(table.element_rows(3), 0..0);
        assert_eq!(table.element_rows(0), 0..0);
        assert_eq!(table.row_of(NuclideKey::new(1, 3)), Some(2));
        assert_eq!(table.natural_abundance(2), None);
    }

    #[test]
    fn test_lowest_state_wins_for_mass_number() {
        let elements = NuclideDb::new().element_table();
        let table = NuclideTable::from_columns(
            columns(&[(3, 7, 1, 7.02, None), (3, 7, 0, 7.016, Some(1.0))]),
            elements,
        )
        .unwrap();
        let row = table.row_of_mass_number(3, 7).unwrap();
        assert_eq!(table.keys()[row].state, NuclearState::Ground);
        assert!(table.row_of(NuclideKey::metastable(3, 7)).is_some());
    }

    #[test]
    fn test_rejects_duplicate_key() {
        let elements = NuclideDb::new().element_table();
        let err = NuclideTable::from_columns(
            columns(&[(1, 1, 0, 1.0078, Some(1.0)), (1, 1, 0, 1.0078, None)]),
            elements,
        )
        .unwrap_err();
        assert!(matches!(err, NuclidesError::Schema(ref m) if m.contains("duplicate")));
    }

    #[test]
    fn test_rejects_bad_composition_sum() {
        let elements = NuclideDb::new().element_table();
        let err = NuclideTable::from_columns(
            columns(&[(1, 1, 0, 1.0078, Some(0.9)), (1, 2, 0, 2.014, Some(0.05))]),
            elements,
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Schema);
    }

    #[test]
    fn test_rejects_unknown_z_and_state() {
        let elements = NuclideDb::new().element_table();
        assert!(NuclideTable::from_columns(columns(&[(0, 1, 0, 1.0, None)]), elements).is_err());
        assert!(NuclideTable::from_columns(columns(&[(119, 300, 0, 300.0, None)]), elements).is_err());
        assert!(NuclideTable::from_columns(columns(&[(1, 1, 2, 1.0, None)]), elements).is_err());
    }

    #[test]
    fn test_rejects_mismatched_columns() {
        let elements = NuclideDb::new().element_table();
        let mut cols = columns(&[(1, 1, 0, 1.0078, Some(1.0))]);
        cols.half_life.clear();
        let err = NuclideTable::from_columns(cols, elements).unwrap_err();
        assert!(matches!(err, NuclidesError::Schema(ref m) if m.contains("half_life")));
    }

    #[test]
    fn test_key_display_and_order() {
        assert_eq!(NuclideKey::new(1, 2).to_string(), "1-2");
        assert_eq!(NuclideKey::metastable(73, 180).to_string(), "73-180m");
        assert!(NuclideKey::new(73, 180) < NuclideKey::metastable(73, 180));
        assert!(NuclideKey::metastable(73, 180) < NuclideKey::new(73, 181));
    }
}
