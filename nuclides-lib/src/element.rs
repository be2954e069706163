use std::collections::HashMap;
use std::fmt;

use nuclides_data::ElementColumns;

use crate::constants::MAX_ATOMIC_NUMBER;
use crate::db::{NuclideDb, check_len};
use crate::error::{NuclidesError, Result};
use crate::property::{ElementProperty, PropertyValue};

/// Identifies an element either by atomic number or by chemical symbol.
///
/// Every lookup that takes an element accepts `impl Into<ElementRef>`, so
/// both `db.atomic_mass(26)` and `db.atomic_mass("Fe")` work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementRef<'a> {
    Z(u8),
    Symbol(&'a str),
}

impl From<u8> for ElementRef<'_> {
    fn from(z: u8) -> Self {
        ElementRef::Z(z)
    }
}

impl<'a> From<&'a str> for ElementRef<'a> {
    fn from(symbol: &'a str) -> Self {
        ElementRef::Symbol(symbol)
    }
}

impl<'a> From<&'a String> for ElementRef<'a> {
    fn from(symbol: &'a String) -> Self {
        ElementRef::Symbol(symbol.as_str())
    }
}

impl fmt::Display for ElementRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementRef::Z(z) => write!(f, "Z={z}"),
            ElementRef::Symbol(s) => f.write_str(s),
        }
    }
}

/// The element table: one row per atomic number, rows ordered by Z.
#[derive(Debug)]
pub struct ElementTable {
    columns: ElementColumns,
    symbol_to_z: HashMap<String, u8>,
}

impl ElementTable {
    /// Validates the columns and builds the symbol index.
    ///
    /// Requires exactly one row for each Z in 1..=118, in order, with unique
    /// symbols of one to three ASCII letters and positive atomic masses.
    pub fn from_columns(columns: ElementColumns) -> Result<Self> {
        let n = columns.len();
        let expected = usize::from(MAX_ATOMIC_NUMBER);
        if n != expected {
            return Err(NuclidesError::Schema(format!(
                "element table has {n} rows, expected {expected}"
            )));
        }
        check_len("elements", "symbol", columns.symbol.len(), n)?;
        check_len("elements", "name", columns.name.len(), n)?;
        check_len("elements", "atomic_mass", columns.atomic_mass.len(), n)?;
        check_len("elements", "period", columns.period.len(), n)?;
        check_len("elements", "group", columns.group.len(), n)?;
        check_len("elements", "group_block", columns.group_block.len(), n)?;
        check_len("elements", "standard_state", columns.standard_state.len(), n)?;
        check_len("elements", "electronegativity", columns.electronegativity.len(), n)?;
        check_len("elements", "ionization_energy", columns.ionization_energy.len(), n)?;
        check_len("elements", "density", columns.density.len(), n)?;

        let mut symbol_to_z = HashMap::with_capacity(n);
        for (row, &z) in columns.atomic_number.iter().enumerate() {
            if usize::from(z) != row + 1 {
                return Err(NuclidesError::Schema(format!(
                    "element row {row} has Z={z}, expected {}",
                    row + 1
                )));
            }
            let symbol = &columns.symbol[row];
            if !is_valid_symbol(symbol) {
                return Err(NuclidesError::Schema(format!(
                    "malformed symbol {symbol:?} for Z={z}"
                )));
            }
            if let Some(previous) = symbol_to_z.insert(symbol.clone(), z) {
                return Err(NuclidesError::Schema(format!(
                    "symbol {symbol} used by both Z={previous} and Z={z}"
                )));
            }
            let mass = columns.atomic_mass[row];
            if !(mass.is_finite() && mass > 0.0) {
                return Err(NuclidesError::Schema(format!(
                    "atomic mass {mass} of {symbol} is not positive"
                )));
            }
        }

        Ok(ElementTable {
            columns,
            symbol_to_z,
        })
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Raw column storage.
    pub fn columns(&self) -> &ElementColumns {
        &self.columns
    }

    /// Resolve a reference to Z, checking that the element exists.
    pub fn resolve(&self, element: ElementRef<'_>) -> Result<u8> {
        match element {
            ElementRef::Z(z) => {
                if z == 0 || usize::from(z) > self.len() {
                    Err(NuclidesError::OutOfRange(u32::from(z)))
                } else {
                    Ok(z)
                }
            }
            ElementRef::Symbol(symbol) => self
                .symbol_to_z
                .get(symbol)
                .copied()
                .ok_or_else(|| NuclidesError::UnknownElement(symbol.to_string())),
        }
    }

    pub fn get(&self, element: ElementRef<'_>) -> Result<Element<'_>> {
        let z = self.resolve(element)?;
        Ok(self.element_of(z))
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = Element<'_>> + '_ {
        (0..self.len()).map(move |row| Element { table: self, row })
    }

    /// Row for a Z already known to be in the table.
    pub(crate) fn element_of(&self, z: u8) -> Element<'_> {
        Element {
            table: self,
            row: usize::from(z) - 1,
        }
    }

    pub(crate) fn symbol_of(&self, z: u8) -> &str {
        &self.columns.symbol[usize::from(z) - 1]
    }
}

fn is_valid_symbol(symbol: &str) -> bool {
    let bytes = symbol.as_bytes();
    (1..=3).contains(&bytes.len())
        && bytes[0].is_ascii_uppercase()
        && bytes[1..].iter().all(u8::is_ascii_lowercase)
}

/// A row of the element table.
#[derive(Clone, Copy)]
pub struct Element<'a> {
    table: &'a ElementTable,
    row: usize,
}

impl<'a> Element<'a> {
    pub fn z(&self) -> u8 {
        self.table.columns.atomic_number[self.row]
    }

    pub fn symbol(&self) -> &'a str {
        &self.table.columns.symbol[self.row]
    }

    pub fn name(&self) -> &'a str {
        &self.table.columns.name[self.row]
    }

    /// Standard atomic weight, a.u.
    pub fn atomic_mass(&self) -> f64 {
        self.table.columns.atomic_mass[self.row]
    }

    pub fn period(&self) -> u8 {
        self.table.columns.period[self.row]
    }

    pub fn group(&self) -> Option<u8> {
        self.table.columns.group[self.row]
    }

    pub fn group_block(&self) -> &'a str {
        &self.table.columns.group_block[self.row]
    }

    pub fn standard_state(&self) -> Option<&'a str> {
        self.table.columns.standard_state[self.row].as_deref()
    }

    pub fn electronegativity(&self) -> Option<f64> {
        self.table.columns.electronegativity[self.row]
    }

    /// First ionization energy, eV.
    pub fn ionization_energy(&self) -> Option<f64> {
        self.table.columns.ionization_energy[self.row]
    }

    /// g/cm³
    pub fn density(&self) -> Option<f64> {
        self.table.columns.density[self.row]
    }

    /// Read one column of this row. `None` means the value is absent from the data.
    pub fn property(&self, property: ElementProperty) -> Option<PropertyValue<'a>> {
        use ElementProperty as P;
        match property {
            P::AtomicNumber => Some(PropertyValue::Integer(u32::from(self.z()))),
            P::Symbol => Some(PropertyValue::Text(self.symbol())),
            P::Name => Some(PropertyValue::Text(self.name())),
            P::AtomicMass => Some(PropertyValue::Float(self.atomic_mass())),
            P::Period => Some(PropertyValue::Integer(u32::from(self.period()))),
            P::Group => self.group().map(|g| PropertyValue::Integer(u32::from(g))),
            P::GroupBlock => Some(PropertyValue::Text(self.group_block())),
            P::StandardState => self.standard_state().map(PropertyValue::Text),
            P::Electronegativity => self.electronegativity().map(PropertyValue::Float),
            P::IonizationEnergy => self.ionization_energy().map(PropertyValue::Float),
            P::Density => self.density().map(PropertyValue::Float),
        }
    }
}

impl fmt::Debug for Element<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("z", &self.z())
            .field("symbol", &self.symbol())
            .field("atomic_mass", &self.atomic_mass())
            .finish()
    }
}

impl PartialEq for Element<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.table, other.table) && self.row == other.row
    }
}

impl NuclideDb {
    /// Atomic number for a chemical symbol.
    pub fn atomic_number(&self, symbol: &str) -> Result<u8> {
        self.element_table().resolve(ElementRef::Symbol(symbol))
    }

    /// Chemical symbol for an atomic number.
    pub fn symbol(&self, z: u8) -> Result<&'static str> {
        let elements = self.element_table();
        elements.resolve(ElementRef::Z(z))?;
        Ok(elements.symbol_of(z))
    }

    pub fn element<'r>(&self, element: impl Into<ElementRef<'r>>) -> Result<Element<'static>> {
        self.element_table().get(element.into())
    }

    /// All elements, ascending by Z.
    pub fn elements(&self) -> impl ExactSizeIterator<Item = Element<'static>> + use<> {
        self.element_table().iter()
    }

    /// Standard atomic weight of the element, a.u.
    pub fn atomic_mass<'r>(&self, element: impl Into<ElementRef<'r>>) -> Result<f64> {
        Ok(self.element(element)?.atomic_mass())
    }

    pub fn name<'r>(&self, element: impl Into<ElementRef<'r>>) -> Result<&'static str> {
        Ok(self.element(element)?.name())
    }

    pub fn element_property<'r>(
        &self,
        element: impl Into<ElementRef<'r>>,
        property: ElementProperty,
    ) -> Result<Option<PropertyValue<'static>>> {
        Ok(self.element(element)?.property(property))
    }

    /// Like [`element_property`](Self::element_property), with the column given by name.
    pub fn element_property_by_name<'r>(
        &self,
        element: impl Into<ElementRef<'r>>,
        property: &str,
    ) -> Result<Option<PropertyValue<'static>>> {
        let property: ElementProperty = property.parse()?;
        self.element_property(element, property)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn columns(symbols: &[&str]) -> ElementColumns {
        let n = symbols.len();
        ElementColumns {
            atomic_number: (1..=n as u8).collect(),
            symbol: symbols.iter().map(|s| s.to_string()).collect(),
            name: symbols.iter().map(|s| s.to_lowercase()).collect(),
            atomic_mass: (1..=n).map(|z| z as f64 * 2.0).collect(),
            period: vec![1; n],
            group: vec![None; n],
            group_block: vec![String::new(); n],
            standard_state: vec![None; n],
            electronegativity: vec![None; n],
            ionization_energy: vec![None; n],
            density: vec![None; n],
        }
    }

    fn synthetic_symbols() -> Vec<String> {
        (0..MAX_ATOMIC_NUMBER)
            .map(|i| {
                let first = char::from(b'A' + i / 26);
                let second = char::from(b'a' + i % 26);
                format!("{first}{second}")
            })
            .collect()
    }

    #[test]
    fn test_accepts_full_table() {
        let symbols = synthetic_symbols();
        let refs: Vec<&str> = symbols.iter().map(String::as_str).collect();
        let table = ElementTable::from_columns(columns(&refs)).unwrap();
        assert_eq!(table.len(), 118);
        assert_eq!(table.resolve(ElementRef::Symbol("Ab")).unwrap(), 2);
        assert_eq!(table.resolve(ElementRef::Z(0)).unwrap_err().kind(), ErrorKind::OutOfRange);
        assert_eq!(table.resolve(ElementRef::Z(119)).unwrap_err().kind(), ErrorKind::OutOfRange);
    }

    #[test]
    fn test_rejects_short_table() {
        let err = ElementTable::from_columns(columns(&["H", "He"])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Schema);
    }

    #[test]
    fn test_rejects_duplicate_symbol() {
        let mut symbols = synthetic_symbols();
        symbols[5] = symbols[4].clone();
        let refs: Vec<&str> = symbols.iter().map(String::as_str).collect();
        let err = ElementTable::from_columns(columns(&refs)).unwrap_err();
        assert!(matches!(err, NuclidesError::Schema(ref m) if m.contains("used by both")));
    }

    #[test]
    fn test_rejects_gap_in_atomic_numbers() {
        let symbols = synthetic_symbols();
        let refs: Vec<&str> = symbols.iter().map(String::as_str).collect();
        let mut cols = columns(&refs);
        cols.atomic_number[10] = 12;
        assert_eq!(
            ElementTable::from_columns(cols).unwrap_err().kind(),
            ErrorKind::Schema
        );
    }

    #[test]
    fn test_rejects_mismatched_column() {
        let symbols = synthetic_symbols();
        let refs: Vec<&str> = symbols.iter().map(String::as_str).collect();
        let mut cols = columns(&refs);
        cols.density.pop();
        let err = ElementTable::from_columns(cols).unwrap_err();
        assert!(matches!(err, NuclidesError::Schema(ref m) if m.contains("density")));
    }

    #[test]
    fn test_symbol_shape() {
        assert!(is_valid_symbol("H"));
        assert!(is_valid_symbol("Uue"));
        assert!(!is_valid_symbol(""));
        assert!(!is_valid_symbol("he"));
        assert!(!is_valid_symbol("HE"));
        assert!(!is_valid_symbol("Abcd"));
    }
}
