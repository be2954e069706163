//! Conversions between mass and atom fractions, and expansion of natural
//! elements into their isotopes.

use std::collections::BTreeMap;
use std::iter::FusedIterator;
use std::ops::Range;

use crate::chemparser::parse_formula;
use crate::constants::NATURAL_MASS_NUMBER;
use crate::db::NuclideDb;
use crate::element::ElementRef;
use crate::error::{NuclidesError, Result};

/// One component of a material composition.
///
/// `a == 0` stands for the element with its natural isotopic mix. Whether
/// `fraction` is by mass or by atoms is up to the caller.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompositionEntry {
    pub z: u8,
    pub a: u16,
    pub fraction: f64,
}

impl CompositionEntry {
    pub fn new(z: u8, a: u16, fraction: f64) -> Self {
        CompositionEntry { z, a, fraction }
    }

    /// Entry for the natural isotopic mix of element `z`.
    pub fn natural(z: u8, fraction: f64) -> Self {
        CompositionEntry {
            z,
            a: NATURAL_MASS_NUMBER,
            fraction,
        }
    }

    pub fn is_natural(&self) -> bool {
        self.a == NATURAL_MASS_NUMBER
    }
}

impl From<(u8, u16, f64)> for CompositionEntry {
    fn from((z, a, fraction): (u8, u16, f64)) -> Self {
        CompositionEntry { z, a, fraction }
    }
}

/// Scale fractions so they sum to 1.
pub fn normalize_fractions(entries: &mut [CompositionEntry]) -> Result<()> {
    let total: f64 = entries.iter().map(|e| e.fraction).sum();
    if !(total.is_finite() && total > 0.0) {
        return Err(NuclidesError::InvalidComposition(format!(
            "fractions sum to {total}"
        )));
    }
    for entry in entries {
        entry.fraction /= total;
    }
    Ok(())
}

impl NuclideDb {
    /// Masses of every entry's nuclide, failing on the first that does not resolve.
    fn nuclide_masses(&self, entries: &[CompositionEntry]) -> Result<Vec<f64>> {
        entries
            .iter()
            .map(|e| {
                if !(e.fraction.is_finite() && e.fraction >= 0.0) {
                    return Err(NuclidesError::InvalidComposition(format!(
                        "fraction {} of {}-{} is negative or not finite",
                        e.fraction, e.z, e.a
                    )));
                }
                self.nuclide_mass(e.z, e.a)
            })
            .collect()
    }

    /// Turn mass fractions into atom fractions by dividing each by its nuclide
    /// mass. The result is not normalized.
    ///
    /// Every entry must name a concrete nuclide; natural entries should be
    /// expanded first. On error the entries are left unchanged.
    pub fn convert_to_atomic_fraction(&self, entries: &mut [CompositionEntry]) -> Result<()> {
        let masses = self.nuclide_masses(entries)?;
        for (entry, mass) in entries.iter_mut().zip(masses) {
            entry.fraction /= mass;
        }
        Ok(())
    }

    /// Inverse of [`convert_to_atomic_fraction`](Self::convert_to_atomic_fraction).
    pub fn convert_to_mass_fraction(&self, entries: &mut [CompositionEntry]) -> Result<()> {
        let masses = self.nuclide_masses(entries)?;
        for (entry, mass) in entries.iter_mut().zip(masses) {
            entry.fraction *= mass;
        }
        Ok(())
    }

    /// Lazily replace each natural entry with its naturally occurring isotopes.
    ///
    /// ```
    /// use nuclides::{CompositionEntry, NuclideDb};
    ///
    /// let db = NuclideDb::new();
    /// let expanded: Vec<CompositionEntry> = db
    ///     .expand_natural_presence([CompositionEntry::natural(1, 2.0)])
    ///     .collect::<Result<_, _>>()
    ///     .unwrap();
    /// assert_eq!(expanded[0], CompositionEntry::new(1, 1, 2.0 * 0.999885));
    /// assert_eq!(expanded[1], CompositionEntry::new(1, 2, 2.0 * 0.000115));
    /// ```
    pub fn expand_natural_presence<I>(&self, entries: I) -> NaturalPresence<I::IntoIter>
    where
        I: IntoIterator<Item = CompositionEntry>,
    {
        NaturalPresence {
            db: *self,
            inner: entries.into_iter(),
            pending: None,
            failed: false,
        }
    }

    /// Rows of the natural isotopes of `z`, or an error if it has none.
    fn natural_rows(&self, z: u8) -> Result<Range<usize>> {
        let element = self.element(z)?;
        let table = self.nuclide_table();
        let rows = table.element_rows(z);
        if rows.clone().any(|row| table.natural_abundance(row).is_some()) {
            Ok(rows)
        } else {
            Err(NuclidesError::NoNaturalIsotopes(element.symbol().to_string()))
        }
    }

    /// Atom fractions of a chemical formula, normalized to 1 and sorted by (Z, A).
    ///
    /// Elements become natural entries; `D` and `T` become H-2 and H-3.
    pub fn from_molecular_formula(&self, formula: &str) -> Result<Vec<CompositionEntry>> {
        let mut counts: BTreeMap<(u8, u16), f64> = BTreeMap::new();
        for (symbol, count) in parse_formula(formula)? {
            let key = match symbol.as_str() {
                "D" => (1, 2),
                "T" => (1, 3),
                other => {
                    let z = self.atomic_number(other).map_err(|_| {
                        NuclidesError::InvalidFormula(format!(
                            "'{other}' is not an element symbol"
                        ))
                    })?;
                    (z, NATURAL_MASS_NUMBER)
                }
            };
            *counts.entry(key).or_insert(0.0) += count;
        }

        let mut entries: Vec<CompositionEntry> = counts
            .into_iter()
            .map(|((z, a), count)| CompositionEntry::new(z, a, count))
            .collect();
        normalize_fractions(&mut entries)?;
        Ok(entries)
    }

    /// Mean atomic mass of a composition given in atom fractions, a.u.
    ///
    /// Natural entries use the standard atomic weight, others the nuclide mass.
    pub fn mean_atomic_mass(&self, entries: &[CompositionEntry]) -> Result<f64> {
        let mut total = 0.0;
        let mut weighted = 0.0;
        for entry in entries {
            let mass = if entry.is_natural() {
                self.atomic_mass(ElementRef::Z(entry.z))?
            } else {
                self.nuclide_mass(entry.z, entry.a)?
            };
            total += entry.fraction;
            weighted += entry.fraction * mass;
        }
        if !(total.is_finite() && total > 0.0) {
            return Err(NuclidesError::InvalidComposition(format!(
                "fractions sum to {total}"
            )));
        }
        Ok(weighted / total)
    }
}

/// Iterator returned by [`NuclideDb::expand_natural_presence`].
///
/// Concrete entries pass through unchanged. A natural entry is replaced by
/// one entry per naturally occurring isotope, ascending by A, with the
/// fraction scaled by the isotope's abundance. An element that cannot be
/// expanded yields one error, after which the iterator is exhausted.
#[derive(Debug, Clone)]
pub struct NaturalPresence<I> {
    db: NuclideDb,
    inner: I,
    pending: Option<(Range<usize>, f64)>,
    failed: bool,
}

impl<I> Iterator for NaturalPresence<I>
where
    I: Iterator<Item = CompositionEntry>,
{
    type Item = Result<CompositionEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let table = self.db.nuclide_table();
        loop {
            if let Some((rows, fraction)) = &mut self.pending {
                for row in rows.by_ref() {
                    if let Some(abundance) = table.natural_abundance(row) {
                        let key = table.keys()[row];
                        return Some(Ok(CompositionEntry::new(
                            key.z,
                            key.a,
                            *fraction * abundance,
                        )));
                    }
                }
                self.pending = None;
            }

            let entry = self.inner.next()?;
            if !entry.is_natural() {
                return Some(Ok(entry));
            }
            match self.db.natural_rows(entry.z) {
                Ok(rows) => self.pending = Some((rows, entry.fraction)),
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

impl<I> FusedIterator for NaturalPresence<I> where I: FusedIterator<Item = CompositionEntry> {}
