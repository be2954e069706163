use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result, bail};
use nuclides_data::{ElementColumns, NuclideColumns};

use crate::parsers::HalfLives;

/// Nuclides observed in nature only in an excited state.
///
/// Ta-180 is observationally stable as Ta-180m; its ground state decays
/// with an 8 h half-life.
const NATURAL_METASTABLE: &[(u8, u16)] = &[(73, 180)];

#[derive(Debug, Default)]
pub struct NistRecord {
    pub atomic_number: u8,
    pub symbol: String,
    pub mass_number: u16,
    pub relative_atomic_mass: f64,
    pub isotopic_composition: Option<f64>,
}

#[derive(Default)]
struct PartialRecord {
    atomic_number: Option<u8>,
    symbol: Option<String>,
    mass_number: Option<u16>,
    relative_atomic_mass: Option<f64>,
    isotopic_composition: Option<f64>,
}

/// Parse the NIST "Atomic Weights and Isotopic Compositions" linearized
/// ASCII listing.
///
/// Each record is a block of `Label = value` lines starting at
/// `Atomic Number`. Uncertainties in parentheses and the `#` marker of
/// estimated values are dropped.
pub fn parse_nist(path: &Path) -> Result<Vec<NistRecord>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    let mut partials: Vec<PartialRecord> = Vec::new();
    for (i, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((label, value)) = line.split_once('=') else {
            bail!("{}:{}: expected 'label = value'", path.display(), i + 1);
        };
        let label = label.trim().to_lowercase().replace(' ', "_");
        let value = strip_uncertainty(value.trim());

        if label == "atomic_number" {
            partials.push(PartialRecord::default());
        }
        let Some(current) = partials.last_mut() else {
            bail!("{}:{}: record does not start with 'Atomic Number'", path.display(), i + 1);
        };
        let ctx = || format!("{}:{}: invalid {label} '{value}'", path.display(), i + 1);
        match label.as_str() {
            "atomic_number" => current.atomic_number = Some(value.parse().with_context(ctx)?),
            "atomic_symbol" => current.symbol = Some(value.to_string()),
            "mass_number" => current.mass_number = Some(value.parse().with_context(ctx)?),
            "relative_atomic_mass" => {
                current.relative_atomic_mass = Some(value.parse().with_context(ctx)?)
            }
            "isotopic_composition" if !value.is_empty() => {
                current.isotopic_composition = Some(value.parse().with_context(ctx)?)
            }
            _ => {}
        }
    }

    partials
        .into_iter()
        .enumerate()
        .map(|(i, p)| -> Result<NistRecord> {
            let missing = |field: &str| format!("record {i} has no '{field}'");
            Ok(NistRecord {
                atomic_number: p.atomic_number.with_context(|| missing("Atomic Number"))?,
                symbol: p.symbol.with_context(|| missing("Atomic Symbol"))?,
                mass_number: p.mass_number.with_context(|| missing("Mass Number"))?,
                relative_atomic_mass: p
                    .relative_atomic_mass
                    .with_context(|| missing("Relative Atomic Mass"))?,
                isotopic_composition: p.isotopic_composition,
            })
        })
        .collect()
}

fn strip_uncertainty(value: &str) -> &str {
    let value = value.split('(').next().unwrap_or(value);
    value.trim_end_matches('#').trim()
}

/// Build the nuclide columns from NIST records, joined with half-lives.
///
/// Returns the columns and the number of half-life entries that matched no
/// nuclide.
pub fn build_nuclides(
    records: Vec<NistRecord>,
    elements: &ElementColumns,
    half_lives: &HalfLives,
) -> Result<(NuclideColumns, usize)> {
    let mut rows = BTreeMap::new();
    for record in records {
        let z = record.atomic_number;
        // Deuterium and tritium are listed under their own symbols.
        let symbol = match record.symbol.as_str() {
            "D" | "T" => "H",
            s => s,
        };
        let expected = elements
            .symbol
            .get(usize::from(z).wrapping_sub(1))
            .with_context(|| format!("nuclide {symbol}-{} has unknown Z={z}", record.mass_number))?;
        if expected != symbol {
            bail!(
                "symbol '{}' of nuclide Z={z} A={} disagrees with element symbol '{expected}'",
                record.symbol,
                record.mass_number
            );
        }

        let a = record.mass_number;
        let state = u8::from(NATURAL_METASTABLE.contains(&(z, a)));
        if rows.insert((z, a, state), record).is_some() {
            bail!("duplicate nuclide Z={z} A={a} state={state}");
        }
    }

    let mut columns = NuclideColumns::default();
    for (&(z, a, state), record) in &rows {
        columns.atomic_number.push(z);
        columns.mass_number.push(a);
        columns.state.push(state);
        columns.molar_mass.push(record.relative_atomic_mass);
        columns.isotopic_composition.push(record.isotopic_composition);
        columns.half_life.push(half_lives.get(&(z, a, state)).copied());
    }

    check_composition_sums(&columns)?;

    let unmatched = half_lives.keys().filter(|k| !rows.contains_key(*k)).count();
    Ok((columns, unmatched))
}

fn check_composition_sums(columns: &NuclideColumns) -> Result<()> {
    let mut sums: BTreeMap<u8, f64> = BTreeMap::new();
    for (&z, composition) in columns
        .atomic_number
        .iter()
        .zip(&columns.isotopic_composition)
    {
        if let Some(c) = composition.filter(|&c| c > 0.0) {
            *sums.entry(z).or_default() += c;
        }
    }
    for (z, sum) in sums {
        if (sum - 1.0).abs() > 1e-3 {
            bail!("isotopic compositions of Z={z} sum to {sum}, expected 1");
        }
    }
    Ok(())
}
