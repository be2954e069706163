use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use nuclides_data::{ElementColumns, VersionRecord};

/// Half-lives in seconds keyed by (atomic number, mass number, state).
pub type HalfLives = HashMap<(u8, u16, u8), f64>;

const ELEMENT_COLUMNS: &[&str] = &[
    "atomic_number",
    "symbol",
    "name",
    "atomic_mass",
    "period",
    "group",
    "group_block",
    "standard_state",
    "electronegativity",
    "ionization_energy",
    "density",
];

const HALF_LIFE_COLUMNS: &[&str] = &["z", "a", "m", "half_life", "unit"];

const SECONDS_PER_YEAR: f64 = 31_557_600.0;

pub fn parse_version(path: &Path) -> Result<Vec<VersionRecord>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let mut records = Vec::new();
    for line in content.lines() {
        if line.starts_with('#') || line.trim().len() < 3 {
            continue;
        }
        let parts: Vec<&str> = line.splitn(3, "//").collect();
        if parts.len() == 3 {
            records.push(VersionRecord {
                tag: parts[0].trim().to_string(),
                date: parts[1].trim().to_string(),
                notes: parts[2].trim().to_string(),
            });
        }
    }
    Ok(records)
}

/// Parse the periodic table CSV into element columns, ascending by Z.
pub fn parse_elements(path: &Path) -> Result<ElementColumns> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let table = CsvTable::parse(&content, ELEMENT_COLUMNS)
        .with_context(|| format!("malformed {}", path.display()))?;

    let mut columns = ElementColumns::default();
    for (line_no, row) in table.rows() {
        let ctx = || format!("{}:{line_no}", path.display());
        columns
            .atomic_number
            .push(required(row.get("atomic_number")).with_context(ctx)?);
        columns.symbol.push(row.get("symbol").to_string());
        columns.name.push(row.get("name").to_string());
        columns
            .atomic_mass
            .push(required(row.get("atomic_mass")).with_context(ctx)?);
        columns
            .period
            .push(required(row.get("period")).with_context(ctx)?);
        columns
            .group
            .push(optional(row.get("group")).with_context(ctx)?);
        columns.group_block.push(row.get("group_block").to_string());
        columns
            .standard_state
            .push(Some(row.get("standard_state")).filter(|s| !s.is_empty()).map(str::to_string));
        columns
            .electronegativity
            .push(optional(row.get("electronegativity")).with_context(ctx)?);
        columns
            .ionization_energy
            .push(optional(row.get("ionization_energy")).with_context(ctx)?);
        columns
            .density
            .push(optional(row.get("density")).with_context(ctx)?);
    }

    for (i, &z) in columns.atomic_number.iter().enumerate() {
        if usize::from(z) != i + 1 {
            bail!("elements must be listed by ascending atomic number: row {i} has Z={z}");
        }
    }
    Ok(columns)
}

/// Parse the half-life CSV. An `M` in column `m` marks a metastable state.
pub fn parse_half_lives(path: &Path) -> Result<HalfLives> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let table = CsvTable::parse(&content, HALF_LIFE_COLUMNS)
        .with_context(|| format!("malformed {}", path.display()))?;

    let mut half_lives = HashMap::new();
    for (line_no, row) in table.rows() {
        let ctx = || format!("{}:{line_no}", path.display());
        let z: u8 = required(row.get("z")).with_context(ctx)?;
        let a: u16 = required(row.get("a")).with_context(ctx)?;
        let state = u8::from(row.get("m") == "M");
        let value: f64 = required(row.get("half_life")).with_context(ctx)?;
        let seconds = value * unit_seconds(row.get("unit")).with_context(ctx)?;
        if half_lives.insert((z, a, state), seconds).is_some() {
            bail!("duplicate half-life for Z={z} A={a} state={state}");
        }
    }
    Ok(half_lives)
}

fn unit_seconds(unit: &str) -> Result<f64> {
    Ok(match unit {
        "s" => 1.0,
        "m" => 60.0,
        "h" => 3_600.0,
        "d" => 86_400.0,
        "y" => SECONDS_PER_YEAR,
        other => bail!("unknown half-life unit '{other}'"),
    })
}

fn required<T>(value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .parse()
        .with_context(|| format!("invalid value '{value}'"))
}

fn optional<T>(value: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    if value.is_empty() {
        Ok(None)
    } else {
        required(value).map(Some)
    }
}

/// Minimal reader for the comma-separated sources, which never quote fields.
struct CsvTable<'a> {
    header: HashMap<&'a str, usize>,
    lines: Vec<(usize, Vec<&'a str>)>,
}

struct CsvRow<'t, 'a> {
    header: &'t HashMap<&'a str, usize>,
    cells: &'t [&'a str],
}

impl<'a> CsvTable<'a> {
    fn parse(content: &'a str, required_columns: &[&str]) -> Result<Self> {
        let mut lines = content
            .lines()
            .enumerate()
            .filter(|(_, l)| !l.trim().is_empty() && !l.starts_with('#'));

        let Some((_, header_line)) = lines.next() else {
            bail!("missing header line");
        };
        let header: HashMap<&str, usize> = header_line
            .split(',')
            .map(str::trim)
            .enumerate()
            .map(|(i, name)| (name, i))
            .collect();
        for column in required_columns {
            if !header.contains_key(column) {
                bail!("missing column '{column}'");
            }
        }

        let mut rows = Vec::new();
        for (i, line) in lines {
            let cells: Vec<&str> = line.split(',').map(str::trim).collect();
            if cells.len() != header.len() {
                bail!(
                    "line {} has {} fields, expected {}",
                    i + 1,
                    cells.len(),
                    header.len()
                );
            }
            rows.push((i + 1, cells));
        }
        Ok(CsvTable {
            header,
            lines: rows,
        })
    }

    fn rows(&self) -> impl Iterator<Item = (usize, CsvRow<'_, 'a>)> {
        self.lines.iter().map(|(line_no, cells)| {
            (
                *line_no,
                CsvRow {
                    header: &self.header,
                    cells,
                },
            )
        })
    }
}

impl<'a> CsvRow<'_, 'a> {
    // Column presence is checked when the header is parsed.
    fn get(&self, column: &str) -> &'a str {
        self.header
            .get(column)
            .and_then(|&i| self.cells.get(i).copied())
            .unwrap_or("")
    }
}
