use std::fmt;
use std::io::Read;
use std::sync::OnceLock;

use log::{debug, warn};
use nuclides_data::{NuclideDatabase, VersionRecord};

use crate::element::ElementTable;
use crate::error::{NuclidesError, Result};
use crate::nuclide::NuclideTable;

const COMPRESSED_DATA: &[u8] = include_bytes!("../data/nuclides.bin.zst");

/// Validated element and nuclide tables with their lookup indices.
///
/// Normally built once from the embedded data by [`NuclideDb::new`]; build one
/// yourself with [`Tables::from_compressed`] or [`Tables::from_database`] to
/// work against a different data set.
#[derive(Debug)]
pub struct Tables {
    version: Vec<VersionRecord>,
    elements: ElementTable,
    nuclides: NuclideTable,
}

impl Tables {
    /// Decompress and deserialize a blob in the format of the embedded data.
    pub fn from_compressed(bytes: &[u8]) -> Result<Self> {
        let mut decoder = ruzstd::decoding::StreamingDecoder::new(bytes)
            .map_err(|e| NuclidesError::Data(format!("failed to create zstd decoder: {e}")))?;
        let mut decompressed = Vec::new();
        decoder
            .read_to_end(&mut decompressed)
            .map_err(|e| NuclidesError::Data(format!("failed to decompress data: {e}")))?;

        let database: NuclideDatabase = postcard::from_bytes(&decompressed)
            .map_err(|e| NuclidesError::Data(format!("failed to deserialize data: {e}")))?;
        Self::from_database(database)
    }

    /// Validate a deserialized database and build the indices.
    pub fn from_database(database: NuclideDatabase) -> Result<Self> {
        let NuclideDatabase {
            version,
            elements,
            nuclides,
        } = database;
        let elements = ElementTable::from_columns(elements)?;
        let nuclides = NuclideTable::from_columns(nuclides, &elements)?;

        debug!(
            "built nuclide tables: {} elements, {} nuclides, data version {}",
            elements.len(),
            nuclides.len(),
            version.last().map_or("unknown", |v| v.tag.as_str())
        );

        Ok(Tables {
            version,
            elements,
            nuclides,
        })
    }

    /// Promote to `'static` so a [`NuclideDb`] can be built on top.
    pub fn leak(self) -> &'static Tables {
        Box::leak(Box::new(self))
    }

    pub fn elements(&self) -> &ElementTable {
        &self.elements
    }

    pub fn nuclides(&self) -> &NuclideTable {
        &self.nuclides
    }

    pub fn version(&self) -> &[VersionRecord] {
        &self.version
    }
}

static TABLES: OnceLock<Result<Tables>> = OnceLock::new();

fn embedded() -> Result<&'static Tables> {
    match TABLES.get_or_init(|| Tables::from_compressed(COMPRESSED_DATA)) {
        Ok(tables) => Ok(tables),
        Err(e) => {
            warn!("embedded nuclide data unavailable: {e}");
            Err(e.clone())
        }
    }
}

/// The main interface to the element and nuclide tables.
///
/// Cheap to create and copy. It holds a reference to statically-allocated
/// tables that are decompressed on first use.
#[derive(Clone, Copy)]
pub struct NuclideDb {
    tables: &'static Tables,
}

impl NuclideDb {
    /// Handle onto the embedded tables.
    ///
    /// # Panics
    ///
    /// Panics if the embedded data fails to load, which only happens when the
    /// crate was built against a corrupt data file. Use [`try_new`](Self::try_new)
    /// to handle that case.
    pub fn new() -> Self {
        match Self::try_new() {
            Ok(db) => db,
            Err(e) => panic!("embedded nuclide data failed to load: {e}"),
        }
    }

    /// Handle onto the embedded tables. A load failure is cached and returned
    /// again on every call.
    pub fn try_new() -> Result<Self> {
        Ok(NuclideDb { tables: embedded()? })
    }

    pub fn from_tables(tables: &'static Tables) -> Self {
        NuclideDb { tables }
    }

    pub fn tables(&self) -> &'static Tables {
        self.tables
    }

    pub fn element_table(&self) -> &'static ElementTable {
        &self.tables.elements
    }

    pub fn nuclide_table(&self) -> &'static NuclideTable {
        &self.tables.nuclides
    }

    /// Provenance records of the loaded data, oldest first.
    pub fn data_version(&self) -> &'static [VersionRecord] {
        &self.tables.version
    }
}

impl Default for NuclideDb {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for NuclideDb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NuclideDb")
            .field("elements", &self.tables.elements.len())
            .field("nuclides", &self.tables.nuclides.len())
            .finish()
    }
}

pub(crate) fn check_len(table: &str, column: &str, len: usize, expected: usize) -> Result<()> {
    if len == expected {
        Ok(())
    } else {
        Err(NuclidesError::Schema(format!(
            "{table} column '{column}' has {len} rows, expected {expected}"
        )))
    }
}
