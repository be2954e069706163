//! Element and nuclide reference data: standard atomic weights, isotope
//! masses and natural abundances, plus conversions of material compositions
//! between mass and atom fractions.
//!
//! ```
//! use nuclides::NuclideDb;
//!
//! let db = NuclideDb::new();
//! assert_eq!(db.atomic_number("Fe").unwrap(), 26);
//! assert_eq!(db.symbol(79).unwrap(), "Au");
//! let h1 = db.nuclide_mass("H", 1).unwrap();
//! assert!((h1 - 1.00782503223).abs() < 1e-12);
//! ```

pub mod abundance;
pub mod chemparser;
pub mod constants;
pub mod db;
pub mod element;
pub mod error;
pub mod nuclide;
pub mod property;

pub use abundance::{CompositionEntry, NaturalPresence, normalize_fractions};
pub use db::{NuclideDb, Tables};
pub use element::{Element, ElementRef, ElementTable};
pub use error::{ErrorKind, NuclidesError, Result};
pub use nuclide::{NuclearState, Nuclide, NuclideKey, NuclideTable};
pub use property::{ElementProperty, NuclideProperty, PropertyValue};
pub use nuclides_data;
pub use nuclides_data::VersionRecord;
