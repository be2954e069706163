mod nist;
mod parsers;

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail, ensure};
use nuclides_data::NuclideDatabase;

fn main() -> Result<()> {
    let repo_root = Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .context("generator crate has no parent directory")?;

    let data_dir = std::env::var_os("NUCLIDES_DATA_SOURCES")
        .map(PathBuf::from)
        .unwrap_or_else(|| repo_root.join("data_sources"));
    let out_path = std::env::var_os("NUCLIDES_OUTPUT")
        .map(PathBuf::from)
        .unwrap_or_else(|| repo_root.join("nuclides-lib").join("data").join("nuclides.bin.zst"));

    if !data_dir.exists() {
        bail!(
            "data_sources directory not found at {:?} (set NUCLIDES_DATA_SOURCES to override)",
            data_dir
        );
    }

    println!("Parsing raw data files from {:?}...", data_dir);

    let version = parsers::parse_version(&data_dir.join("Version.dat"))?;
    println!("  Version: {} entries", version.len());

    let elements = parsers::parse_elements(&data_dir.join("elements.csv"))?;
    println!("  Elements: {} entries", elements.len());

    let half_lives = parsers::parse_half_lives(&data_dir.join("half_lives.csv"))?;
    println!("  Half-lives: {} entries", half_lives.len());

    let records =
        nist::parse_nist(&data_dir.join("nist_atomic_weights_and_element_compositions.txt"))?;
    println!("  NIST records: {} entries", records.len());

    let (nuclides, unmatched) = nist::build_nuclides(records, &elements, &half_lives)?;
    let natural = nuclides
        .isotopic_composition
        .iter()
        .filter(|c| c.is_some_and(|c| c > 0.0))
        .count();
    println!(
        "  Nuclides: {} entries, {} naturally occurring, {} half-lives without a nuclide",
        nuclides.len(),
        natural,
        unmatched
    );

    let db = NuclideDatabase {
        version,
        elements,
        nuclides,
    };

    println!("\nSerializing with postcard...");
    let serialized = postcard::to_allocvec(&db).context("postcard serialization failed")?;
    println!("  Serialized size: {} bytes", serialized.len());

    println!("Compressing with zstd (level 19)...");
    let compressed = zstd::encode_all(&serialized[..], 19).context("zstd compression failed")?;
    println!("  Compressed size: {} bytes", compressed.len());
    println!(
        "  Compression ratio: {:.1}x",
        serialized.len() as f64 / compressed.len() as f64
    );

    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let mut f = std::fs::File::create(&out_path)
        .with_context(|| format!("failed to create {}", out_path.display()))?;
    f.write_all(&compressed)
        .context("failed to write compressed data")?;

    println!("\nWrote {:?}", out_path);

    println!("Verifying round-trip deserialization...");
    let decompressed = zstd::decode_all(&compressed[..]).context("zstd decompression failed")?;
    ensure!(
        decompressed == serialized,
        "round-trip produced {} bytes, expected {}",
        decompressed.len(),
        serialized.len()
    );
    let db2: NuclideDatabase =
        postcard::from_bytes(&decompressed).context("postcard deserialization failed")?;
    ensure!(
        db2.nuclides.len() == db.nuclides.len(),
        "round-trip lost nuclide rows"
    );
    println!("  Round-trip OK!");
    Ok(())
}
