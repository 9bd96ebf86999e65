//! Snapshot file format and writing.
//!
//! Layout: 4-byte magic `LHSN`, little-endian `u32` format version, then the
//! `bincode` encoding of the [`CatalogGraph`]. The graph is built from
//! ordered collections, so equal graphs always encode to equal bytes.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::Path;

use crate::error::{HarvesterError, Result};
use crate::types::CatalogGraph;

/// File magic: License Harvester SNapshot.
pub const SNAPSHOT_MAGIC: &[u8; 4] = b"LHSN";

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

const HEADER_LEN: usize = 8;

/// Fail if `path` already exists.
///
/// Runs before any network activity so an existing snapshot is never
/// clobbered and no requests are wasted.
pub fn ensure_destination_free(path: &Path) -> Result<()> {
    // symlink_metadata also catches dangling symlinks
    match fs::symlink_metadata(path) {
        Ok(_) => Err(HarvesterError::DestinationExists(path.to_path_buf())),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(HarvesterError::Io(e)),
    }
}

/// Encode a catalog graph into snapshot bytes.
pub fn encode_snapshot(catalog: &CatalogGraph) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    write_encoded(&mut bytes, catalog)?;
    Ok(bytes)
}

/// Decode snapshot bytes produced by [`encode_snapshot`].
pub fn decode_snapshot(bytes: &[u8]) -> Result<CatalogGraph> {
    if bytes.len() < HEADER_LEN || &bytes[0..4] != SNAPSHOT_MAGIC {
        return Err(HarvesterError::InvalidSnapshot(
            "missing snapshot header".to_string(),
        ));
    }
    let mut version = [0u8; 4];
    version.copy_from_slice(&bytes[4..HEADER_LEN]);
    let version = u32::from_le_bytes(version);
    if version != SNAPSHOT_VERSION {
        return Err(HarvesterError::InvalidSnapshot(format!(
            "unsupported format version {version}"
        )));
    }
    Ok(bincode::deserialize(&bytes[HEADER_LEN..])?)
}

/// Write a catalog graph to a new file at `path`.
///
/// The file is created exclusively: if it appeared since
/// [`ensure_destination_free`] ran, this fails with `DestinationExists`.
/// On any failure after creation the partial file is removed.
pub fn write_snapshot(catalog: &CatalogGraph, path: &Path) -> Result<()> {
    let file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            return Err(HarvesterError::DestinationExists(path.to_path_buf()));
        }
        Err(e) => return Err(HarvesterError::Io(e)),
    };

    if let Err(e) = write_to_file(file, catalog) {
        if let Err(cleanup) = fs::remove_file(path) {
            tracing::warn!(path = %path.display(), error = %cleanup, "Failed to remove partial snapshot");
        }
        return Err(e);
    }

    tracing::info!(path = %path.display(), facts = catalog.graph().len(), "Snapshot written");
    Ok(())
}

/// Read and decode a snapshot file.
pub fn read_snapshot(path: &Path) -> Result<CatalogGraph> {
    let bytes = fs::read(path)?;
    decode_snapshot(&bytes)
}

fn write_to_file(file: File, catalog: &CatalogGraph) -> Result<()> {
    let mut writer = BufWriter::new(file);
    write_encoded(&mut writer, catalog)?;
    let file = writer.into_inner().map_err(|e| HarvesterError::Io(e.into_error()))?;
    file.sync_all()?;
    Ok(())
}

fn write_encoded<W: Write>(mut writer: W, catalog: &CatalogGraph) -> Result<()> {
    writer.write_all(SNAPSHOT_MAGIC)?;
    writer.write_all(&SNAPSHOT_VERSION.to_le_bytes())?;
    bincode::serialize_into(&mut writer, catalog)?;
    writer.flush()?;
    Ok(())
}
