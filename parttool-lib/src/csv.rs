//! Partition table CSV import and export.
//!
//! The format is the one used by ESP-IDF style partition tables:
//!
//! ```text
//! # Name,   Type, SubType,  Offset,   Size,  Flags
//! nvs, data, nvs, 0x9000, 0x6000
//! factory, app, factory, 0x10000, 0x100000
//! ```
//!
//! Comment lines start with `#`. Offset may be empty, in which case the
//! partition is placed automatically by the layout pass.

use crate::partition::Partition;
use crate::utils::Utils;
use crate::{Error, Result};
use std::io::Write;
use std::path::Path;

pub const CSV_HEADER: &str = "# Name,   Type, SubType,  Offset,   Size,  Flags";

const MIN_COLUMNS: usize = 5;
const MAX_COLUMNS: usize = 6;

/// Parse a partition table from CSV text.
pub fn parse_csv(content: &str) -> Result<Vec<Partition>> {
    let mut partitions = Vec::new();

    for (index, raw) in content.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let cells: Vec<&str> = line.split(',').map(str::trim).collect();
        if cells.len() < MIN_COLUMNS {
            tracing::warn!(
                "skipping line {}: expected at least {} columns, found {}",
                line_no,
                MIN_COLUMNS,
                cells.len()
            );
            continue;
        }
        if cells.len() > MAX_COLUMNS {
            tracing::warn!(
                "line {}: ignoring {} extra column(s)",
                line_no,
                cells.len() - MAX_COLUMNS
            );
        }

        let offset = if cells[3].is_empty() {
            None
        } else {
            Some(
                Utils::parse_number(cells[3])
                    .map_err(|e| Error::csv(line_no, format!("bad offset '{}': {}", cells[3], e)))?,
            )
        };
        let size = if cells[4].is_empty() {
            0
        } else {
            Utils::parse_number(cells[4])
                .map_err(|e| Error::csv(line_no, format!("bad size '{}': {}", cells[4], e)))?
        };

        partitions.push(Partition {
            name: cells[0].to_string(),
            kind: cells[1].to_string(),
            subtype: cells[2].to_string(),
            offset,
            size,
            flags: cells.get(5).map(|s| s.to_string()).unwrap_or_default(),
        });
    }

    tracing::debug!("parsed {} partition(s)", partitions.len());
    Ok(partitions)
}

/// Serialize a partition table to CSV text, header included.
///
/// Fails if a text column would not survive re-import (embedded commas or
/// line breaks, or a name starting with `#`).
pub fn to_csv(partitions: &[Partition]) -> Result<String> {
    let mut out = String::new();
    out.push_str(CSV_HEADER);
    out.push('\n');

    for p in partitions {
        check_cell(&p.name, "name")?;
        check_cell(&p.kind, "type")?;
        check_cell(&p.subtype, "subtype")?;
        check_cell(&p.flags, "flags")?;
        if p.name.starts_with('#') {
            return Err(Error::invalid_input(format!(
                "partition name '{}' would be read back as a comment",
                p.name
            )));
        }

        let offset = p.offset.map(|o| format!("{:#x}", o)).unwrap_or_default();
        let size = if p.size != 0 {
            format!("{:#x}", p.size)
        } else {
            String::new()
        };

        out.push_str(&format!(
            "{}, {}, {}, {}, {}",
            p.name, p.kind, p.subtype, offset, size
        ));
        if !p.flags.is_empty() {
            out.push_str(&format!(", {}", p.flags));
        }
        out.push('\n');
    }

    Ok(out)
}

fn check_cell(value: &str, column: &str) -> Result<()> {
    if value.contains([',', '\n', '\r']) {
        return Err(Error::invalid_input(format!(
            "{} '{}' contains a comma or line break",
            column,
            value.escape_debug()
        )));
    }
    Ok(())
}

pub fn read_csv_file<P: AsRef<Path>>(path: P) -> Result<Vec<Partition>> {
    let content = std::fs::read_to_string(path)?;
    parse_csv(&content)
}

/// Write a partition table to `path`.
///
/// The table is written to a temporary file next to the destination and
/// renamed over it, so an existing table is never left half-written.
pub fn write_csv_file<P: AsRef<Path>>(path: P, partitions: &[Partition]) -> Result<()> {
    let path = path.as_ref();
    let content = to_csv(partitions)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut builder = tempfile::Builder::new();
    builder.prefix(".parttool_").suffix(".csv");
    // New tables get the usual 0666 minus umask instead of tempfile's 0600.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }
    let mut temp = builder.tempfile_in(dir)?;
    if let Ok(existing) = std::fs::metadata(path) {
        temp.as_file().set_permissions(existing.permissions())?;
    }
    temp.write_all(content.as_bytes())?;
    temp.flush()?;
    temp.persist(path)?;

    tracing::info!("wrote {} partition(s) to {}", partitions.len(), path.display());
    Ok(())
}
