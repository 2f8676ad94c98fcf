use std::path::{Path, PathBuf};

use crate::error::StorageError;

use super::Volume;

/// Read and parse the mount table (normally `/proc/mounts`).
pub fn scan(path: &Path) -> Result<Vec<Volume>, StorageError> {
    let table = std::fs::read_to_string(path).map_err(|source| StorageError::MountTable {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse(&table))
}

fn parse(table: &str) -> Vec<Volume> {
    table.lines().filter_map(parse_row).collect()
}

/// One `fstab(5)`-style row: `device mountpoint fstype options freq passno`.
/// Malformed rows are skipped.
fn parse_row(line: &str) -> Option<Volume> {
    let mut fields = line.split_whitespace();
    let device = fields.next()?.to_string();
    let mount_point = unescape(fields.next()?);
    fields.next()?; // fstype must be present for a well-formed row
    Some(Volume {
        device,
        mount_root: Some(PathBuf::from(mount_point)),
    })
}

/// Decode the octal escapes the kernel uses for whitespace in mount points
/// (`\040` space, `\011` tab, `\012` newline, `\134` backslash).
fn unescape(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut chars = field.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let digits: String = chars.clone().take(3).collect();
        if digits.len() == 3 {
            if let Ok(code) = u8::from_str_radix(&digits, 8) {
                out.push(code as char);
                for _ in 0..3 {
                    chars.next();
                }
                continue;
            }
        }
        out.push(c);
    }
    out
}
