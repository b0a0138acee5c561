// SPDX-License-Identifier: GPL-3.0-only
use std::path::{Component, Path};
use anyhow::Result;

/// Turn an arbitrary maze id into a file stem
///
/// ASCII alphanumerics, `-` and `_` are kept as they are. Every other byte
/// of the UTF-8 encoding becomes `%XX`, so distinct ids always map to
/// distinct stems and no stem can contain a path separator or start a
/// `..` component.
pub fn escape_file_stem(id: &str) -> String {
    let mut stem = String::with_capacity(id.len());

    for byte in id.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
            stem.push(byte as char);
        } else {
            stem.push_str(&format!("%{:02X}", byte));
        }
    }

    stem
}

/// Validate that a path would stay within a base directory when created
///
/// Works for paths that don't exist yet: `path` must be relative to
/// `base` and consist of plain components only.
pub fn validate_path_within_base_new(path: &Path, base: &Path) -> Result<()> {
    for component in path.components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            _ => {
                return Err(anyhow::anyhow!(
                    "Path {} would escape base directory {}",
                    path.display(),
                    base.display()
                ));
            }
        }
    }

    Ok(())
}
