// SPDX-License-Identifier: GPL-3.0-only
pub mod path_sanitizer;

pub use path_sanitizer::{escape_file_stem, validate_path_within_base_new};
