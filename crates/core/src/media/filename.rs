// crates/core/src/media/filename.rs
//! Output file naming derived from entry titles.

use std::collections::HashSet;

/// Turn a display title into a single path component.
///
/// Path separators, NUL and other control characters become `_`. Leading
/// dots and surrounding whitespace are trimmed. Returns `None` when nothing
/// usable is left.
pub fn output_stem(title: &str) -> Option<String> {
    let replaced: String = title
        .chars()
        .map(|c| match c {
            '/' | '\\' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let trimmed = replaced.trim().trim_start_matches('.').trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Reserve `stem` in `used`, suffixing ` (2)`, ` (3)`, ... until it is free.
///
/// Matching ignores case so names stay distinct on case-folding filesystems.
pub fn claim_stem(stem: &str, used: &mut HashSet<String>) -> String {
    let mut candidate = stem.to_string();
    let mut n = 1;
    while !used.insert(candidate.to_lowercase()) {
        n += 1;
        candidate = format!("{stem} ({n})");
    }
    candidate
}
