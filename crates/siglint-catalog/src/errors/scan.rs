//! Literal error strings from compiler sources.

use std::{collections::HashSet, fs, path::Path};

use log::{debug, warn};
use walkdir::WalkDir;

use siglint_core::error_catalog::RawError;

use crate::CatalogWarning;

#[derive(Debug, Default)]
pub(super) struct Scan {
    pub raw_errors: Vec<RawError>,
    pub warnings: Vec<CatalogWarning>,
}

/// Collect every distinct string literal containing `marker` from files
/// under `dir` with one of `extensions`, in file-name order.
pub(super) fn scan_directory(dir: &Path, extensions: &[String], marker: &str) -> Scan {
    let mut scan = Scan::default();
    let mut seen = HashSet::new();

    for entry in WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
    {
        let path = entry.path();
        let wanted = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| extensions.iter().any(|wanted| wanted == ext));
        if !path.is_file() || !wanted {
            continue;
        }
        let file = path
            .strip_prefix(dir)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/");

        let content = match fs::read(path) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(err) => {
                warn!(file = file.as_str(), err:% = err; "Skipping unreadable compiler source");
                scan.warnings
                    .push(CatalogWarning::new(file, None, format!("unreadable: {err}")));
                continue;
            }
        };

        let before = scan.raw_errors.len();
        for (index, line) in content.lines().enumerate() {
            for literal in string_literals(line) {
                if literal.contains(marker) && seen.insert(literal.clone()) {
                    scan.raw_errors
                        .push(RawError::new(literal, format!("{file}:{}", index + 1)));
                }
            }
        }
        debug!(file = file.as_str(), found = scan.raw_errors.len() - before; "Compiler source scanned");
    }
    scan
}

/// The trimmed contents of each double-quoted literal on `line`.
fn string_literals(line: &str) -> Vec<String> {
    let mut literals = Vec::new();
    let mut chars = line.chars();
    while let Some(c) = chars.next() {
        match c {
            '\'' => {
                // Character literal: skip `'"'` and `'\''`.
                let mut escaped = false;
                for next in chars.by_ref() {
                    match next {
                        '\\' if !escaped => escaped = true,
                        '\'' if !escaped => break,
                        _ => escaped = false,
                    }
                }
            }
            '"' => {
                let mut literal = String::new();
                let mut escaped = false;
                let mut closed = false;
                for next in chars.by_ref() {
                    if escaped {
                        literal.push(match next {
                            'n' | 't' => ' ',
                            other => other,
                        });
                        escaped = false;
                    } else if next == '\\' {
                        escaped = true;
                    } else if next == '"' {
                        closed = true;
                        break;
                    } else {
                        literal.push(next);
                    }
                }
                if !closed {
                    break;
                }
                let trimmed = literal.trim();
                if !trimmed.is_empty() {
                    literals.push(trimmed.to_string());
                }
            }
            '/' if chars.as_str().starts_with('/') => break,
            _ => {}
        }
    }
    literals
}
