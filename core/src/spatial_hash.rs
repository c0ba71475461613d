//! Component D: content-addressed fingerprints, independent of where a
//! region of code currently lives.
//!
//! `normalize` + `hash` give every trace range a stable identity;
//! `find_by_hash` lets an auditor ask "where did this code end up?" by
//! brute-force sliding-window search, the way one would grep for a moved
//! function without AST tooling.

use std::path::Path;
use std::path::PathBuf;

use sha2::Digest;
use sha2::Sha256;

const SKIP_DIR_NAMES: &[&str] = &["node_modules"];

const SOURCE_SUFFIXES: &[&str] = &[
    ".rs", ".ts", ".tsx", ".js", ".jsx", ".py", ".go", ".java", ".c", ".h", ".cpp", ".hpp",
    ".rb", ".php", ".cs", ".swift", ".kt", ".scala", ".md",
];

const WINDOW_SIZES: &[usize] = &[5, 10, 15, 20, 25, 30, 35, 40, 45, 50];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashMatch {
    pub path: PathBuf,
    pub start_line: usize,
    pub end_line: usize,
    pub content: String,
}

/// Split on LF, strip trailing horizontal whitespace from each line, rejoin
/// with LF, then outer-trim. Idempotent: `normalize(normalize(x)) ==
/// normalize(x)`.
pub fn normalize(text: &str) -> String {
    text.split('\n')
        .map(|line| line.trim_end_matches([' ', '\t']))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// SHA-256 of `normalize(text)`, hex-encoded.
pub fn hash(text: &str) -> String {
    let normalized = normalize(text);
    let digest = Sha256::digest(normalized.as_bytes());
    hex_encode(&digest)
}

/// Hash only the inclusive 1-indexed line range `[start, end]` of `path`'s
/// contents.
pub fn hash_block(path: impl AsRef<Path>, start: usize, end: usize) -> std::io::Result<String> {
    let contents = std::fs::read_to_string(path)?;
    let lines: Vec<&str> = contents.lines().collect();
    let block = slice_block(&lines, start, end);
    Ok(hash(&block))
}

fn slice_block(lines: &[&str], start: usize, end: usize) -> String {
    if start == 0 || start > end || start > lines.len() {
        return String::new();
    }
    let end = end.min(lines.len());
    lines[start - 1..end].join("\n")
}

/// Sliding-window search for `target` across `search_roots`. Deliberately
/// O(files * window sizes * lines): this is for auditor queries, not a
/// hot path inside the pipeline.
pub fn find_by_hash(target: &str, search_roots: &[PathBuf]) -> Vec<HashMatch> {
    let mut matches = Vec::new();
    for root in search_roots {
        walk(root, &mut matches, target);
    }
    matches
}

fn walk(dir: &Path, matches: &mut Vec<HashMatch>, target: &str) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with('.') {
            continue;
        }
        if path.is_dir() {
            if SKIP_DIR_NAMES.contains(&name.as_ref()) {
                continue;
            }
            walk(&path, matches, target);
            continue;
        }
        if !has_source_suffix(&name) {
            continue;
        }
        search_file(&path, target, matches);
    }
}

fn has_source_suffix(name: &str) -> bool {
    SOURCE_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
}

fn search_file(path: &Path, target: &str, matches: &mut Vec<HashMatch>) {
    let Ok(contents) = std::fs::read_to_string(path) else {
        return;
    };
    let lines: Vec<&str> = contents.lines().collect();
    for &window in WINDOW_SIZES {
        if window > lines.len() {
            break;
        }
        for start in 0..=(lines.len() - window) {
            let end = start + window;
            let block = lines[start..end].join("\n");
            if hash(&block) == target {
                matches.push(HashMatch {
                    path: path.to_path_buf(),
                    start_line: start + 1,
                    end_line: end,
                    content: block,
                });
                // Advance to the next window size once a match is found at
                // this size, per the spec's search order.
                break;
            }
        }
    }
}

fn hex_encode(bytes: &[u8]) -> String {
    use std::fmt::Write;
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        let _ = write!(out, "{byte:02x}");
    }
    out
}
