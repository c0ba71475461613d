//! Component G: the append-only, content-addressable trace journal.
//!
//! One JSON object per line. Appends are serialized behind a single mutex
//! so the journal never interleaves partial writes from concurrent
//! post-hooks — single-writer discipline, the same guarantee a rollout
//! writer gives its recorder.

use std::fs::OpenOptions;
use std::io::BufRead;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use governor_protocol::RelatedKind;
use governor_protocol::TraceRecord;
use tracing::warn;

pub struct TraceStore {
    path: PathBuf,
    write_lock: parking_lot::Mutex<()>,
}

impl TraceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: parking_lot::Mutex::new(()),
        }
    }

    /// Append one record as a single JSON line. Failures are logged and
    /// swallowed — tracing must never block or fail the tool call it
    /// records.
    pub fn append(&self, record: &TraceRecord) {
        let _guard = self.write_lock.lock();
        if let Err(err) = self.append_inner(record) {
            warn!(error = %err, "failed to append trace record");
        }
    }

    fn append_inner(&self, record: &TraceRecord) -> std::io::Result<()> {
        let line = serde_json::to_string(record)?;
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        writeln!(file, "{line}")?;
        file.flush()
    }

    pub fn by_intent(&self, intent_id: &str) -> Vec<TraceRecord> {
        self.scan(|record| {
            record.files.iter().any(|file| {
                file.conversations.iter().any(|conv| {
                    conv.related
                        .iter()
                        .any(|r| r.kind == RelatedKind::Specification && r.value == intent_id)
                })
            })
        })
    }

    /// Suffix match, to tolerate absolute-vs-relative path differences
    /// between the journal and the caller.
    pub fn by_file(&self, path: &str) -> Vec<TraceRecord> {
        self.scan(|record| {
            record
                .files
                .iter()
                .any(|file| file.relative_path.ends_with(path))
        })
    }

    pub fn by_content_hash(&self, hash: &str) -> Vec<(TraceRecord, String)> {
        let mut results = Vec::new();
        for record in self.scan(|_| true) {
            for file in &record.files {
                for conv in &file.conversations {
                    if conv.ranges.iter().any(|r| r.content_hash == hash) {
                        results.push((record.clone(), file.relative_path.clone()));
                        break;
                    }
                }
            }
        }
        results
    }

    fn scan(&self, predicate: impl Fn(&TraceRecord) -> bool) -> Vec<TraceRecord> {
        let Ok(file) = std::fs::File::open(&self.path) else {
            return Vec::new();
        };
        std::io::BufReader::new(file)
            .lines()
            .map_while(Result::ok)
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| match serde_json::from_str::<TraceRecord>(&line) {
                Ok(record) => Some(record),
                Err(err) => {
                    warn!(error = %err, "skipping malformed trace journal line");
                    None
                }
            })
            .filter(|record| predicate(record))
            .collect()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
