//! Component L: a human-readable, append-only post-mortem log.
//!
//! Entries are plain markdown; readers locate them by splitting on the
//! header prefix (`## `) rather than parsing structured markup, so the
//! format here must stay exactly what [`crate::session`] post-hooks expect.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use tracing::warn;

pub const HEADER_PREFIX: &str = "## ";

#[derive(Debug, Clone)]
pub struct LessonEntry {
    pub timestamp: String,
    pub entry_type: String,
    pub intent_id: Option<String>,
    pub tool: String,
    pub message: String,
    pub details: Option<String>,
    pub resolution: Option<String>,
    pub tags: Vec<String>,
}

pub struct LessonLog {
    path: PathBuf,
    write_lock: parking_lot::Mutex<()>,
}

impl LessonLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: parking_lot::Mutex::new(()),
        }
    }

    pub fn append(&self, entry: &LessonEntry) {
        let _guard = self.write_lock.lock();
        if let Err(err) = self.append_inner(entry) {
            warn!(error = %err, "failed to append lesson log entry");
        }
    }

    fn append_inner(&self, entry: &LessonEntry) -> std::io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        write!(file, "{}", render(entry))?;
        file.flush()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn render(entry: &LessonEntry) -> String {
    let mut out = String::new();
    out.push_str(HEADER_PREFIX);
    out.push_str(&entry.timestamp);
    out.push(' ');
    out.push_str(&entry.entry_type);
    out.push('\n');
    out.push_str(&format!(
        "- **Intent:** {}\n",
        entry.intent_id.as_deref().unwrap_or("none")
    ));
    out.push_str(&format!("- **Tool:** {}\n", entry.tool));
    out.push_str(&format!("- **Type:** {}\n", entry.entry_type));
    out.push_str(&format!("- **Message:** {}\n", entry.message));
    if let Some(details) = &entry.details {
        out.push_str("- **Details:**\n```\n");
        out.push_str(details);
        out.push_str("\n```\n");
    }
    if let Some(resolution) = &entry.resolution {
        out.push_str(&format!("- **Resolution:** {resolution}\n"));
    }
    out.push_str(&format!("- **Tags:** {}\n", entry.tags.join(", ")));
    out.push_str("---\n");
    out
}
