//! Paths and knobs the middleware reads at bootstrap.
//!
//! Mirrors the shape of a typical agent-host config: a home directory that
//! can be overridden by an environment variable, with everything else
//! resolved relative to it unless the caller supplies an absolute override.

use std::path::Path;
use std::path::PathBuf;

use dirs::home_dir;

const HOME_ENV_VAR: &str = "GOVERNOR_HOME";
const INTENTS_FILE: &str = "intents.yaml";
const IGNORE_FILE: &str = "governorignore";
const TRACE_JOURNAL_FILE: &str = "trace.jsonl";
const LESSON_LOG_FILE: &str = "lessons.md";
const INTENT_MAP_FILE: &str = "intent-map.md";

/// Returns the governor home directory, honoring `GOVERNOR_HOME` when set
/// (primarily so tests can sandbox themselves under a tempdir) and falling
/// back to `~/.governor` otherwise.
pub fn governor_home() -> std::io::Result<PathBuf> {
    if let Ok(val) = std::env::var(HOME_ENV_VAR) {
        if !val.is_empty() {
            return Ok(PathBuf::from(val));
        }
    }

    let mut p = home_dir().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "could not determine home directory",
        )
    })?;
    p.push(".governor");
    Ok(p)
}

/// Resolved set of paths the middleware's stores read from and write to.
#[derive(Debug, Clone)]
pub struct Paths {
    pub project_root: PathBuf,
    pub intents_file: PathBuf,
    pub ignore_file: PathBuf,
    pub trace_journal: PathBuf,
    pub lesson_log: PathBuf,
    pub intent_map: PathBuf,
}

impl Paths {
    /// Lay out the well-known files under `home`, scoped to `project_root`
    /// (the directory all relative write paths are resolved against).
    pub fn new(home: &Path, project_root: PathBuf) -> Self {
        Self {
            project_root,
            intents_file: home.join(INTENTS_FILE),
            ignore_file: home.join(IGNORE_FILE),
            trace_journal: home.join(TRACE_JOURNAL_FILE),
            lesson_log: home.join(LESSON_LOG_FILE),
            intent_map: home.join(INTENT_MAP_FILE),
        }
    }

    /// Convenience constructor that resolves `governor_home()` and uses the
    /// process's current working directory as the project root.
    pub fn discover() -> std::io::Result<Self> {
        let home = governor_home()?;
        let cwd = std::env::current_dir()?;
        Ok(Self::new(&home, cwd))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn respects_home_env_override() {
        // SAFETY: tests run single-threaded within this process for env vars
        // touched only by this test module.
        unsafe {
            std::env::set_var(HOME_ENV_VAR, "/tmp/governor-test-home");
        }
        let home = governor_home().expect("home resolves");
        assert_eq!(home, PathBuf::from("/tmp/governor-test-home"));
        unsafe {
            std::env::remove_var(HOME_ENV_VAR);
        }
    }

    #[test]
    fn lays_out_well_known_files_under_home() {
        let paths = Paths::new(Path::new("/tmp/home"), PathBuf::from("/tmp/project"));
        assert_eq!(paths.intents_file, PathBuf::from("/tmp/home/intents.yaml"));
        assert_eq!(paths.trace_journal, PathBuf::from("/tmp/home/trace.jsonl"));
    }
}
