//! `VcsProbe`: an outbound port for revision metadata. Failures degrade
//! gracefully to `{revision_id: "unknown"}` rather than blocking a trace
//! record on git being present or well-formed.

use std::path::Path;
use std::path::PathBuf;
use std::process::Command;

use governor_protocol::VcsSnapshot;

pub trait VcsProbe: Send + Sync {
    fn revision(&self) -> VcsSnapshot;
}

pub struct GitVcsProbe {
    repo_root: PathBuf,
}

impl GitVcsProbe {
    pub fn new(repo_root: impl Into<PathBuf>) -> Self {
        Self {
            repo_root: repo_root.into(),
        }
    }

    fn run(&self, args: &[&str]) -> Option<String> {
        let output = Command::new("git").current_dir(&self.repo_root).args(args).output().ok()?;
        if !output.status.success() {
            return None;
        }
        let text = String::from_utf8(output.stdout).ok()?;
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

impl VcsProbe for GitVcsProbe {
    fn revision(&self) -> VcsSnapshot {
        let Some(revision_id) = self.run(&["rev-parse", "HEAD"]) else {
            return VcsSnapshot::unknown();
        };
        let branch = self.run(&["rev-parse", "--abbrev-ref", "HEAD"]);
        let dirty = self
            .run(&["status", "--porcelain"])
            .map(|s| !s.is_empty());
        VcsSnapshot {
            revision_id,
            branch,
            dirty,
        }
    }
}

/// Always reports unknown; useful for tests and for hosts with no VCS.
pub struct UnknownVcsProbe;

impl VcsProbe for UnknownVcsProbe {
    fn revision(&self) -> VcsSnapshot {
        VcsSnapshot::unknown()
    }
}

pub fn is_git_repo(path: &Path) -> bool {
    path.join(".git").exists()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_probe_reports_unknown_revision() {
        let snapshot = UnknownVcsProbe.revision();
        assert_eq!(snapshot.revision_id, "unknown");
        assert!(snapshot.branch.is_none());
    }

    #[test]
    fn non_repo_directory_degrades_to_unknown() {
        let dir = tempfile::tempdir().expect("tempdir");
        let probe = GitVcsProbe::new(dir.path());
        let snapshot = probe.revision();
        assert_eq!(snapshot.revision_id, "unknown");
    }

    #[test]
    fn is_git_repo_checks_for_dot_git_dir() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(!is_git_repo(dir.path()));
        std::fs::create_dir(dir.path().join(".git")).expect("mkdir");
        assert!(is_git_repo(dir.path()));
    }
}
