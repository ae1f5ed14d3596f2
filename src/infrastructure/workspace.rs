//! Workspace Staging
//!
//! Copies the project into `<basename>_<unix seconds>` inside a base
//! directory (the invocation's working directory for the CLI). The original
//! project is only ever read.
//!
//! Two runs on the same project within the same second collide; the second
//! fails when creating its directory.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use walkdir::WalkDir;

use crate::common::error::{InjectError, Result};
use crate::ports::{Reporter, Workspace, WorkspaceStager};

pub struct FsWorkspaceStager {
    base_dir: PathBuf,
}

impl FsWorkspaceStager {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Stager rooted at the current working directory.
    pub fn in_current_dir() -> Result<Self> {
        let cwd = std::env::current_dir().map_err(|e| InjectError::fs(".", e))?;
        Ok(Self::new(cwd))
    }
}

impl WorkspaceStager for FsWorkspaceStager {
    fn stage(&self, project: &Path, reporter: &dyn Reporter) -> Result<Workspace> {
        // Before creating anything, make sure the project actually exists
        if !project.is_dir() {
            return Err(InjectError::ProjectNotFound(project.to_path_buf()));
        }
        let project = project
            .canonicalize()
            .map_err(|e| InjectError::fs(project, e))?;

        let name = workspace_name(&project, unix_timestamp());
        let root = self.base_dir.join(&name);
        reporter.debug(&format!("Creating temporary directory: {}", root.display()));
        fs::create_dir(&root).map_err(|e| InjectError::fs(&root, e))?;

        reporter.debug(&format!(
            "Copying sources to the temporary directory: {} --> {}",
            project.display(),
            root.display()
        ));
        copy_tree(&project, &root)?;

        Ok(Workspace { name, root })
    }
}

/// `<basename>_<timestamp>`; the filesystem root falls back to `project`.
pub fn workspace_name(project: &Path, timestamp: u64) -> String {
    let basename = project
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "project".to_string());
    format!("{}_{}", basename, timestamp)
}

fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// Recursively copy `src` into the existing directory `dst`, following
/// symlinks. `dst` is skipped if it lives inside `src`.
fn copy_tree(src: &Path, dst: &Path) -> Result<()> {
    let dst_canonical = dst.canonicalize().map_err(|e| InjectError::fs(dst, e))?;

    let walker = WalkDir::new(src)
        .min_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_entry(|entry| entry.path() != dst_canonical.as_path());

    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| src.to_path_buf());
            InjectError::fs(path, e.into())
        })?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .unwrap_or_else(|_| entry.path());
        let target = dst.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|e| InjectError::fs(&target, e))?;
        } else {
            fs::copy(entry.path(), &target).map_err(|e| InjectError::fs(entry.path(), e))?;
        }
    }
    Ok(())
}
