//! Copy resource for one regular file of a tracked entry.
use std::path::PathBuf;

use super::helpers::fs::{copy_file, ensure_parent_dir, files_identical, kind_of};
use super::{Resource, ResourceChange, ResourceState};
use crate::error::SyncError;

/// A regular file that should be copied from `from` to `to`.
///
/// Directories are mirrored by the synchronizer as one `FileCopyResource` per
/// contained file.
#[derive(Debug, Clone)]
pub struct FileCopyResource {
    /// File providing the content.
    pub from: PathBuf,
    /// File receiving the content.
    pub to: PathBuf,
}

impl FileCopyResource {
    /// Copy resource from `from` to `to`.
    #[must_use]
    pub const fn new(from: PathBuf, to: PathBuf) -> Self {
        Self { from, to }
    }
}

impl Resource for FileCopyResource {
    fn description(&self) -> String {
        format!("{} -> {}", self.from.display(), self.to.display())
    }

    fn current_state(&self) -> Result<ResourceState, SyncError> {
        if !self.from.is_file() {
            return Ok(ResourceState::Invalid(SyncError::MissingSource {
                path: self.from.clone(),
            }));
        }
        if !self.to.exists() {
            return Ok(ResourceState::Missing);
        }
        if !self.to.is_file() {
            return Ok(ResourceState::Invalid(SyncError::TypeMismatch {
                path: self.to.clone(),
                expected: "file",
                found: kind_of(&self.to),
            }));
        }
        if files_identical(&self.from, &self.to)? {
            Ok(ResourceState::Correct)
        } else {
            Ok(ResourceState::Differs {
                detail: "content differs".to_string(),
            })
        }
    }

    fn apply(&self) -> Result<ResourceChange, SyncError> {
        if self.to.is_file() && files_identical(&self.from, &self.to)? {
            return Ok(ResourceChange::AlreadyCorrect);
        }
        ensure_parent_dir(&self.to)?;
        copy_file(&self.from, &self.to)?;
        Ok(ResourceChange::Applied)
    }
}
