//! Copies of original files taken before the first overwrite.
//!
//! The backup directory mirrors project-relative paths, so restoring is a
//! plain copy back.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use walkdir::WalkDir;

use crate::utils::to_slash;

pub struct Backup {
    root_dir: PathBuf,
    backup_dir: PathBuf,
}

impl Backup {
    /// `backup_dir` is relative to `root_dir` unless absolute.
    pub fn new(root_dir: &Path, backup_dir: &str) -> Self {
        Self {
            root_dir: root_dir.to_path_buf(),
            backup_dir: root_dir.join(backup_dir),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.backup_dir
    }

    /// Copies `relative` into the backup directory.
    ///
    /// An existing copy is kept, so the backup always holds the file as it
    /// was before the first run that touched it. Returns whether a copy was
    /// made.
    pub fn save(&self, relative: &str) -> Result<bool> {
        let target = self.backup_dir.join(relative);
        if target.exists() {
            return Ok(false);
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create backup directory {:?}", parent))?;
        }
        fs::copy(self.root_dir.join(relative), &target)
            .with_context(|| format!("Failed to back up {}", relative))?;
        Ok(true)
    }

    /// Copies every backed-up file back over its original and removes the
    /// backup directory. Returns the restored paths in sorted order.
    pub fn restore_all(&self) -> Result<Vec<String>> {
        if !self.backup_dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut restored = Vec::new();
        for entry in WalkDir::new(&self.backup_dir).sort_by_file_name() {
            let entry = entry.with_context(|| {
                format!("Failed to read backup directory {:?}", self.backup_dir)
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry
                .path()
                .strip_prefix(&self.backup_dir)
                .with_context(|| format!("Unexpected backup entry {:?}", entry.path()))?;
            let target = self.root_dir.join(relative);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory {:?}", parent))?;
            }
            fs::copy(entry.path(), &target)
                .with_context(|| format!("Failed to restore {:?}", target))?;
            restored.push(to_slash(relative));
        }

        fs::remove_dir_all(&self.backup_dir)
            .with_context(|| format!("Failed to remove {:?}", self.backup_dir))?;
        restored.sort();
        Ok(restored)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_save_then_restore() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("lib/widgets")).unwrap();
        let file = dir.path().join("lib/widgets/button.dart");
        fs::write(&file, "original").unwrap();

        let backup = Backup::new(dir.path(), ".l10nify_backup");
        assert!(backup.save("lib/widgets/button.dart").unwrap());
        fs::write(&file, "rewritten").unwrap();

        let restored = backup.restore_all().unwrap();

        assert_eq!(restored, vec!["lib/widgets/button.dart"]);
        assert_eq!(fs::read_to_string(&file).unwrap(), "original");
        assert!(!backup.dir().exists());
    }

    #[test]
    fn test_existing_backup_is_kept() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("lib")).unwrap();
        let file = dir.path().join("lib/main.dart");
        fs::write(&file, "first").unwrap();

        let backup = Backup::new(dir.path(), ".l10nify_backup");
        assert!(backup.save("lib/main.dart").unwrap());
        fs::write(&file, "second").unwrap();
        assert!(!backup.save("lib/main.dart").unwrap());

        assert_eq!(
            fs::read_to_string(backup.dir().join("lib/main.dart")).unwrap(),
            "first"
        );
    }

    #[test]
    fn test_restore_without_backup_is_empty() {
        let dir = tempdir().unwrap();
        let backup = Backup::new(dir.path(), ".l10nify_backup");
        assert!(backup.restore_all().unwrap().is_empty());
    }
}
