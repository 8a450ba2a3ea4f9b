//! Persists generated files
//!
//! Generation itself never touches the filesystem; callers hand the
//! [`GenerateResult`] to a [`FileWriter`] once generation succeeded.

use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::{debug, info};

use crate::{error::Result, result::GenerateResult};

/// What happened to one file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteAction {
    Created,
    Updated,
    /// Content on disk already matches
    Unchanged,
    /// Dry run: the file would have been created or updated
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileWriteResult {
    pub path: PathBuf,
    pub action: WriteAction,
}

/// Outcome of writing one result
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteReport {
    pub files: Vec<FileWriteResult>,
    pub dry_run: bool,
}

impl WriteReport {
    /// Files actually created or updated
    pub fn written(&self) -> usize {
        self.files
            .iter()
            .filter(|f| matches!(f.action, WriteAction::Created | WriteAction::Updated))
            .count()
    }
}

/// Writes generated files to disk
#[derive(Debug, Clone, Default)]
pub struct FileWriter {
    dry_run: bool,
}

impl FileWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Preview only, nothing is written
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Write every file of `result` under its target directory.
    ///
    /// Directories are created as needed; files whose content is unchanged
    /// are left alone.
    pub fn write(&self, result: &GenerateResult) -> Result<WriteReport> {
        let mut report = WriteReport {
            files: Vec::with_capacity(result.files().len()),
            dry_run: self.dry_run,
        };

        for file in result.files() {
            let path = result.path_of(file);
            let action = self.write_file(&path, &file.content)?;
            debug!(path = %path.display(), ?action, "file processed");
            report.files.push(FileWriteResult { path, action });
        }

        info!(
            question = %result.question_slug,
            lang = %result.lang,
            written = report.written(),
            dry_run = self.dry_run,
            "generated files persisted"
        );
        Ok(report)
    }

    fn write_file(&self, path: &Path, content: &str) -> Result<WriteAction> {
        let existing = match fs::read_to_string(path) {
            Ok(text) => Some(text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };
        if existing.as_deref() == Some(content) {
            return Ok(WriteAction::Unchanged);
        }
        if self.dry_run {
            return Ok(WriteAction::Skipped);
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(if existing.is_some() {
            WriteAction::Updated
        } else {
            WriteAction::Created
        })
    }
}
