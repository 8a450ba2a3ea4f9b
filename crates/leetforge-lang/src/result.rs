//! Files produced for one question in one language

use std::path::{Path, PathBuf};

use bitflags::bitflags;

use crate::error::{LangError, Result};

bitflags! {
    /// Role of a generated file; one file may carry several roles
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FileType: u8 {
        const CODE_FILE = 1 << 0;
        const TEST_FILE = 1 << 1;
        const TEST_CASES_FILE = 1 << 2;
        const DOC_FILE = 1 << 3;
    }
}

/// One generated file, relative to the question directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutput {
    pub filename: String,
    pub content: String,
    pub file_type: FileType,
}

impl FileOutput {
    pub fn new(filename: impl Into<String>, content: impl Into<String>, file_type: FileType) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
            file_type,
        }
    }

    /// Entry without content, as produced by path previews
    pub fn placeholder(filename: impl Into<String>, file_type: FileType) -> Self {
        Self::new(filename, String::new(), file_type)
    }
}

/// Ordered set of files for one question/language pair.
///
/// Built by a single generation call and handed to the caller for
/// persisting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateResult {
    /// Question directory, relative to `out_dir`
    pub sub_dir: String,
    /// Language output directory
    pub out_dir: PathBuf,
    pub question_slug: String,
    pub lang: String,
    files: Vec<FileOutput>,
}

impl GenerateResult {
    pub fn new(
        lang: impl Into<String>,
        question_slug: impl Into<String>,
        out_dir: impl Into<PathBuf>,
        sub_dir: impl Into<String>,
    ) -> Self {
        Self {
            sub_dir: sub_dir.into(),
            out_dir: out_dir.into(),
            question_slug: question_slug.into(),
            lang: lang.into(),
            files: Vec::new(),
        }
    }

    /// Append a file; filenames are unique within a result
    pub fn add_file(&mut self, file: FileOutput) -> Result<()> {
        if self.files.iter().any(|f| f.filename == file.filename) {
            return Err(LangError::DuplicateFile(file.filename));
        }
        self.files.push(file);
        Ok(())
    }

    pub fn files(&self) -> &[FileOutput] {
        &self.files
    }

    /// Move the result under another language output directory
    pub fn set_out_dir(&mut self, out_dir: impl Into<PathBuf>) {
        self.out_dir = out_dir.into();
    }

    /// Directory holding this question's files
    pub fn target_dir(&self) -> PathBuf {
        self.out_dir.join(&self.sub_dir)
    }

    /// Absolute path of a file in the result
    pub fn path_of(&self, file: &FileOutput) -> PathBuf {
        self.target_dir().join(&file.filename)
    }

    /// First file carrying every bit of `file_type`
    pub fn file_of(&self, file_type: FileType) -> Option<&FileOutput> {
        self.files.iter().find(|f| f.file_type.contains(file_type))
    }

    /// Path of the first file carrying `file_type`
    pub fn path_for(&self, file_type: FileType) -> Option<PathBuf> {
        self.file_of(file_type).map(|f| self.path_of(f))
    }

    /// `sub_dir` joined with a filename, as seen from `out_dir`
    pub fn relative(&self, filename: &str) -> PathBuf {
        Path::new(&self.sub_dir).join(filename)
    }
}
