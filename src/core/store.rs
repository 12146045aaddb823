//! Local JSON document store
//!
//! Documents live under a data directory:
//!
//! ```text
//! <data_dir>/syllabi/<doc_id>.json
//! <data_dir>/tasks/<uid>.json
//! <data_dir>/progress/<uid>.json
//! <data_dir>/testimonials.json
//! ```
//!
//! Missing documents read as absent. A permission-denied read is treated the
//! same way and only logged at debug level, since it is the normal state
//! before a user has access to a collection.

use crate::core::models::{AcademicProgress, Syllabus, SyllabusKey, Task, Testimonial, UserProfile};
use crate::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const SYLLABI_DIR: &str = "syllabi";
const TASKS_DIR: &str = "tasks";
const PROGRESS_DIR: &str = "progress";
const TESTIMONIALS_FILE: &str = "testimonials.json";

/// A set of documents written all-or-nothing
///
/// Every document is serialized when staged, so a serialization failure
/// happens before anything touches disk. On commit each document goes to a
/// temporary sibling file first. Existing targets are then moved aside to a
/// `.bak` sibling while the temporary files are renamed into place, and the
/// backups are deleted once every document has landed.
#[derive(Debug, Default)]
pub struct WriteBatch {
    entries: Vec<(PathBuf, String)>,
}

impl WriteBatch {
    /// Create an empty batch
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Stage a document
    ///
    /// # Errors
    /// Returns an error if the document cannot be serialized
    pub fn put<T: Serialize + ?Sized>(
        &mut self,
        path: impl Into<PathBuf>,
        doc: &T,
    ) -> Result<&mut Self, serde_json::Error> {
        let body = serde_json::to_string_pretty(doc)?;
        self.entries.push((path.into(), body));
        Ok(self)
    }

    /// Number of staged documents
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is staged
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write all staged documents
    ///
    /// # Errors
    /// Returns the first I/O error. Targets already replaced are restored
    /// from their backups, documents that did not exist before are removed,
    /// and no temporary files are left behind.
    pub fn commit(self) -> io::Result<()> {
        let mut staged: Vec<(PathBuf, PathBuf)> = Vec::with_capacity(self.entries.len());

        for (path, body) in &self.entries {
            let tmp = sibling(path, ".tmp");
            let written = path
                .parent()
                .map_or(Ok(()), fs::create_dir_all)
                .and_then(|()| fs::write(&tmp, body));
            if let Err(e) = written {
                let _ = fs::remove_file(&tmp);
                for (tmp, _) in &staged {
                    let _ = fs::remove_file(tmp);
                }
                return Err(e);
            }
            staged.push((tmp, path.clone()));
        }

        let mut installed: Vec<(&Path, Option<PathBuf>)> = Vec::with_capacity(staged.len());
        for (i, (tmp, path)) in staged.iter().enumerate() {
            match install(tmp, path) {
                Ok(backup) => installed.push((path.as_path(), backup)),
                Err(e) => {
                    roll_back(&installed);
                    for (tmp, _) in &staged[i..] {
                        let _ = fs::remove_file(tmp);
                    }
                    return Err(e);
                }
            }
        }

        for backup in installed.into_iter().filter_map(|(_, backup)| backup) {
            let _ = fs::remove_file(backup);
        }
        Ok(())
    }
}

/// Move `tmp` onto `path`, keeping any previous file as a backup
fn install(tmp: &Path, path: &Path) -> io::Result<Option<PathBuf>> {
    let backup = match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => {
            return Err(io::Error::other(format!(
                "{} is a directory",
                path.display()
            )));
        }
        Ok(_) => {
            let backup = sibling(path, ".bak");
            fs::rename(path, &backup)?;
            Some(backup)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => None,
        Err(e) => return Err(e),
    };

    if let Err(e) = fs::rename(tmp, path) {
        if let Some(backup) = &backup {
            let _ = fs::rename(backup, path);
        }
        return Err(e);
    }
    Ok(backup)
}

/// Undo installed documents, newest first
fn roll_back(installed: &[(&Path, Option<PathBuf>)]) {
    for (path, backup) in installed.iter().rev() {
        let restored = match backup {
            Some(backup) => fs::rename(backup, path),
            None => fs::remove_file(path),
        };
        if let Err(e) = restored {
            warn!("Failed to roll back {}: {e}", path.display());
        }
    }
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(suffix);
    path.with_file_name(name)
}

/// Check that an id can name a document file inside the store
///
/// Ids become file names, so path separators, `.`/`..`, NUL bytes, and
/// the empty string are refused.
///
/// # Errors
/// Returns an error describing why the id is unusable
pub fn check_document_id(id: &str) -> Result<(), String> {
    if id.is_empty() {
        return Err("Document id must not be empty".to_string());
    }
    if id == "." || id == ".." || id.contains(['/', '\\', '\0']) {
        return Err(format!("Invalid document id '{id}'"));
    }
    Ok(())
}

/// Document store rooted at a directory
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    /// Open a store rooted at `root`; directories are created on first write
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store root directory
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of a syllabus document
    #[must_use]
    pub fn syllabus_path(&self, doc_id: &str) -> PathBuf {
        self.root.join(SYLLABI_DIR).join(format!("{doc_id}.json"))
    }

    /// Path of a user's task list
    #[must_use]
    pub fn tasks_path(&self, uid: &str) -> PathBuf {
        self.root.join(TASKS_DIR).join(format!("{uid}.json"))
    }

    /// Path of a user's progress document
    #[must_use]
    pub fn progress_path(&self, uid: &str) -> PathBuf {
        self.root.join(PROGRESS_DIR).join(format!("{uid}.json"))
    }

    /// Path of the testimonials collection
    #[must_use]
    pub fn testimonials_path(&self) -> PathBuf {
        self.root.join(TESTIMONIALS_FILE)
    }

    /// Load a syllabus by key
    ///
    /// # Errors
    /// Returns an error if the document exists but cannot be read or parsed
    pub fn load_syllabus(&self, key: &SyllabusKey) -> Result<Option<Syllabus>, Box<dyn Error>> {
        self.load_syllabus_by_id(&key.doc_id())
    }

    /// Load a syllabus by document id
    ///
    /// # Errors
    /// Returns an error if the document exists but cannot be read or parsed
    pub fn load_syllabus_by_id(&self, doc_id: &str) -> Result<Option<Syllabus>, Box<dyn Error>> {
        check_document_id(doc_id)?;
        read_doc(&self.syllabus_path(doc_id))
    }

    /// Save a syllabus; only admins may write syllabus documents
    ///
    /// Records the writer's uid in `updated_by`.
    ///
    /// # Errors
    /// Returns an error if `profile` is not an admin or the write fails
    pub fn save_syllabus(
        &self,
        profile: &UserProfile,
        syllabus: &mut Syllabus,
    ) -> Result<(), Box<dyn Error>> {
        if !profile.is_admin() {
            return Err(format!(
                "Permission denied: user '{}' cannot modify syllabus documents",
                profile.uid
            )
            .into());
        }
        let doc_id = syllabus.key.doc_id();
        check_document_id(&doc_id)?;
        syllabus.updated_by = Some(profile.uid.clone());
        let path = self.syllabus_path(&doc_id);
        let mut batch = WriteBatch::new();
        batch.put(&path, &*syllabus)?;
        batch.commit()?;
        info!("Saved syllabus {} to {}", syllabus.key, path.display());
        Ok(())
    }

    /// Load a user's tasks; empty when none are stored
    ///
    /// # Errors
    /// Returns an error if the document exists but cannot be read or parsed
    pub fn load_tasks(&self, uid: &str) -> Result<Vec<Task>, Box<dyn Error>> {
        check_document_id(uid)?;
        Ok(read_doc(&self.tasks_path(uid))?.unwrap_or_default())
    }

    /// Replace a user's task list
    ///
    /// # Errors
    /// Returns an error if `uid` is not a valid document id or the write fails
    pub fn save_tasks(&self, uid: &str, tasks: &[Task]) -> Result<(), Box<dyn Error>> {
        check_document_id(uid)?;
        let mut batch = WriteBatch::new();
        batch.put(self.tasks_path(uid), tasks)?;
        batch.commit()?;
        Ok(())
    }

    /// Load a user's progress; empty when none is stored
    ///
    /// # Errors
    /// Returns an error if the document exists but cannot be read or parsed
    pub fn load_progress(&self, uid: &str) -> Result<AcademicProgress, Box<dyn Error>> {
        check_document_id(uid)?;
        Ok(read_doc(&self.progress_path(uid))?.unwrap_or_else(|| AcademicProgress::new(uid)))
    }

    /// Replace a user's progress document
    ///
    /// # Errors
    /// Returns an error if the write fails
    pub fn save_progress(&self, progress: &AcademicProgress) -> Result<(), Box<dyn Error>> {
        check_document_id(&progress.owner)?;
        let mut batch = WriteBatch::new();
        batch.put(self.progress_path(&progress.owner), progress)?;
        batch.commit()?;
        Ok(())
    }

    /// Write a user's tasks and progress together
    ///
    /// # Errors
    /// Returns an error if either document cannot be serialized or written
    pub fn save_tasks_and_progress(
        &self,
        uid: &str,
        tasks: &[Task],
        progress: &AcademicProgress,
    ) -> Result<(), Box<dyn Error>> {
        check_document_id(uid)?;
        check_document_id(&progress.owner)?;
        let mut batch = WriteBatch::new();
        batch
            .put(self.tasks_path(uid), tasks)?
            .put(self.progress_path(&progress.owner), progress)?;
        batch.commit()?;
        Ok(())
    }

    /// Load all testimonials, approved or not
    ///
    /// # Errors
    /// Returns an error if the document exists but cannot be read or parsed
    pub fn load_testimonials(&self) -> Result<Vec<Testimonial>, Box<dyn Error>> {
        Ok(read_doc(&self.testimonials_path())?.unwrap_or_default())
    }

    /// Replace the testimonials collection
    ///
    /// # Errors
    /// Returns an error if the write fails
    pub fn save_testimonials(&self, testimonials: &[Testimonial]) -> Result<(), Box<dyn Error>> {
        let mut batch = WriteBatch::new();
        batch.put(self.testimonials_path(), testimonials)?;
        batch.commit()?;
        Ok(())
    }
}

/// Read and parse a JSON document; absent or unreadable-by-permission is `None`
fn read_doc<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, Box<dyn Error>> {
    match fs::read_to_string(path) {
        Ok(content) => {
            let doc = serde_json::from_str(&content)
                .map_err(|e| format!("Malformed document {}: {e}", path.display()))?;
            Ok(Some(doc))
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
            debug!("No read access to {}; treating as absent", path.display());
            Ok(None)
        }
        Err(e) => Err(format!("Failed to read {}: {e}", path.display()).into()),
    }
}
