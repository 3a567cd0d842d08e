use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Serialize, de::DeserializeOwned};

use crate::store::schema::{LessonHistoryData, MistakeBookData, ProfileData};

const PROFILE_FILE: &str = "profile.json";
const MISTAKES_FILE: &str = "mistakes.json";
const HISTORY_FILE: &str = "lesson_history.json";

/// Learner data kept as one JSON document per concern under a single
/// directory.
pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn new() -> Result<Self> {
        Self::with_base_dir(Self::default_dir())
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)
            .with_context(|| format!("creating {}", base_dir.display()))?;
        Ok(Self { base_dir })
    }

    pub fn default_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("algolingo")
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    /// `Ok(None)` when the file does not exist yet.
    fn read<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>> {
        let path = self.file_path(name);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e).with_context(|| format!("reading {}", path.display())),
        };
        let value = serde_json::from_str(&content)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(Some(value))
    }

    /// Read a document, falling back to its default. Unparseable files are
    /// renamed to `<name>.corrupt` so the next save does not destroy them.
    fn read_or_default<T: DeserializeOwned + Default>(&self, name: &str) -> T {
        match self.read(name) {
            Ok(value) => value.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(file = name, error = %e, "unreadable store file, using defaults");
                self.quarantine(name);
                T::default()
            }
        }
    }

    fn quarantine(&self, name: &str) {
        let path = self.file_path(name);
        if let Err(e) = fs::rename(&path, path.with_extension("corrupt")) {
            tracing::warn!(file = name, error = %e, "could not move corrupt file aside");
        }
    }

    /// Write via a sibling temp file and rename, so readers never see a
    /// half-written document.
    fn write<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let path = self.file_path(name);
        let tmp_path = path.with_extension("tmp");

        let file = File::create(&tmp_path)
            .with_context(|| format!("creating {}", tmp_path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, data)?;
        writer.flush()?;
        writer.get_ref().sync_all()?;

        fs::rename(&tmp_path, &path).with_context(|| format!("replacing {}", path.display()))?;
        tracing::debug!(file = name, "saved");
        Ok(())
    }

    /// `None` means the profile exists but is unreadable; the caller decides
    /// whether to start fresh.
    pub fn load_profile(&self) -> Option<ProfileData> {
        match self.read(PROFILE_FILE) {
            Ok(profile) => Some(profile.unwrap_or_default()),
            Err(e) => {
                tracing::warn!(error = %e, "profile unreadable");
                None
            }
        }
    }

    pub fn save_profile(&self, data: &ProfileData) -> Result<()> {
        self.write(PROFILE_FILE, data)
    }

    pub fn load_mistake_book(&self) -> MistakeBookData {
        self.read_or_default(MISTAKES_FILE)
    }

    pub fn save_mistake_book(&self, data: &MistakeBookData) -> Result<()> {
        self.write(MISTAKES_FILE, data)
    }

    pub fn load_history(&self) -> LessonHistoryData {
        self.read_or_default(HISTORY_FILE)
    }

    pub fn save_history(&self, data: &LessonHistoryData) -> Result<()> {
        self.write(HISTORY_FILE, data)
    }
}
