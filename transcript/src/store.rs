//! Transcript store: the whole conversation as one pretty-printed JSON array on disk.
//!
//! Every mutation is a full read-modify-write of the file. The file is created lazily on first
//! read, seeded with the configured system prompt when there is one. Numbered archives live next to
//! the active file as `base.<index>.ext`.
//!
//! External: local filesystem via tokio::fs. No locking; callers keep to one writer at a time.

use crate::entry::Entry;
use crate::error::TranscriptError;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Highest usable archive index.
pub const MAX_ARCHIVE_INDEX: u32 = 9999;

/// Archive index meaning "next free" when saving and "most recent" when loading.
pub const AUTO_INDEX: u32 = 0;

pub type Result<T> = std::result::Result<T, TranscriptError>;

#[derive(Debug, Clone)]
pub struct TranscriptStore {
    path: PathBuf,
    seed: Option<String>,
}

impl TranscriptStore {
    /// Store backed by `path`. `seed` becomes the first `system` entry whenever the file is created.
    pub fn new(path: impl Into<PathBuf>, seed: Option<String>) -> Self {
        Self {
            path: path.into(),
            seed: seed.filter(|s| !s.trim().is_empty()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn seed(&self) -> Option<&str> {
        self.seed.as_deref()
    }

    fn seed_entries(&self) -> Vec<Entry> {
        self.seed.iter().map(Entry::system).collect()
    }

    /// Reads the transcript, creating the seeded file first if it does not exist.
    pub async fn load(&self) -> Result<Vec<Entry>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => parse_entries(&raw),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let entries = self.seed_entries();
                info!(
                    path = %self.path.display(),
                    seeded = !entries.is_empty(),
                    "Creating transcript"
                );
                self.save(&entries).await?;
                Ok(entries)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Overwrites the transcript with `entries`.
    pub async fn save(&self, entries: &[Entry]) -> Result<()> {
        write_entries(&self.path, entries).await
    }

    /// Appends `new_entries` (read-modify-write) and returns the full updated transcript.
    pub async fn append(&self, new_entries: &[Entry]) -> Result<Vec<Entry>> {
        let mut entries = self.load().await?;
        entries.extend_from_slice(new_entries);
        self.save(&entries).await?;
        debug!(
            path = %self.path.display(),
            appended = new_entries.len(),
            total = entries.len(),
            "Transcript appended"
        );
        Ok(entries)
    }

    /// Removes the transcript file. Returns false when there was nothing to remove. The next
    /// [`load`](Self::load) recreates the seeded file.
    pub async fn clear(&self) -> Result<bool> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                info!(path = %self.path.display(), "Transcript cleared");
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Sibling path `base.<index>.ext` for an archive slot.
    pub fn archive_path(&self, index: u32) -> PathBuf {
        let stem = self
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let name = match self.path.extension() {
            Some(ext) => format!("{}.{}.{}", stem, index, ext.to_string_lossy()),
            None => format!("{}.{}", stem, index),
        };
        self.path.with_file_name(name)
    }

    /// Indices of the archives that currently exist, ascending.
    pub async fn archive_indices(&self) -> Result<Vec<u32>> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let mut read_dir = match tokio::fs::read_dir(&dir).await {
            Ok(rd) => rd,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut indices = Vec::new();
        while let Some(dir_entry) = read_dir.next_entry().await? {
            let name = dir_entry.file_name();
            if let Some(index) = self.archive_index_of(&name.to_string_lossy()) {
                indices.push(index);
            }
        }
        indices.sort_unstable();
        Ok(indices)
    }

    fn archive_index_of(&self, file_name: &str) -> Option<u32> {
        let stem = self.path.file_stem()?.to_string_lossy();
        let rest = file_name.strip_prefix(stem.as_ref())?.strip_prefix('.')?;
        let digits = match self.path.extension() {
            Some(ext) => rest
                .strip_suffix(ext.to_string_lossy().as_ref())?
                .strip_suffix('.')?,
            None => rest,
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits
            .parse()
            .ok()
            .filter(|i| (1..=MAX_ARCHIVE_INDEX).contains(i))
    }

    /// Copies the active transcript into archive `index` ([`AUTO_INDEX`] picks the next free slot)
    /// and returns the index written.
    pub async fn save_archive(&self, index: u32) -> Result<u32> {
        let index = if index == AUTO_INDEX {
            next_free_index(&self.archive_indices().await?)?
        } else {
            check_index(index)?
        };

        let entries = self.load().await?;
        let archive = self.archive_path(index);
        write_entries(&archive, &entries).await?;
        info!(
            index,
            path = %archive.display(),
            entries = entries.len(),
            "Transcript archived"
        );
        Ok(index)
    }

    /// Replaces the active transcript with archive `index` ([`AUTO_INDEX`] picks the highest
    /// existing archive). Returns the index read.
    pub async fn load_archive(&self, index: u32) -> Result<u32> {
        let index = if index == AUTO_INDEX {
            *self
                .archive_indices()
                .await?
                .last()
                .ok_or(TranscriptError::NoArchives)?
        } else {
            check_index(index)?
        };

        let archive = self.archive_path(index);
        let raw = match tokio::fs::read_to_string(&archive).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(TranscriptError::ArchiveNotFound(index))
            }
            Err(e) => return Err(e.into()),
        };
        let entries = parse_entries(&raw)?;
        self.save(&entries).await?;
        info!(
            index,
            path = %archive.display(),
            entries = entries.len(),
            "Transcript restored from archive"
        );
        Ok(index)
    }
}

/// One past the highest used slot; once slot [`MAX_ARCHIVE_INDEX`] exists, the lowest unused one.
/// `used` must be sorted ascending.
pub(crate) fn next_free_index(used: &[u32]) -> Result<u32> {
    match used.last() {
        None => Ok(1),
        Some(&last) if last < MAX_ARCHIVE_INDEX => Ok(last + 1),
        Some(_) => (1..=MAX_ARCHIVE_INDEX)
            .zip(used.iter().copied().chain(std::iter::repeat(0)))
            .find(|&(slot, taken)| slot != taken)
            .map(|(slot, _)| slot)
            .ok_or(TranscriptError::ArchiveFull),
    }
}

fn check_index(index: u32) -> Result<u32> {
    if (1..=MAX_ARCHIVE_INDEX).contains(&index) {
        Ok(index)
    } else {
        Err(TranscriptError::InvalidIndex(index))
    }
}

/// Empty files and a bare `null` count as an empty transcript.
fn parse_entries(raw: &str) -> Result<Vec<Entry>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(trimmed)?)
}

async fn write_entries(path: &Path, entries: &[Entry]) -> Result<()> {
    let mut body = serde_json::to_string_pretty(entries)?;
    body.push('\n');
    tokio::fs::write(path, body).await?;
    Ok(())
}
