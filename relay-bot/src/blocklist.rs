//! Senders whose lines are ignored entirely, loaded once at startup from `blocklist.txt`.

use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::Path;
use tracing::info;

/// Case-insensitive set of nicknames.
#[derive(Debug, Clone, Default)]
pub struct BlockList {
    names: HashSet<String>,
}

impl BlockList {
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = names
            .into_iter()
            .map(|n| n.as_ref().trim().to_lowercase())
            .filter(|n| !n.is_empty())
            .collect();
        Self { names }
    }

    /// One name per line; blank lines are skipped. A missing file is an empty list.
    pub async fn load(path: &Path) -> std::io::Result<Self> {
        match tokio::fs::read_to_string(path).await {
            Ok(raw) => {
                let list = Self::from_names(raw.lines());
                info!(path = %path.display(), blocked = list.len(), "Block list loaded");
                Ok(list)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %path.display(), "No block list found");
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(&name.trim().to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_load_skips_blank_lines_and_ignores_case() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("blocklist.txt");
        std::fs::write(&path, "Spammer\n\n  troll  \r\n").unwrap();

        let list = BlockList::load(&path).await.unwrap();
        assert_eq!(list.len(), 2);
        assert!(list.contains("spammer"));
        assert!(list.contains("TROLL"));
        assert!(!list.contains("alice"));
    }

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let list = BlockList::load(&dir.path().join("absent.txt")).await.unwrap();
        assert!(list.is_empty());
    }

    #[tokio::test]
    async fn test_unreadable_path_is_an_error() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("blocklist.txt")).unwrap();
        assert!(BlockList::load(&dir.path().join("blocklist.txt")).await.is_err());
    }
}
