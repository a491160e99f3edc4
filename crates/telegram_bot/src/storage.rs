//! Flat-directory store for uploaded blobs.

use std::io;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug)]
pub(crate) struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub(crate) fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Writes `bytes` under `name` and returns the stored path.
    ///
    /// `name` is reduced to its final path component so a crafted file name
    /// cannot escape the store directory.
    pub(crate) async fn store_blob(&self, name: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        let name = sanitize_name(name);
        tokio::fs::create_dir_all(&self.root).await?;
        let path = self.root.join(name);
        tokio::fs::write(&path, bytes).await?;
        Ok(path)
    }
}

fn sanitize_name(name: &str) -> String {
    let base = Path::new(name)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    if base.is_empty() {
        "unnamed".to_string()
    } else {
        base
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    fn test_root() -> PathBuf {
        std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../../target/test_files")
            .join(Uuid::new_v4().to_string())
    }

    #[test]
    fn sanitize_strips_directories() {
        assert_eq!(sanitize_name("notes.txt"), "notes.txt");
        assert_eq!(sanitize_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_name(""), "unnamed");
        assert_eq!(sanitize_name("a/.."), "unnamed");
    }

    #[tokio::test]
    async fn store_blob_writes_under_the_root() {
        let root = test_root();
        let store = FileStore::new(root.clone());

        let path = store.store_blob("notes.txt", b"hello").await.unwrap();

        assert_eq!(path, root.join("notes.txt"));
        assert_eq!(std::fs::read(&path).unwrap(), b"hello");
        std::fs::remove_dir_all(&root).unwrap();
    }
}
