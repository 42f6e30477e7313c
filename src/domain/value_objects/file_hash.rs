use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;

/// SHA-256 fingerprint of the indexed source document, lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileHash(String);

impl FileHash {
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        Self(format!("{:x}", hasher.finalize()))
    }

    pub fn from_file(path: &Path) -> std::io::Result<Self> {
        Ok(Self::from_bytes(&std::fs::read(path)?))
    }
}

impl std::fmt::Display for FileHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_known_digest() {
        assert_eq!(
            FileHash::from_bytes(b"123").to_string(),
            "a665a45920422f9d417e4867efdc4fb8a04a1f3fff1fa07e998e86f7f7a27ae3"
        );
    }

    #[test]
    fn test_file_and_bytes_agree() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"Health and Safety at Work Act 2015").unwrap();

        let from_file = FileHash::from_file(file.path()).unwrap();
        let from_bytes = FileHash::from_bytes(b"Health and Safety at Work Act 2015");

        assert_eq!(from_file, from_bytes);
        assert_eq!(from_file.to_string().len(), 64);
    }

    #[test]
    fn test_missing_file() {
        assert!(FileHash::from_file(Path::new("does/not/exist.pdf")).is_err());
    }
}
