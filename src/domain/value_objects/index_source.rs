use serde::{Deserialize, Serialize};

use super::{DocumentInfo, FileHash};

/// Provenance of an index: which PDF it was built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexSource {
    pub file_name: String,
    pub sha256: FileHash,
    pub page_count: usize,
    #[serde(default)]
    pub info: DocumentInfo,
}
