pub mod document_metadata;
pub mod file_hash;
pub mod index_source;

pub use document_metadata::{DocumentInfo, PageMetadata, SOURCE_TITLE};
pub use file_hash::FileHash;
pub use index_source::IndexSource;
