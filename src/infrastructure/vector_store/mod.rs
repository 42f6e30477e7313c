pub mod flat_index;
pub mod index_files;

pub use flat_index::FlatIndex;
