pub mod container;
pub mod external_services;
pub mod sessions;
pub mod vector_store;

pub use container::{AppContainer, RetrievalContainer};
