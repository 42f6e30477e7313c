pub mod chat_handler;
pub mod info_handler;
pub mod search_handler;

pub use chat_handler::ChatHandler;
pub use info_handler::InfoHandler;
pub use search_handler::SearchHandler;
