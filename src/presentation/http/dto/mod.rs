pub mod chat_dto;
pub mod info_dto;
pub mod response_dto;
pub mod search_dto;

pub use chat_dto::*;
pub use info_dto::*;
pub use response_dto::*;
pub use search_dto::*;
