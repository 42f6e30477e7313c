pub mod chat_routes;
pub mod health_routes;
pub mod info_routes;
pub mod search_routes;

pub use chat_routes::*;
pub use health_routes::*;
pub use info_routes::*;
pub use search_routes::*;
