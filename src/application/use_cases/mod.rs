pub mod ask_question;
pub mod build_index;
pub mod chat_session;
pub mod search_content;

pub use ask_question::AskQuestionUseCase;
pub use build_index::{BuildIndexRequest, BuildIndexUseCase, BuildStatistics};
pub use chat_session::{ChatReply, ChatSessionUseCase};
pub use search_content::{SearchContentRequest, SearchContentUseCase};
