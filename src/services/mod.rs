pub mod fallback_bank;
pub mod llm_service;
pub mod question_source;
pub mod result_recorder;
pub mod result_store;

pub use fallback_bank::FallbackBank;
pub use llm_service::LlmService;
pub use question_source::{QuestionGenerator, QuestionSource};
pub use result_recorder::ResultRecorder;
pub use result_store::{ResultStore, RESULTS_KEY};
