pub mod review;
pub mod session;

pub use review::{reconstruct, reconstruct_by_id, AnswerVerdict, OptionMark, QuestionReview};
pub use session::{AbandonMode, Advance, QuizSession, SessionOutcome, SessionState};
