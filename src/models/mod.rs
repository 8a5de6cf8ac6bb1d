pub mod question;
pub mod result;

pub use question::{
    Difficulty, ExperienceLevel, Question, QuizConfig, MAX_EXPERIENCE_YEARS, OPTION_COUNT,
};
pub use result::{QuizResult, UNANSWERED};
