pub mod answer;
pub mod question;
pub mod stats;

pub use answer::{AnswerEvent, EventFilter, SubmitAnswerRequest, SubmitAnswerResponse};
pub use question::{
    Difficulty, LocalizedList, LocalizedText, Question, QuestionType, QuestionView,
    DEFAULT_LANGUAGE,
};
pub use stats::{level_for_points, round_accuracy, ProgressStats, TopicStats};
