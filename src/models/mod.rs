pub mod difficulty;
pub mod export;
pub mod loaders;
pub mod question;
pub mod request;

pub use difficulty::{DifficultyLevel, RequestedDifficulty};
pub use export::{QuizExport, QuizSettings, RecordUpdate, SavedQuizRecord};
pub use loaders::{load_document, load_documents};
pub use question::{AnswerKey, QuestionKind, QuizQuestion, OPTION_COUNT};
pub use request::{GenerationRequest, SourceDocument, MAX_QUESTION_COUNT, MIN_QUESTION_COUNT};
