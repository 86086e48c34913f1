//! 答题播放器（Player）
//!
//! 只依赖一份不可变的 [`QuizExport`](crate::models::QuizExport)，不涉及网络、生成和持久化。
//!
//! - `evaluate` - 按题型判定答案
//! - `machine` - 状态机：Question(i) → Feedback(i) → ... → Results
//! - `result` - 得分百分比与评价等级
//! - `view` - 每种题型的作答控件

pub mod evaluate;
pub mod machine;
pub mod result;
pub mod view;

pub use evaluate::{evaluate, Candidate, NUMERIC_TOLERANCE};
pub use machine::{Effect, FeedbackView, PlayerOptions, PlayerState, QuizPlayer, Sound};
pub use result::{QuizResult, ResultTier};
pub use view::{answer_controls, progress_label, AnswerButton, AnswerControls};
