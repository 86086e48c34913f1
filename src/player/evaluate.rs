//! 答案判定

use crate::models::{AnswerKey, QuizQuestion};

/// 填数题的比较误差
pub const NUMERIC_TOLERANCE: f64 = 1e-3;

/// 玩家提交的答案
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Candidate {
    /// 单选题选项下标
    Choice(usize),
    /// 判断题
    Truth(bool),
    /// 填数题
    Number(f64),
    /// 无法解析的填数输入，按答错处理
    Unparseable,
}

impl Candidate {
    /// 解析填数题输入
    ///
    /// 接受小数逗号（`2,5`）；空串、非数字、NaN、无穷都返回 `Unparseable`。
    pub fn parse_numeric(input: &str) -> Self {
        let trimmed = input.trim();
        let normalized = if trimmed.contains('.') {
            trimmed.to_string()
        } else {
            trimmed.replacen(',', ".", 1)
        };
        match normalized.parse::<f64>() {
            Ok(value) if value.is_finite() => Candidate::Number(value),
            _ => Candidate::Unparseable,
        }
    }
}

/// 判断答案是否正确
///
/// 题型不匹配的答案一律判错。
pub fn evaluate(candidate: &Candidate, question: &QuizQuestion) -> bool {
    match (&question.answer, candidate) {
        (AnswerKey::MultipleChoice { correct_answer, .. }, Candidate::Choice(index)) => {
            index == correct_answer
        }
        (AnswerKey::TrueFalse { correct_answer }, Candidate::Truth(value)) => value == correct_answer,
        (AnswerKey::ShortNumeric { correct_answer }, Candidate::Number(value)) => {
            (value - correct_answer).abs() < NUMERIC_TOLERANCE
        }
        _ => false,
    }
}
