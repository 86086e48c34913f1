use serde::{Deserialize, Serialize};

use crate::models::difficulty::DifficultyLevel;

/// 单选题固定的选项数量
pub const OPTION_COUNT: usize = 4;

/// 题型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestionKind {
    /// 单选题
    #[serde(rename = "mcq")]
    MultipleChoice,
    /// 判断题
    #[serde(rename = "tf")]
    TrueFalse,
    /// 填数题
    #[serde(rename = "short")]
    ShortNumeric,
}

impl QuestionKind {
    /// 线上协议中的标签
    pub fn as_str(self) -> &'static str {
        match self {
            QuestionKind::MultipleChoice => "mcq",
            QuestionKind::TrueFalse => "tf",
            QuestionKind::ShortNumeric => "short",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "mcq" => Some(QuestionKind::MultipleChoice),
            "tf" => Some(QuestionKind::TrueFalse),
            "short" => Some(QuestionKind::ShortNumeric),
            _ => None,
        }
    }
}

/// 标准答案，按题型区分
///
/// 序列化后与题目其余字段平铺在一起：`{"kind": "mcq", "options": [...], "correctAnswer": 2, ...}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum AnswerKey {
    /// 选项下标从 0 开始
    #[serde(rename = "mcq", rename_all = "camelCase")]
    MultipleChoice {
        options: Vec<String>,
        correct_answer: usize,
    },
    #[serde(rename = "tf", rename_all = "camelCase")]
    TrueFalse { correct_answer: bool },
    #[serde(rename = "short", rename_all = "camelCase")]
    ShortNumeric { correct_answer: f64 },
}

impl AnswerKey {
    pub fn kind(&self) -> QuestionKind {
        match self {
            AnswerKey::MultipleChoice { .. } => QuestionKind::MultipleChoice,
            AnswerKey::TrueFalse { .. } => QuestionKind::TrueFalse,
            AnswerKey::ShortNumeric { .. } => QuestionKind::ShortNumeric,
        }
    }
}

/// 一道题
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    /// 题目编号，同一套题内唯一
    pub id: u32,
    /// 显示在题目上方的主题标签
    pub topic: String,
    /// 题干，可能包含 LaTeX 公式
    pub prompt: String,
    #[serde(flatten)]
    pub answer: AnswerKey,
    /// 答题后显示的解析
    pub explanation: String,
    pub difficulty_level: DifficultyLevel,
}

impl QuizQuestion {
    pub fn kind(&self) -> QuestionKind {
        self.answer.kind()
    }

    /// 单选题的选项，其它题型返回 `None`
    pub fn options(&self) -> Option<&[String]> {
        match &self.answer {
            AnswerKey::MultipleChoice { options, .. } => Some(options),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_mcq() -> QuizQuestion {
        QuizQuestion {
            id: 1,
            topic: "Quang hợp".to_string(),
            prompt: "Chất nào được tạo ra?".to_string(),
            answer: AnswerKey::MultipleChoice {
                options: vec!["O2".into(), "CO2".into(), "N2".into(), "H2".into()],
                correct_answer: 0,
            },
            explanation: "Quang hợp giải phóng oxy.".to_string(),
            difficulty_level: DifficultyLevel::Recall,
        }
    }

    #[test]
    fn test_mcq_serializes_flat() {
        let value = serde_json::to_value(sample_mcq()).unwrap();
        assert_eq!(value["kind"], "mcq");
        assert_eq!(value["correctAnswer"], 0);
        assert_eq!(value["options"].as_array().unwrap().len(), 4);
        assert_eq!(value["difficultyLevel"], "recall");
    }

    #[test]
    fn test_true_false_has_no_options() {
        let value = json!({
            "id": 2,
            "kind": "tf",
            "topic": "t",
            "prompt": "p",
            "correctAnswer": true,
            "explanation": "e",
            "difficultyLevel": "comprehension"
        });
        let question: QuizQuestion = serde_json::from_value(value).unwrap();
        assert_eq!(question.kind(), QuestionKind::TrueFalse);
        assert!(question.options().is_none());
        assert_eq!(question.answer, AnswerKey::TrueFalse { correct_answer: true });
    }

    #[test]
    fn test_short_numeric_accepts_integer_literal() {
        let value = json!({
            "id": 3,
            "kind": "short",
            "topic": "t",
            "prompt": "2 + 3 = ?",
            "correctAnswer": 5,
            "explanation": "e",
            "difficultyLevel": "application"
        });
        let question: QuizQuestion = serde_json::from_value(value).unwrap();
        assert_eq!(question.answer, AnswerKey::ShortNumeric { correct_answer: 5.0 });
    }

    #[test]
    fn test_kind_tags() {
        for kind in [
            QuestionKind::MultipleChoice,
            QuestionKind::TrueFalse,
            QuestionKind::ShortNumeric,
        ] {
            assert_eq!(QuestionKind::from_tag(kind.as_str()), Some(kind));
        }
        assert_eq!(QuestionKind::from_tag("essay"), None);
    }
}
