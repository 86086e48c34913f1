//! 返回结构约定
//!
//! 生成服务必须按这里的结构返回题目数组。约定随请求一起发送，由服务端约束
//! 自身输出；本地不做严格校验，字段的兜底转换由 [`crate::services::normalizer`] 负责。

use serde::Deserialize;
use serde_json::{json, Value};

use crate::models::{DifficultyLevel, QuestionKind};

/// 约定名称
pub const SCHEMA_NAME: &str = "quiz_questions";

/// 构建题目数组的 JSON Schema
///
/// - `options` 始终要求出现，只有单选题时才有意义，保持 schema 静态
/// - `correctAnswer` 只能表达为数字：判断题用 1/0 表示对/错，下游再转换
/// - `difficultyLevel` 即使请求为混合难度也必须给出
pub fn question_schema() -> Value {
    let kinds: Vec<&str> = [
        QuestionKind::MultipleChoice,
        QuestionKind::TrueFalse,
        QuestionKind::ShortNumeric,
    ]
    .iter()
    .map(|k| k.as_str())
    .collect();
    let levels: Vec<&str> = DifficultyLevel::ALL.iter().map(|l| l.as_str()).collect();

    json!({
        "type": "array",
        "items": {
            "type": "object",
            "properties": {
                "id": { "type": "integer" },
                "kind": { "type": "string", "enum": kinds },
                "topic": { "type": "string" },
                "prompt": { "type": "string" },
                "options": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Required for mcq: exactly 4 choices. Empty array for other kinds."
                },
                "correctAnswer": {
                    "type": "number",
                    "description": "mcq: zero-based option index (0-3). tf: 1 = true, 0 = false. short: the numeric value."
                },
                "explanation": { "type": "string" },
                "difficultyLevel": {
                    "type": "string",
                    "enum": levels,
                    "description": "The actual cognitive level of this question."
                }
            },
            "required": [
                "id", "kind", "topic", "prompt", "options",
                "correctAnswer", "explanation", "difficultyLevel"
            ]
        }
    })
}

/// 生成服务返回的一条原始记录
///
/// 所有字段都是可选的宽松类型，转换与丢弃规则在 normalizer 中。
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawQuestion {
    pub id: Option<Value>,
    pub kind: Option<String>,
    pub topic: Option<String>,
    pub prompt: Option<String>,
    pub options: Option<Vec<String>>,
    pub correct_answer: Option<Value>,
    pub explanation: Option<String>,
    pub difficulty_level: Option<String>,
}

/// 把服务返回的文本解析为原始记录数组
///
/// 兼容 ```json 代码块包裹，以及 `{"questions": [...]}` 形式的外层对象。
pub fn parse_response(text: &str) -> Result<Vec<RawQuestion>, serde_json::Error> {
    let body = strip_code_fence(text.trim());

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Envelope {
        Bare(Vec<RawQuestion>),
        Wrapped { questions: Vec<RawQuestion> },
    }

    let envelope: Envelope = serde_json::from_str(body)?;
    Ok(match envelope {
        Envelope::Bare(questions) | Envelope::Wrapped { questions } => questions,
    })
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_lists_all_tags() {
        let schema = question_schema();
        let items = &schema["items"];
        assert_eq!(items["properties"]["kind"]["enum"], json!(["mcq", "tf", "short"]));
        assert_eq!(
            items["properties"]["difficultyLevel"]["enum"],
            json!(["recall", "comprehension", "application", "analysis"])
        );
        let required = items["required"].as_array().unwrap();
        assert!(required.contains(&json!("difficultyLevel")));
        assert!(required.contains(&json!("options")));
    }

    #[test]
    fn test_parse_bare_array() {
        let raw = parse_response(r#"[{"id": 1, "kind": "tf", "correctAnswer": 1}]"#).unwrap();
        assert_eq!(raw.len(), 1);
        assert_eq!(raw[0].kind.as_deref(), Some("tf"));
        assert_eq!(raw[0].correct_answer, Some(json!(1)));
        assert!(raw[0].options.is_none());
    }

    #[test]
    fn test_parse_fenced_and_wrapped() {
        let text = "```json\n{\"questions\": [{\"id\": 7, \"kind\": \"short\"}]}\n```";
        let raw = parse_response(text).unwrap();
        assert_eq!(raw[0].id, Some(json!(7)));
    }

    #[test]
    fn test_parse_rejects_prose() {
        assert!(parse_response("Sure! Here are your questions.").is_err());
    }
}
