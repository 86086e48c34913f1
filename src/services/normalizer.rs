//! 返回结果规范化与排序
//!
//! 把生成服务的原始记录转换成 [`QuizQuestion`]，混合难度时按层级稳定排序。

use std::collections::{BTreeMap, HashSet};

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{QuizError, Result};
use crate::models::{
    AnswerKey, DifficultyLevel, QuestionKind, QuizQuestion, RequestedDifficulty, OPTION_COUNT,
};
use crate::services::schema::RawQuestion;
use crate::utils::logging::truncate_text;

/// 规范化整批原始记录
///
/// - 判断题的答案：数字 1 或布尔 true 为"对"，其余为"错"
/// - 非混合请求：每道题的层级统一为请求的层级
/// - 混合请求：缺少层级的题目被丢弃，其余按层级升序稳定排序
/// - 无法使用的记录会被丢弃并记录警告；全部丢弃时返回 `EmptyQuiz`
pub fn normalize(raw: Vec<RawQuestion>, requested: RequestedDifficulty) -> Result<Vec<QuizQuestion>> {
    let total = raw.len();
    let mut questions: Vec<QuizQuestion> = raw
        .into_iter()
        .enumerate()
        .filter_map(|(position, record)| match normalize_one(record, position, requested) {
            Ok(question) => Some(question),
            Err(reason) => {
                warn!("⚠️ 丢弃第 {} 条记录: {}", position + 1, reason);
                None
            }
        })
        .collect();

    if questions.is_empty() {
        warn!("⚠️ {} 条原始记录中没有可用的题目", total);
        return Err(QuizError::EmptyQuiz);
    }

    if requested.is_mixed() {
        order_by_level(&mut questions);
        log_distribution(&questions);
    }

    ensure_unique_ids(&mut questions);

    debug!("规范化完成: {}/{} 条记录可用", questions.len(), total);
    Ok(questions)
}

/// 按层级升序稳定排序，同层级保持原有相对顺序
pub fn order_by_level(questions: &mut [QuizQuestion]) {
    questions.sort_by_key(|q| q.difficulty_level.rank());
}

fn normalize_one(
    record: RawQuestion,
    position: usize,
    requested: RequestedDifficulty,
) -> std::result::Result<QuizQuestion, String> {
    let tag = record.kind.as_deref().unwrap_or_default().trim();
    let kind = QuestionKind::from_tag(tag).ok_or_else(|| format!("未知题型 '{}'", tag))?;

    let prompt = record
        .prompt
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .ok_or("缺少题干")?;

    let answer = match kind {
        QuestionKind::MultipleChoice => {
            let options = record.options.unwrap_or_default();
            if options.len() != OPTION_COUNT {
                return Err(format!(
                    "单选题需要 {} 个选项，实际为 {}",
                    OPTION_COUNT,
                    options.len()
                ));
            }
            let index = record
                .correct_answer
                .as_ref()
                .and_then(as_index)
                .filter(|i| *i < OPTION_COUNT)
                .ok_or_else(|| format!("单选题答案无效: {:?}", record.correct_answer))?;
            AnswerKey::MultipleChoice {
                options,
                correct_answer: index,
            }
        }
        QuestionKind::TrueFalse => AnswerKey::TrueFalse {
            correct_answer: as_truth(record.correct_answer.as_ref()),
        },
        QuestionKind::ShortNumeric => {
            let value = record
                .correct_answer
                .as_ref()
                .and_then(as_number)
                .ok_or_else(|| format!("填数题答案不是数字: {:?}", record.correct_answer))?;
            AnswerKey::ShortNumeric {
                correct_answer: value,
            }
        }
    };

    let reported = record
        .difficulty_level
        .as_deref()
        .and_then(|s| serde_json::from_value::<DifficultyLevel>(Value::String(s.trim().to_string())).ok());
    let difficulty_level = match requested.concrete() {
        Some(level) => {
            if reported.is_some_and(|r| r != level) {
                debug!(
                    "题目 '{}' 标注的层级与请求不一致，统一为 {}",
                    truncate_text(&prompt, 30),
                    level
                );
            }
            level
        }
        None => reported.ok_or("混合难度请求中缺少有效的层级")?,
    };

    let id = record
        .id
        .as_ref()
        .and_then(as_index)
        .and_then(|i| u32::try_from(i).ok())
        .unwrap_or(position as u32 + 1);

    Ok(QuizQuestion {
        id,
        topic: record.topic.unwrap_or_default().trim().to_string(),
        prompt,
        answer,
        explanation: record.explanation.unwrap_or_default(),
        difficulty_level,
    })
}

/// 非负整数（数字或数字字符串）
fn as_index(value: &Value) -> Option<usize> {
    let number = as_number(value)?;
    (number >= 0.0 && number.fract() == 0.0).then_some(number as usize)
}

/// 有限数字（数字或数字字符串）；NaN 和无穷都视为无效
fn as_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    number.filter(|v| v.is_finite())
}

fn as_truth(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64() == Some(1.0),
        _ => false,
    }
}

/// 编号重复时按最终顺序重新编号 1..=N
fn ensure_unique_ids(questions: &mut [QuizQuestion]) {
    let mut seen = HashSet::new();
    if questions.iter().all(|q| seen.insert(q.id)) {
        return;
    }
    warn!("⚠️ 题目编号重复，重新编号");
    for (i, q) in questions.iter_mut().enumerate() {
        q.id = i as u32 + 1;
    }
}

fn log_distribution(questions: &[QuizQuestion]) {
    let mut counts: BTreeMap<DifficultyLevel, usize> = BTreeMap::new();
    for q in questions {
        *counts.entry(q.difficulty_level).or_default() += 1;
    }
    let summary: Vec<String> = DifficultyLevel::ALL
        .iter()
        .map(|l| format!("{}={}", l, counts.get(l).copied().unwrap_or(0)))
        .collect();
    info!("📊 混合难度分布: {}", summary.join(", "));
}
