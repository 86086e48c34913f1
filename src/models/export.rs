use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{QuizError, Result};
use crate::models::difficulty::RequestedDifficulty;
use crate::models::question::QuizQuestion;

/// 播放器设置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSettings {
    /// 倒计时总秒数，0 表示不计时
    pub timer_seconds: u32,
    pub sound_enabled: bool,
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            timer_seconds: 0,
            sound_enabled: true,
        }
    }
}

impl QuizSettings {
    pub fn is_timed(&self) -> bool {
        self.timer_seconds > 0
    }
}

/// 一次成功生成的结果快照
///
/// 创建后不再修改；重新生成会得到新的快照。
/// 反序列化同样经过 [`QuizExport::new`]，题库或导出文件中的空题目列表会被拒绝。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "QuizExportData")]
pub struct QuizExport {
    questions: Vec<QuizQuestion>,
    settings: QuizSettings,
}

impl QuizExport {
    /// 创建快照；空题目列表无法游玩，直接拒绝
    pub fn new(questions: Vec<QuizQuestion>, settings: QuizSettings) -> Result<Self> {
        if questions.is_empty() {
            return Err(QuizError::EmptyQuiz);
        }
        Ok(Self {
            questions,
            settings,
        })
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    pub fn settings(&self) -> QuizSettings {
        self.settings
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuizExportData {
    questions: Vec<QuizQuestion>,
    #[serde(default)]
    settings: QuizSettings,
}

impl TryFrom<QuizExportData> for QuizExport {
    type Error = QuizError;

    fn try_from(data: QuizExportData) -> Result<Self> {
        Self::new(data.questions, data.settings)
    }
}

/// 题库中保存的一条记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedQuizRecord {
    pub id: String,
    pub name: String,
    pub topic: String,
    pub difficulty: RequestedDifficulty,
    pub quiz: QuizExport,
    pub created_at: DateTime<Utc>,
    pub question_count: usize,
}

impl std::fmt::Display for SavedQuizRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} | {} | {} 题 | {} | {}",
            self.id,
            self.name,
            self.question_count,
            self.difficulty.label(),
            self.created_at.format("%Y-%m-%d %H:%M")
        )
    }
}

/// 记录的部分更新
#[derive(Debug, Clone, Default)]
pub struct RecordUpdate {
    pub name: Option<String>,
    pub topic: Option<String>,
    pub quiz: Option<QuizExport>,
}

impl RecordUpdate {
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// 应用到记录上，题目快照更新时同步题目数量
    pub fn apply(self, record: &mut SavedQuizRecord) {
        if let Some(name) = self.name {
            record.name = name;
        }
        if let Some(topic) = self.topic {
            record.topic = topic;
        }
        if let Some(quiz) = self.quiz {
            record.question_count = quiz.len();
            record.quiz = quiz;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_export_rejected() {
        let result = QuizExport::new(Vec::new(), QuizSettings::default());
        assert!(matches!(result, Err(QuizError::EmptyQuiz)));
    }

    #[test]
    fn test_deserialize_goes_through_non_empty_check() {
        let empty = r#"{"questions": [], "settings": {"timerSeconds": 0, "soundEnabled": true}}"#;
        let err = serde_json::from_str::<QuizExport>(empty).unwrap_err();
        assert!(err.to_string().contains("没有可用的题目"));

        let one = r#"{"questions": [{"id": 1, "kind": "tf", "topic": "t", "prompt": "p",
            "correctAnswer": true, "explanation": "", "difficultyLevel": "recall"}]}"#;
        let quiz: QuizExport = serde_json::from_str(one).unwrap();
        assert_eq!(quiz.len(), 1);
        assert_eq!(quiz.settings(), QuizSettings::default());
    }

    #[test]
    fn test_settings_timed() {
        assert!(!QuizSettings::default().is_timed());
        let settings = QuizSettings {
            timer_seconds: 60,
            sound_enabled: false,
        };
        assert!(settings.is_timed());
    }
}
