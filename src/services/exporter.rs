//! 导出服务 - 业务能力层
//!
//! 只负责"把一套题目写成可独立运行的 HTML 页面"，以及从导出的页面中读回题目。

use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::info;

use crate::error::ExportError;
use crate::models::{QuizExport, QuizQuestion, QuizSettings};

/// 题目数据占位符
pub const QUIZ_DATA_PLACEHOLDER: &str = "{{QUIZ_DATA}}";
/// 倒计时秒数占位符
pub const TIMER_PLACEHOLDER: &str = "{{TIMER_SECONDS}}";
/// 音效开关占位符
pub const SOUND_PLACEHOLDER: &str = "{{SOUND_ENABLED}}";

/// 内置的播放器页面模板
const PLAYER_TEMPLATE: &str = include_str!("../../assets/player.html");

/// 题目数据所在的脚本块
const QUIZ_DATA_PATTERN: &str =
    r#"(?s)<script id="quiz-data" type="application/json">(.*?)</script>"#;

/// HTML 导出服务
///
/// 职责：
/// - 把题目数组序列化后嵌入播放器模板
/// - 写入固定文件名的导出文件
/// - 不修改题目内容，不关心题目从哪里来
pub struct HtmlExporter {
    file_name: String,
}

impl HtmlExporter {
    /// 创建导出服务
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
        }
    }

    /// 导出文件名
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// 渲染完整页面
    ///
    /// 题目数组嵌入在 JSON 脚本块中，见 [`script_safe_json`]。
    pub fn render(&self, quiz: &QuizExport) -> Result<String, ExportError> {
        let data = script_safe_json(&serde_json::to_string(quiz.questions())?);
        let settings = quiz.settings();

        // 题目数据最后替换，题目文本中的占位符原样保留
        Ok(PLAYER_TEMPLATE
            .replace(TIMER_PLACEHOLDER, &settings.timer_seconds.to_string())
            .replace(SOUND_PLACEHOLDER, if settings.sound_enabled { "true" } else { "false" })
            .replace(QUIZ_DATA_PLACEHOLDER, &data))
    }

    /// 渲染并写入 `dir/<file_name>`，返回写入的路径
    pub async fn write_to(&self, quiz: &QuizExport, dir: &Path) -> Result<PathBuf, ExportError> {
        let html = self.render(quiz)?;
        let path = dir.join(&self.file_name);

        let write_failed = |source| ExportError::WriteFailed {
            path: path.clone(),
            source,
        };
        tokio::fs::create_dir_all(dir).await.map_err(write_failed)?;
        tokio::fs::write(&path, html.as_bytes())
            .await
            .map_err(write_failed)?;

        info!(
            "💾 已导出 {} 道题目到 {} ({} 字节)",
            quiz.len(),
            path.display(),
            html.len()
        );
        Ok(path)
    }
}

/// 把 JSON 文本中的 `<` `>` `&` 写成 `\u003c` `\u003e` `\u0026`
///
/// 这些字符只会出现在字符串字面量里，转义后 JSON 值不变；脚本块中不再有
/// 任何 `<`，题目文本里的 `</script>` 或 `<!--<script>` 都无法影响 HTML 解析。
fn script_safe_json(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        match c {
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            _ => out.push(c),
        }
    }
    out
}

/// 从导出的页面中读回题目数组
///
/// 与 [`HtmlExporter::render`] 互逆：读回的题目与导出前逐字段一致。
pub fn extract_questions(html: &str) -> Result<Vec<QuizQuestion>, ExportError> {
    let pattern = Regex::new(QUIZ_DATA_PATTERN).map_err(|_| ExportError::MissingQuizData)?;
    let data = pattern
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty() && *s != QUIZ_DATA_PLACEHOLDER)
        .ok_or(ExportError::MissingQuizData)?;

    // `\u003c` 等本身就是合法的 JSON 转义，直接解析即可还原
    Ok(serde_json::from_str(data)?)
}

/// 从导出的页面中读回题目和播放器设置
pub fn extract_quiz(html: &str) -> Result<QuizExport, ExportError> {
    let questions = extract_questions(html)?;
    let settings = QuizSettings {
        timer_seconds: capture_const(html, "TIMER_SECONDS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(0),
        sound_enabled: capture_const(html, "SOUND_ENABLED").map_or(true, |v| v == "true"),
    };
    QuizExport::new(questions, settings).map_err(|_| ExportError::MissingQuizData)
}

fn capture_const(html: &str, name: &str) -> Option<String> {
    let pattern = Regex::new(&format!(r"const {} = ([^;]+);", name)).ok()?;
    pattern
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
}
