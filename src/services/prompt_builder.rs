//! 提示词构建
//!
//! 输入一个 [`GenerationRequest`]，输出系统指令和按顺序排列的内容片段。

use crate::error::Result;
use crate::models::{DifficultyLevel, GenerationRequest, RequestedDifficulty, SourceDocument};

/// 未填写主题时，带资料请求使用的占位主题
pub const DEFAULT_DOCUMENT_TOPIC: &str = "primary content";

/// 发送给生成服务的一段内容
#[derive(Debug, Clone, PartialEq)]
pub enum ContentPart {
    Text(String),
    /// 二进制附件，保持上传顺序
    Attachment(SourceDocument),
}

/// 构建完成的请求
#[derive(Debug, Clone)]
pub struct BuiltPrompt {
    pub system_instruction: String,
    pub parts: Vec<ContentPart>,
}

impl BuiltPrompt {
    pub fn attachment_count(&self) -> usize {
        self.parts
            .iter()
            .filter(|p| matches!(p, ContentPart::Attachment(_)))
            .count()
    }
}

/// 提示词构建器
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    output_language: String,
}

impl PromptBuilder {
    pub fn new(output_language: impl Into<String>) -> Self {
        Self {
            output_language: output_language.into(),
        }
    }

    /// 构建系统指令和内容片段
    ///
    /// 请求会先做校验：主题和资料都为空时返回 `InvalidRequest`。
    pub fn build(&self, request: &GenerationRequest) -> Result<BuiltPrompt> {
        request.validate()?;

        let system_instruction = self.system_instruction(request.question_count, request.difficulty);
        let parts = self.content_parts(request);

        tracing::debug!(
            "提示词构建完成: 系统指令 {} 字符, {} 个内容片段",
            system_instruction.chars().count(),
            parts.len()
        );

        Ok(BuiltPrompt {
            system_instruction,
            parts,
        })
    }

    fn system_instruction(&self, count: u8, difficulty: RequestedDifficulty) -> String {
        let language = &self.output_language;
        format!(
            r#"You are a professional AI teaching assistant who prepares lesson review quizzes.
Task: create {count} review questions in {language} based on the provided material.

{rubric}

Mandatory rules:
1. Language: 100% {language}.
2. Math: write every formula in LaTeX wrapped in $$...$$.
3. Vary the question kinds: multiple choice (mcq, exactly 4 options), true/false (tf), numeric answer (short).
4. Explanation (explanation): short and to the point, in {language}.
5. Selected level: {label}
6. The "difficultyLevel" field of every question must state that question's actual level.
7. Return only plain JSON that follows the schema."#,
            count = count,
            language = language,
            rubric = rubric(difficulty),
            label = difficulty.label(),
        )
    }

    fn content_parts(&self, request: &GenerationRequest) -> Vec<ContentPart> {
        let count = request.question_count;
        let label = request.difficulty.label();

        if request.has_documents() {
            let topic = if request.topic().is_empty() {
                DEFAULT_DOCUMENT_TOPIC
            } else {
                request.topic()
            };
            let mut parts: Vec<ContentPart> = request
                .documents
                .iter()
                .cloned()
                .map(ContentPart::Attachment)
                .collect();
            parts.push(ContentPart::Text(format!(
                "Analyse the documents and create {} {} questions about: {}",
                count, label, topic
            )));
            parts
        } else {
            vec![ContentPart::Text(format!(
                "Create {} {} questions about: {}",
                count,
                label,
                request.topic()
            ))]
        }
    }
}

/// 各难度的出题准则
pub fn rubric(difficulty: RequestedDifficulty) -> String {
    match difficulty.concrete() {
        Some(level) => level_rubric(level).to_string(),
        None => format!(
            r#"LEVEL: MIXED
- Combine all levels: {recall}, {comprehension}, {application}, {analysis}
- Distribution: 20% {recall}, 30% {comprehension}, 30% {application}, 20% {analysis}
- IMPORTANT: emit the questions in ASCENDING order of difficulty:
  + start with the {recall} questions (recall)
  + then {comprehension} (comprehension)
  + then {application} (application)
  + finally {analysis} (analysis)
- Keep the difficulty varied so the quiz assesses the whole range"#,
            recall = DifficultyLevel::Recall.label(),
            comprehension = DifficultyLevel::Comprehension.label(),
            application = DifficultyLevel::Application.label(),
            analysis = DifficultyLevel::Analysis.label(),
        ),
    }
}

fn level_rubric(level: DifficultyLevel) -> &'static str {
    match level {
        DifficultyLevel::Recall => {
            r#"LEVEL: RECALL (Remember)
- Questions ask the learner to recall or recognise basic information
- Forms: What is the definition of...? List the..., Which feature below...
- No reasoning needed, only memory
- The answer usually appears verbatim in the material"#
        }
        DifficultyLevel::Comprehension => {
            r#"LEVEL: COMPREHENSION (Understand)
- Questions ask the learner to explain, compare or distinguish concepts
- Forms: Explain why..., Compare A and B, What is the meaning of...
- Requires understanding the essence, not rote memory
- May be phrased differently from the material"#
        }
        DifficultyLevel::Application => {
            r#"LEVEL: APPLICATION (Apply)
- Questions ask the learner to apply knowledge to a concrete situation
- Forms: Apply the formula to compute..., In case X, what...
- Requires using theory to solve practical problems
- May include exercises or hypothetical situations"#
        }
        DifficultyLevel::Analysis => {
            r#"LEVEL: ANALYSIS (Analyze / Evaluate / Create)
- Questions ask for complex analysis, evaluation or synthesis
- Forms: Analyse the causes of..., Evaluate the pros and cons of..., Propose a solution...
- Combines several pieces of knowledge and critical thinking
- Complex, multi-step situations"#
        }
    }
}
