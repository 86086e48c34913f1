//! 出题流程 - 编排层
//!
//! 一次完整的生成：校验请求 → 构建提示词 → 模型回退 → 规范化排序 → 生成快照。
//! 任一步失败都不会返回部分结果。

use std::sync::Arc;
use std::time::Instant;

use tracing::info;

use crate::clients::GenerationProvider;
use crate::config::Config;
use crate::error::Result;
use crate::infrastructure::CredentialStore;
use crate::models::{GenerationRequest, QuizExport, QuizSettings};
use crate::orchestrator::model_fallback::ModelFallback;
use crate::services::normalizer::normalize;
use crate::services::prompt_builder::PromptBuilder;
use crate::utils::logging::{log_generation_complete, truncate_text};

/// 出题流程
pub struct QuizGenerator {
    builder: PromptBuilder,
    fallback: ModelFallback,
}

impl QuizGenerator {
    pub fn new(
        config: &Config,
        provider: Arc<dyn GenerationProvider>,
        credentials: Arc<dyn CredentialStore>,
    ) -> Self {
        Self {
            builder: PromptBuilder::new(config.output_language.clone()),
            fallback: ModelFallback::new(
                provider,
                credentials,
                config.models.clone(),
                config.temperature,
            ),
        }
    }

    /// 生成一套题目
    pub async fn generate(
        &self,
        request: &GenerationRequest,
        settings: QuizSettings,
    ) -> Result<QuizExport> {
        // 校验必须在任何网络调用之前
        request.validate()?;

        let started = Instant::now();
        info!(
            "📝 开始出题: 主题 '{}' | {} 份资料 | {} 题 | {}",
            truncate_text(request.topic(), 40),
            request.documents.len(),
            request.question_count,
            request.difficulty.label()
        );

        let prompt = self.builder.build(request)?;
        let outcome = self.fallback.run(&prompt).await?;
        let attempts = outcome.attempts();
        let model = outcome.model;

        let questions = normalize(outcome.records, request.difficulty)?;
        let quiz = QuizExport::new(questions, settings)?;

        log_generation_complete(&model, attempts, quiz.len(), started.elapsed());
        Ok(quiz)
    }
}
