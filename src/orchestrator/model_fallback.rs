//! 模型回退编排器 - 编排层
//!
//! 按优先级依次尝试模型列表，每个模型只调用一次，第一次成功即返回。
//!
//! ```text
//! 读取凭据（不存在 → MissingCredential，不消耗任何尝试）
//!     ↓
//! for model in models:
//!     重新读取凭据 → 调用生成服务 → 解析返回结构
//!     成功 → 返回；失败 → 记录原因，尝试下一个
//!     ↓
//! 全部失败 → GenerationExhausted(最后一个错误)
//! ```

use std::sync::Arc;

use tracing::{info, warn};

use crate::clients::{GenerationCall, GenerationProvider};
use crate::error::{ProviderError, QuizError, Result};
use crate::infrastructure::CredentialStore;
use crate::services::prompt_builder::BuiltPrompt;
use crate::services::schema::{parse_response, question_schema, RawQuestion};

/// 一次失败的尝试
#[derive(Debug)]
pub struct AttemptFailure {
    pub model: String,
    pub error: ProviderError,
}

/// 成功的回退结果
#[derive(Debug)]
pub struct FallbackOutcome {
    /// 成功返回结果的模型
    pub model: String,
    pub records: Vec<RawQuestion>,
    /// 成功之前失败的尝试，按尝试顺序
    pub failures: Vec<AttemptFailure>,
}

impl FallbackOutcome {
    /// 总尝试次数（含成功的那一次）
    pub fn attempts(&self) -> usize {
        self.failures.len() + 1
    }
}

/// 模型回退编排器
pub struct ModelFallback {
    provider: Arc<dyn GenerationProvider>,
    credentials: Arc<dyn CredentialStore>,
    models: Vec<String>,
    temperature: f32,
}

impl ModelFallback {
    pub fn new(
        provider: Arc<dyn GenerationProvider>,
        credentials: Arc<dyn CredentialStore>,
        models: Vec<String>,
        temperature: f32,
    ) -> Self {
        Self {
            provider,
            credentials,
            models,
            temperature,
        }
    }

    pub fn models(&self) -> &[String] {
        &self.models
    }

    /// 依次尝试每个模型
    pub async fn run(&self, prompt: &BuiltPrompt) -> Result<FallbackOutcome> {
        self.credential()?;

        let schema = question_schema();
        let call = GenerationCall {
            system_instruction: &prompt.system_instruction,
            parts: &prompt.parts,
            schema: &schema,
            temperature: self.temperature,
        };

        let total = self.models.len();
        let mut failures: Vec<AttemptFailure> = Vec::new();

        for (i, model) in self.models.iter().enumerate() {
            // 凭据可能在两次尝试之间被修改或清除
            let credential = self.credential()?;

            info!("🤖 尝试模型 [{}/{}]: {}", i + 1, total, model);

            match self.attempt(model, &credential, &call).await {
                Ok(records) => {
                    info!("✅ 模型 {} 返回 {} 条记录", model, records.len());
                    return Ok(FallbackOutcome {
                        model: model.clone(),
                        records,
                        failures,
                    });
                }
                Err(error) => {
                    warn!("❌ 模型 {} 失败: {}", model, error);
                    failures.push(AttemptFailure {
                        model: model.clone(),
                        error,
                    });
                }
            }
        }

        let last_error = failures
            .last()
            .map(|f| f.error.to_string())
            .unwrap_or_else(|| "没有配置任何模型".to_string());
        Err(QuizError::GenerationExhausted {
            attempts: failures.len(),
            last_error,
        })
    }

    async fn attempt(
        &self,
        model: &str,
        credential: &str,
        call: &GenerationCall<'_>,
    ) -> std::result::Result<Vec<RawQuestion>, ProviderError> {
        let text = self.provider.generate(model, credential, call).await?;
        parse_response(&text).map_err(|source| ProviderError::MalformedOutput {
            model: model.to_string(),
            source,
        })
    }

    fn credential(&self) -> Result<String> {
        self.credentials
            .read()?
            .ok_or(QuizError::MissingCredential)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use futures::future::BoxFuture;
    use std::sync::Mutex;

    /// 前 `failures` 次调用失败，之后返回固定文本
    struct ScriptedProvider {
        failures: usize,
        reply: String,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedProvider {
        fn new(failures: usize, reply: &str) -> Self {
            Self {
                failures,
                reply: reply.to_string(),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl GenerationProvider for ScriptedProvider {
        fn generate<'a>(
            &'a self,
            model: &'a str,
            _credential: &'a str,
            _call: &'a GenerationCall<'a>,
        ) -> BoxFuture<'a, std::result::Result<String, ProviderError>> {
            Box::pin(async move {
                let mut calls = self.calls.lock().unwrap();
                calls.push(model.to_string());
                if calls.len() <= self.failures {
                    Err(ProviderError::request(model, "503 model overloaded"))
                } else {
                    Ok(self.reply.clone())
                }
            })
        }
    }

    struct FixedCredential(Option<&'static str>);

    impl CredentialStore for FixedCredential {
        fn read(&self) -> std::result::Result<Option<String>, StorageError> {
            Ok(self.0.map(str::to_string))
        }

        fn write(&self, _credential: &str) -> std::result::Result<(), StorageError> {
            Ok(())
        }
    }

    fn models() -> Vec<String> {
        vec!["m1".into(), "m2".into(), "m3".into()]
    }

    fn prompt() -> BuiltPrompt {
        BuiltPrompt {
            system_instruction: "system".to_string(),
            parts: Vec::new(),
        }
    }

    fn fallback(provider: Arc<ScriptedProvider>, credential: Option<&'static str>) -> ModelFallback {
        ModelFallback::new(provider, Arc::new(FixedCredential(credential)), models(), 0.4)
    }

    #[tokio::test]
    async fn test_first_success_stops() {
        let provider = Arc::new(ScriptedProvider::new(0, r#"[{"id": 1}]"#));
        let outcome = fallback(provider.clone(), Some("key")).run(&prompt()).await.unwrap();

        assert_eq!(outcome.model, "m1");
        assert_eq!(outcome.attempts(), 1);
        assert_eq!(provider.calls(), vec!["m1"]);
    }

    #[tokio::test]
    async fn test_falls_back_in_order() {
        let provider = Arc::new(ScriptedProvider::new(2, "[]"));
        let outcome = fallback(provider.clone(), Some("key")).run(&prompt()).await.unwrap();

        assert_eq!(outcome.model, "m3");
        assert_eq!(outcome.attempts(), 3);
        assert_eq!(provider.calls(), vec!["m1", "m2", "m3"]);
        assert_eq!(outcome.failures[0].model, "m1");
    }

    #[tokio::test]
    async fn test_malformed_output_counts_as_failure() {
        let provider = Arc::new(ScriptedProvider::new(0, "xin lỗi, tôi không thể"));
        let err = fallback(provider.clone(), Some("key"))
            .run(&prompt())
            .await
            .unwrap_err();

        match err {
            QuizError::GenerationExhausted {
                attempts,
                last_error,
            } => {
                assert_eq!(attempts, 3);
                assert!(last_error.contains("m3"));
            }
            other => panic!("意外的错误: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_credential_makes_no_attempt() {
        let provider = Arc::new(ScriptedProvider::new(0, "[]"));
        let err = fallback(provider.clone(), None).run(&prompt()).await.unwrap_err();

        assert!(matches!(err, QuizError::MissingCredential));
        assert!(provider.calls().is_empty());
    }
}
