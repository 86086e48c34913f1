//! 生成服务客户端
//!
//! 封装与生成式模型 API 相关的调用逻辑。
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 兼容 OpenAI API 的服务（默认使用 Gemini 的 OpenAI 兼容接口）
//! - 返回结构通过 `response_format = json_schema` 随请求发送

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestMessageContentPartImage,
        ChatCompletionRequestMessageContentPartText, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, ChatCompletionRequestUserMessageContent,
        ChatCompletionRequestUserMessageContentPart, CreateChatCompletionRequestArgs, ImageDetail,
        ImageUrl, ResponseFormat, ResponseFormatJsonSchema,
    },
    Client,
};
use futures::future::BoxFuture;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::ProviderError;
use crate::models::SourceDocument;
use crate::services::prompt_builder::ContentPart;
use crate::services::schema::SCHEMA_NAME;

/// 一次生成调用的全部输入（不含模型和凭据）
#[derive(Debug, Clone, Copy)]
pub struct GenerationCall<'a> {
    pub system_instruction: &'a str,
    pub parts: &'a [ContentPart],
    pub schema: &'a Value,
    pub temperature: f32,
}

/// 生成服务端口
///
/// 对一个模型发起一次调用，返回原始文本。重试和回退由编排层负责，
/// 实现方不应在内部重试。
pub trait GenerationProvider: Send + Sync {
    fn generate<'a>(
        &'a self,
        model: &'a str,
        credential: &'a str,
        call: &'a GenerationCall<'a>,
    ) -> BoxFuture<'a, Result<String, ProviderError>>;
}

/// OpenAI 兼容接口的生成服务
pub struct OpenAiCompatibleProvider {
    api_base_url: String,
}

impl OpenAiCompatibleProvider {
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.api_base_url.clone())
    }

    async fn send(
        &self,
        model: &str,
        credential: &str,
        call: &GenerationCall<'_>,
    ) -> Result<String, ProviderError> {
        // 每次调用都用当前凭据创建客户端，凭据可能在两次尝试之间被更新
        let openai_config = OpenAIConfig::new()
            .with_api_key(credential)
            .with_api_base(&self.api_base_url);
        let client = Client::with_config(openai_config);

        let request = CreateChatCompletionRequestArgs::default()
            .model(model)
            .messages(build_messages(call)?)
            .temperature(call.temperature)
            .response_format(response_format(call.schema))
            .build()
            .map_err(|e| ProviderError::Build(e.to_string()))?;

        debug!("调用生成服务，模型: {}", model);

        let response = client.chat().create(request).await.map_err(|e| {
            warn!("生成服务调用失败 ({}): {}", model, e);
            ProviderError::request(model, e)
        })?;

        response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| ProviderError::EmptyResponse {
                model: model.to_string(),
            })
    }
}

impl GenerationProvider for OpenAiCompatibleProvider {
    fn generate<'a>(
        &'a self,
        model: &'a str,
        credential: &'a str,
        call: &'a GenerationCall<'a>,
    ) -> BoxFuture<'a, Result<String, ProviderError>> {
        Box::pin(self.send(model, credential, call))
    }
}

/// 构建消息列表：一条系统消息 + 一条多片段的用户消息
fn build_messages(call: &GenerationCall<'_>) -> Result<Vec<ChatCompletionRequestMessage>, ProviderError> {
    let system_msg = ChatCompletionRequestSystemMessageArgs::default()
        .content(call.system_instruction)
        .build()
        .map_err(|e| ProviderError::Build(e.to_string()))?;

    let content_parts: Vec<ChatCompletionRequestUserMessageContentPart> =
        call.parts.iter().map(to_content_part).collect();

    let user_msg = ChatCompletionRequestUserMessageArgs::default()
        .content(ChatCompletionRequestUserMessageContent::Array(content_parts))
        .build()
        .map_err(|e| ProviderError::Build(e.to_string()))?;

    Ok(vec![
        ChatCompletionRequestMessage::System(system_msg),
        ChatCompletionRequestMessage::User(user_msg),
    ])
}

fn to_content_part(part: &ContentPart) -> ChatCompletionRequestUserMessageContentPart {
    match part {
        ContentPart::Text(text) => text_part(text.clone()),
        ContentPart::Attachment(doc) if is_text_like(doc) => text_part(format!(
            "--- {} ---\n{}",
            doc.name,
            String::from_utf8_lossy(&doc.data)
        )),
        // 图片和 PDF 以 data URL 形式发送
        ContentPart::Attachment(doc) => {
            ChatCompletionRequestUserMessageContentPart::ImageUrl(
                ChatCompletionRequestMessageContentPartImage {
                    image_url: ImageUrl {
                        url: doc.to_data_url(),
                        detail: Some(ImageDetail::Auto),
                    },
                },
            )
        }
    }
}

fn text_part(text: String) -> ChatCompletionRequestUserMessageContentPart {
    ChatCompletionRequestUserMessageContentPart::Text(ChatCompletionRequestMessageContentPartText {
        text,
    })
}

fn is_text_like(doc: &SourceDocument) -> bool {
    doc.mime_type.starts_with("text/") || doc.mime_type == "application/json"
}

fn response_format(schema: &Value) -> ResponseFormat {
    ResponseFormat::JsonSchema {
        json_schema: ResponseFormatJsonSchema {
            description: Some("Array of quiz question records".to_string()),
            name: SCHEMA_NAME.to_string(),
            schema: Some(schema.clone()),
            strict: Some(false),
        },
    }
}
