//! 业务能力层（Services）
//!
//! 每个服务只描述"我能做什么"，不关心流程顺序：
//!
//! - `prompt_builder` - 把出题请求变成系统指令和内容片段
//! - `schema` - 返回结构约定，以及原始返回文本的解析
//! - `normalizer` - 原始记录的规范化、丢弃和按难度排序
//! - `exporter` - 生成可独立运行的 HTML 播放器页面

pub mod exporter;
pub mod normalizer;
pub mod prompt_builder;
pub mod schema;

pub use exporter::{extract_questions, extract_quiz, HtmlExporter};
pub use normalizer::{normalize, order_by_level};
pub use prompt_builder::{BuiltPrompt, ContentPart, PromptBuilder};
pub use schema::{parse_response, question_schema, RawQuestion};
