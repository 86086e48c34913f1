//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `model_fallback` - 模型回退编排器
//! - 按优先级依次尝试模型，每个模型只尝试一次
//! - 每次尝试前重新读取凭据
//! - 记录每次失败的原因，全部失败时返回最后一个错误
//!
//! ### `quiz_generator` - 出题流程
//! - 串联校验、提示词构建、模型回退、规范化
//! - 只返回完整的题目快照，不返回部分结果
//!
//! ## 层次关系
//!
//! ```text
//! quiz_generator (GenerationRequest → QuizExport)
//!     ↓
//! model_fallback (BuiltPrompt → Vec<RawQuestion>)
//!     ↓
//! clients::GenerationProvider  +  infrastructure::CredentialStore
//! ```

pub mod model_fallback;
pub mod quiz_generator;

pub use model_fallback::{AttemptFailure, FallbackOutcome, ModelFallback};
pub use quiz_generator::QuizGenerator;
