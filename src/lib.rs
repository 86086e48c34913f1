//! # quizgen
//!
//! 把主题或教学资料交给生成式模型出题，并打包成可离线游玩的单文件 HTML 测验
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有本地持久化资源，只暴露端口
//! - `CredentialStore` - API 凭据读写
//! - `QuizLibrary` - 题库的追加、列出、读取、删除、更新
//!
//! ### ② 客户端层（Clients）
//! - `clients/` - `GenerationProvider` 端口及 OpenAI 兼容实现
//!
//! ### ③ 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `PromptBuilder` - 系统指令与内容片段
//! - `schema` - 返回结构约定与解析
//! - `normalizer` - 规范化、丢弃无效记录、混合难度排序
//! - `HtmlExporter` - 独立 HTML 播放器的导出与读回
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/model_fallback` - 按顺序尝试模型，第一次成功即返回
//! - `orchestrator/quiz_generator` - 完整的出题流程
//!
//! ### ⑤ 播放器（Player）
//! - `player/` - 纯同步的答题状态机，HTML 播放器与终端预览共用同一套规则
//!
//! ## 模块结构

pub mod app;
pub mod cli;
pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod player;
pub mod services;
pub mod utils;

// 重新导出常用类型
pub use clients::{GenerationCall, GenerationProvider, OpenAiCompatibleProvider};
pub use config::Config;
pub use error::{ProviderError, QuizError, Result};
pub use infrastructure::{CredentialStore, FileCredentialStore, JsonFileLibrary, QuizLibrary};
pub use models::{
    AnswerKey, DifficultyLevel, GenerationRequest, QuizExport, QuizQuestion, QuizSettings,
    RequestedDifficulty, SavedQuizRecord, SourceDocument,
};
pub use orchestrator::{ModelFallback, QuizGenerator};
pub use player::{Candidate, PlayerState, QuizPlayer, QuizResult, ResultTier};
pub use services::{extract_questions, HtmlExporter, PromptBuilder};
