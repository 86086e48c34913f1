//! 错误类型
//!
//! 生成流程只向外暴露一个错误类型 [`QuizError`]；单次模型调用的失败
//! 用 [`ProviderError`] 表示，它只在回退编排器内部流转。

use std::path::PathBuf;

/// 应用程序结果类型
pub type Result<T> = std::result::Result<T, QuizError>;

/// 应用程序错误类型
#[derive(Debug, thiserror::Error)]
pub enum QuizError {
    /// 请求不合法（主题和资料都为空、题目数量越界、资料不可读）
    #[error("请求无效: {0}")]
    InvalidRequest(String),

    /// 没有可用的 API 凭据
    #[error("API key 不存在，请先使用 `quizgen set-key` 设置")]
    MissingCredential,

    /// 所有模型都尝试失败
    #[error("无法生成题目（已尝试 {attempts} 个模型），最后一个错误: {last_error}")]
    GenerationExhausted {
        /// 实际尝试的模型数量
        attempts: usize,
        /// 最后一次失败的原因
        last_error: String,
    },

    /// 生成"成功"但没有任何可用题目
    #[error("生成结果中没有可用的题目")]
    EmptyQuiz,

    /// 本地存储错误
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// 导出错误
    #[error(transparent)]
    Export(#[from] ExportError),

    /// 配置错误
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// 单次模型调用的失败原因
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// 网络或服务端错误（凭据无效、配额用尽等）
    #[error("模型 {model} 调用失败: {message}")]
    Request { model: String, message: String },

    /// 服务返回了空内容
    #[error("模型 {model} 返回内容为空")]
    EmptyResponse { model: String },

    /// 返回内容不是符合约定的 JSON 数组
    #[error("模型 {model} 返回的内容无法解析: {source}")]
    MalformedOutput {
        model: String,
        #[source]
        source: serde_json::Error,
    },

    /// 请求本身构建失败
    #[error("构建请求失败: {0}")]
    Build(String),
}

/// 本地存储错误（凭据文件、题库文件）
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("序列化失败: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("题库中不存在 id 为 {0} 的记录")]
    RecordNotFound(String),
}

/// 导出错误
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("写入导出文件失败 ({path}): {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("导出文件中找不到题目数据")]
    MissingQuizData,

    #[error("导出文件中的题目数据无法解析: {0}")]
    InvalidQuizData(#[from] serde_json::Error),
}

/// 配置错误
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("读取配置文件失败 ({path}): {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("配置文件解析失败 ({path}): {source}")]
    FileParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("模型列表为空，至少需要配置一个模型")]
    NoModels,
}

// ========== 便捷构造函数 ==========

impl QuizError {
    /// 创建请求无效错误
    pub fn invalid_request(message: impl Into<String>) -> Self {
        QuizError::InvalidRequest(message.into())
    }

    /// 是否是用户可以自行修正的错误
    pub fn is_user_correctable(&self) -> bool {
        matches!(
            self,
            QuizError::InvalidRequest(_) | QuizError::MissingCredential
        )
    }
}

impl ProviderError {
    /// 创建模型调用失败错误
    pub fn request(model: impl Into<String>, source: impl std::fmt::Display) -> Self {
        ProviderError::Request {
            model: model.into(),
            message: source.to_string(),
        }
    }
}
