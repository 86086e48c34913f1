//! API 凭据存储
//!
//! 单个字符串值，最后写入者生效。生成流程在每次调用模型前都会重新读取。

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::Config;
use crate::error::StorageError;

/// 覆盖凭据文件的环境变量
pub const CREDENTIAL_ENV_VAR: &str = "QUIZGEN_API_KEY";

/// 凭据存储端口
pub trait CredentialStore: Send + Sync {
    /// 读取凭据；空白视为不存在
    fn read(&self) -> Result<Option<String>, StorageError>;

    /// 写入凭据
    fn write(&self, credential: &str) -> Result<(), StorageError>;
}

/// 文件凭据存储
///
/// 设置了环境变量时，环境变量优先于文件；写入只影响文件。
pub struct FileCredentialStore {
    path: PathBuf,
    env_override: Option<String>,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            env_override: None,
        }
    }

    /// 使用配置中的凭据文件路径，并叠加 `QUIZGEN_API_KEY`
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.credential_path()).with_override(std::env::var(CREDENTIAL_ENV_VAR).ok())
    }

    pub fn with_override(mut self, value: Option<String>) -> Self {
        self.env_override = value.and_then(non_blank);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for FileCredentialStore {
    fn read(&self) -> Result<Option<String>, StorageError> {
        if let Some(value) = &self.env_override {
            debug!("使用环境变量 {} 中的凭据", CREDENTIAL_ENV_VAR);
            return Ok(Some(value.clone()));
        }

        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(non_blank(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::ReadFailed {
                path: self.path.clone(),
                source,
            }),
        }
    }

    fn write(&self, credential: &str) -> Result<(), StorageError> {
        let write_failed = |source| StorageError::WriteFailed {
            path: self.path.clone(),
            source,
        };
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(write_failed)?;
        }
        fs::write(&self.path, credential.trim()).map_err(write_failed)?;

        info!("🔑 凭据已保存到 {}", self.path.display());
        Ok(())
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
