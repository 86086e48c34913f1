use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

use crate::error::ConfigError;

/// 默认配置文件名
pub const CONFIG_FILE_NAME: &str = "quizgen.toml";

/// 程序配置
///
/// 加载顺序：默认值 → TOML 配置文件 → 环境变量，后者覆盖前者。
#[derive(Clone, Debug)]
pub struct Config {
    // --- 生成服务配置 ---
    /// OpenAI 兼容接口地址
    pub api_base_url: String,
    /// 按优先级排列的模型列表
    pub models: Vec<String>,
    /// 采样温度
    pub temperature: f32,
    /// 题目输出语言
    pub output_language: String,
    // --- 本地存储 ---
    /// 凭据和题库所在目录
    pub data_dir: PathBuf,
    /// 导出文件名
    pub export_file_name: String,
    // --- 默认出题参数 ---
    pub default_question_count: u8,
    pub default_timer_seconds: u32,
    pub default_sound: bool,
    /// 倒计时结束时是否强制交卷
    pub submit_on_expiry: bool,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "https://generativelanguage.googleapis.com/v1beta/openai".to_string(),
            models: vec![
                "gemini-3-flash-preview".to_string(),
                "gemini-3-pro-preview".to_string(),
                "gemini-2.5-flash".to_string(),
            ],
            temperature: 0.4,
            output_language: "Vietnamese".to_string(),
            data_dir: PathBuf::from(".quizgen"),
            export_file_name: "bai-kiem-tra-game.html".to_string(),
            default_question_count: 10,
            default_timer_seconds: 0,
            default_sound: true,
            submit_on_expiry: false,
            verbose_logging: false,
        }
    }
}

/// 配置文件中的可选字段
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    api_base_url: Option<String>,
    models: Option<Vec<String>>,
    temperature: Option<f32>,
    output_language: Option<String>,
    data_dir: Option<PathBuf>,
    export_file_name: Option<String>,
    default_question_count: Option<u8>,
    default_timer_seconds: Option<u32>,
    default_sound: Option<bool>,
    submit_on_expiry: Option<bool>,
    verbose_logging: Option<bool>,
}

impl Config {
    /// 按 默认值 → 配置文件 → 环境变量 的顺序加载配置
    ///
    /// 配置文件路径取自 `QUIZGEN_CONFIG`，否则使用当前目录下的 `quizgen.toml`（不存在则跳过）。
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// 同 [`Config::load`]，但显式指定的配置文件必须存在
    pub fn load_from(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => {
                let path = std::env::var("QUIZGEN_CONFIG")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from(CONFIG_FILE_NAME));
                if path.exists() {
                    Self::from_file(&path)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    /// 只使用默认值和环境变量
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env(|name| std::env::var(name).ok());
        config
    }

    /// 在默认值之上叠加 TOML 配置文件
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::FileParse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        let file: ConfigFile = toml::from_str(content)?;
        let default = Self::default();
        Ok(Self {
            api_base_url: file.api_base_url.unwrap_or(default.api_base_url),
            models: file.models.unwrap_or(default.models),
            temperature: file.temperature.unwrap_or(default.temperature),
            output_language: file.output_language.unwrap_or(default.output_language),
            data_dir: file.data_dir.unwrap_or(default.data_dir),
            export_file_name: file.export_file_name.unwrap_or(default.export_file_name),
            default_question_count: file
                .default_question_count
                .unwrap_or(default.default_question_count),
            default_timer_seconds: file
                .default_timer_seconds
                .unwrap_or(default.default_timer_seconds),
            default_sound: file.default_sound.unwrap_or(default.default_sound),
            submit_on_expiry: file.submit_on_expiry.unwrap_or(default.submit_on_expiry),
            verbose_logging: file.verbose_logging.unwrap_or(default.verbose_logging),
        })
    }

    /// 用环境变量覆盖配置；无法解析的值保留原值
    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(v) = var("QUIZGEN_API_BASE_URL") {
            self.api_base_url = v;
        }
        if let Some(v) = var("QUIZGEN_MODELS") {
            let models: Vec<String> = v
                .split(',')
                .map(|m| m.trim().to_string())
                .filter(|m| !m.is_empty())
                .collect();
            if !models.is_empty() {
                self.models = models;
            }
        }
        self.temperature = parse_var(&var, "QUIZGEN_TEMPERATURE").unwrap_or(self.temperature);
        if let Some(v) = var("QUIZGEN_OUTPUT_LANGUAGE") {
            self.output_language = v;
        }
        if let Some(v) = var("QUIZGEN_DATA_DIR") {
            self.data_dir = PathBuf::from(v);
        }
        if let Some(v) = var("QUIZGEN_EXPORT_FILE_NAME") {
            self.export_file_name = v;
        }
        self.default_question_count =
            parse_var(&var, "QUIZGEN_QUESTION_COUNT").unwrap_or(self.default_question_count);
        self.default_timer_seconds =
            parse_var(&var, "QUIZGEN_TIMER_SECONDS").unwrap_or(self.default_timer_seconds);
        self.default_sound = parse_var(&var, "QUIZGEN_SOUND").unwrap_or(self.default_sound);
        self.submit_on_expiry = parse_var(&var, "QUIZGEN_SUBMIT_ON_EXPIRY").unwrap_or(self.submit_on_expiry);
        self.verbose_logging = parse_var(&var, "QUIZGEN_VERBOSE").unwrap_or(self.verbose_logging);
    }

    /// 校验配置
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.models.is_empty() {
            return Err(ConfigError::NoModels);
        }
        Ok(())
    }

    /// 凭据文件路径
    pub fn credential_path(&self) -> PathBuf {
        self.data_dir.join("credential")
    }

    /// 题库文件路径
    pub fn library_path(&self) -> PathBuf {
        self.data_dir.join("library.json")
    }
}

/// 读取并解析一个环境变量，缺失或无法解析时返回 `None`
fn parse_var<T: FromStr>(var: &impl Fn(&str) -> Option<String>, name: &str) -> Option<T> {
    var(name).and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_models_in_priority_order() {
        let config = Config::default();
        assert_eq!(config.models[0], "gemini-3-flash-preview");
        assert_eq!(config.models.len(), 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_overrides_defaults() {
        let config = Config::from_toml_str(
            r#"
            models = ["model-a", "model-b"]
            temperature = 0.2
            default_timer_seconds = 300
            "#,
        )
        .unwrap();

        assert_eq!(config.models, vec!["model-a", "model-b"]);
        assert!((config.temperature - 0.2).abs() < f32::EPSILON);
        assert_eq!(config.default_timer_seconds, 300);
        // 未出现的字段保持默认值
        assert_eq!(config.export_file_name, "bai-kiem-tra-game.html");
    }

    #[test]
    fn test_malformed_toml_is_error() {
        assert!(Config::from_toml_str("models = [").is_err());
    }

    #[test]
    fn test_env_overrides_and_bad_values_ignored() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("QUIZGEN_MODELS", " m1 , ,m2 "),
            ("QUIZGEN_QUESTION_COUNT", "not-a-number"),
            ("QUIZGEN_SOUND", "false"),
            ("QUIZGEN_TEMPERATURE", "0.7"),
            ("QUIZGEN_TIMER_SECONDS", " 90 "),
            ("QUIZGEN_SUBMIT_ON_EXPIRY", "true"),
            ("QUIZGEN_VERBOSE", "yes"),
        ]);
        let mut config = Config::default();
        config.apply_env(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(config.models, vec!["m1", "m2"]);
        assert_eq!(config.default_question_count, 10);
        assert!(!config.default_sound);
        assert!((config.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(config.default_timer_seconds, 90);
        assert!(config.submit_on_expiry);
        // "yes" 不是合法的 bool
        assert!(!config.verbose_logging);
    }

    #[test]
    fn test_empty_model_list_rejected() {
        let config = Config {
            models: Vec::new(),
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::NoModels)));
    }
}
