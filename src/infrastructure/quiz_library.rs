//! 题库存储
//!
//! 保存过的题目集合，JSON 文件存储，最新的记录排在最前面。
//! 没有事务和锁，最后写入者生效。

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use rand::Rng;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::StorageError;
use crate::models::{QuizExport, RecordUpdate, RequestedDifficulty, SavedQuizRecord};

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_SUFFIX_LEN: usize = 9;

/// 题库端口
pub trait QuizLibrary: Send + Sync {
    /// 追加一条记录（放在最前面）
    fn append(&self, record: SavedQuizRecord) -> Result<(), StorageError>;

    /// 全部记录，最新的在前
    fn list(&self) -> Result<Vec<SavedQuizRecord>, StorageError>;

    fn get(&self, id: &str) -> Result<Option<SavedQuizRecord>, StorageError>;

    /// 删除记录，不存在时返回 `RecordNotFound`
    fn delete(&self, id: &str) -> Result<(), StorageError>;

    /// 部分更新，返回更新后的记录
    fn update(&self, id: &str, update: RecordUpdate) -> Result<SavedQuizRecord, StorageError>;
}

/// 生成记录 id：`quiz_<毫秒时间戳>_<9 位 base36 随机串>`
pub fn new_record_id() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect();
    format!("quiz_{}_{}", Utc::now().timestamp_millis(), suffix)
}

/// 为一次成功的生成创建题库记录
pub fn new_record(
    name: impl Into<String>,
    topic: impl Into<String>,
    difficulty: RequestedDifficulty,
    quiz: QuizExport,
) -> SavedQuizRecord {
    SavedQuizRecord {
        id: new_record_id(),
        name: name.into(),
        topic: topic.into(),
        difficulty,
        question_count: quiz.len(),
        quiz,
        created_at: Utc::now(),
    }
}

/// JSON 文件题库
pub struct JsonFileLibrary {
    path: PathBuf,
}

impl JsonFileLibrary {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.library_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 读取全部记录；文件不存在或内容损坏时视为空题库
    fn load(&self) -> Vec<SavedQuizRecord> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                warn!("⚠️ 无法读取题库 {}: {}，按空题库处理", self.path.display(), e);
                return Vec::new();
            }
        };

        serde_json::from_str(&content).unwrap_or_else(|e| {
            warn!("⚠️ 题库文件已损坏 {}: {}，按空题库处理", self.path.display(), e);
            Vec::new()
        })
    }

    fn save(&self, records: &[SavedQuizRecord]) -> Result<(), StorageError> {
        let write_failed = |source| StorageError::WriteFailed {
            path: self.path.clone(),
            source,
        };
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(write_failed)?;
        }
        let json = serde_json::to_string_pretty(records)?;
        fs::write(&self.path, json).map_err(write_failed)
    }
}

impl QuizLibrary for JsonFileLibrary {
    fn append(&self, record: SavedQuizRecord) -> Result<(), StorageError> {
        let mut records = self.load();
        info!("📚 保存到题库: {} ({} 题)", record.name, record.question_count);
        records.insert(0, record);
        self.save(&records)
    }

    fn list(&self) -> Result<Vec<SavedQuizRecord>, StorageError> {
        Ok(self.load())
    }

    fn get(&self, id: &str) -> Result<Option<SavedQuizRecord>, StorageError> {
        Ok(self.load().into_iter().find(|r| r.id == id))
    }

    fn delete(&self, id: &str) -> Result<(), StorageError> {
        let mut records = self.load();
        let before = records.len();
        records.retain(|r| r.id != id);
        if records.len() == before {
            return Err(StorageError::RecordNotFound(id.to_string()));
        }
        self.save(&records)?;
        info!("🗑️ 已从题库删除: {}", id);
        Ok(())
    }

    fn update(&self, id: &str, update: RecordUpdate) -> Result<SavedQuizRecord, StorageError> {
        let mut records = self.load();
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| StorageError::RecordNotFound(id.to_string()))?;
        update.apply(record);
        let updated = record.clone();
        self.save(&records)?;
        Ok(updated)
    }
}
