use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

use crate::error::{QuizError, Result};
use crate::models::difficulty::RequestedDifficulty;

/// 单次出题数量下限
pub const MIN_QUESTION_COUNT: u8 = 1;
/// 单次出题数量上限
pub const MAX_QUESTION_COUNT: u8 = 20;

/// 用户上传的资料（按上传顺序发送给模型）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    /// 文件名，仅用于日志
    pub name: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl SourceDocument {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            data,
        }
    }

    /// 编码为 `data:` URL，作为附件内容发送
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, BASE64.encode(&self.data))
    }
}

/// 出题请求
///
/// 由调用方持有，使用后即丢弃。
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// 主题；提供了资料时可以为空
    pub topic: String,
    pub documents: Vec<SourceDocument>,
    pub question_count: u8,
    pub difficulty: RequestedDifficulty,
}

impl GenerationRequest {
    pub fn new(topic: impl Into<String>, question_count: u8, difficulty: RequestedDifficulty) -> Self {
        Self {
            topic: topic.into(),
            documents: Vec::new(),
            question_count,
            difficulty,
        }
    }

    pub fn with_documents(mut self, documents: Vec<SourceDocument>) -> Self {
        self.documents = documents;
        self
    }

    /// 去掉首尾空白后的主题
    pub fn topic(&self) -> &str {
        self.topic.trim()
    }

    pub fn has_documents(&self) -> bool {
        !self.documents.is_empty()
    }

    /// 校验请求，必须在调用生成服务之前完成
    pub fn validate(&self) -> Result<()> {
        if self.topic().is_empty() && !self.has_documents() {
            return Err(QuizError::invalid_request("请输入主题或上传资料"));
        }
        if !(MIN_QUESTION_COUNT..=MAX_QUESTION_COUNT).contains(&self.question_count) {
            return Err(QuizError::invalid_request(format!(
                "题目数量必须在 {} 到 {} 之间，当前为 {}",
                MIN_QUESTION_COUNT, MAX_QUESTION_COUNT, self.question_count
            )));
        }
        if let Some(doc) = self.documents.iter().find(|d| d.data.is_empty()) {
            return Err(QuizError::invalid_request(format!("资料 {} 是空文件", doc.name)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_topic_without_documents_rejected() {
        let request = GenerationRequest::new("   ", 10, RequestedDifficulty::Mixed);
        assert!(matches!(request.validate(), Err(QuizError::InvalidRequest(_))));
    }

    #[test]
    fn test_documents_alone_are_enough() {
        let request = GenerationRequest::new("", 5, RequestedDifficulty::Recall)
            .with_documents(vec![SourceDocument::new("a.txt", "text/plain", b"abc".to_vec())]);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_question_count_bounds() {
        for count in [0, 21] {
            let request = GenerationRequest::new("Hóa học", count, RequestedDifficulty::Mixed);
            assert!(request.validate().is_err(), "count {} should be rejected", count);
        }
        for count in [1, 20] {
            let request = GenerationRequest::new("Hóa học", count, RequestedDifficulty::Mixed);
            assert!(request.validate().is_ok());
        }
    }

    #[test]
    fn test_data_url() {
        let doc = SourceDocument::new("a.txt", "text/plain", b"hi".to_vec());
        assert_eq!(doc.to_data_url(), "data:text/plain;base64,aGk=");
    }
}
