use std::path::Path;

use tokio::fs;

use crate::error::{QuizError, Result};
use crate::models::request::SourceDocument;

/// 根据扩展名推断 MIME 类型
pub fn mime_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "txt" => "text/plain",
        "md" => "text/markdown",
        "html" | "htm" => "text/html",
        "csv" => "text/csv",
        "json" => "application/json",
        _ => return None,
    };
    Some(mime)
}

/// 读取单个资料文件
pub async fn load_document(path: &Path) -> Result<SourceDocument> {
    let mime_type = mime_type_for(path).ok_or_else(|| {
        QuizError::invalid_request(format!("不支持的资料格式: {}", path.display()))
    })?;

    let data = fs::read(path).await.map_err(|e| {
        QuizError::invalid_request(format!("无法读取资料 {}: {}", path.display(), e))
    })?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());

    tracing::info!("📄 已加载资料: {} ({}, {} 字节)", name, mime_type, data.len());

    Ok(SourceDocument::new(name, mime_type, data))
}

/// 按给定顺序读取所有资料文件，任一失败即整体失败
pub async fn load_documents<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<SourceDocument>> {
    let mut documents = Vec::with_capacity(paths.len());
    for path in paths {
        documents.push(load_document(path.as_ref()).await?);
    }
    Ok(documents)
}
