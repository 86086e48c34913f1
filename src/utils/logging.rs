/// 日志工具模块
///
/// 提供日志初始化以及格式化输出的辅助函数
use std::time::Duration;

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// 初始化日志
///
/// `RUST_LOG` 优先；否则默认 `info`，详细模式下为 `debug`。
/// 重复调用是安全的（测试中可能多次初始化）。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息（不包含凭据）
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!(
        "🚀 quizgen 启动 - {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("🌐 接口地址: {}", config.api_base_url);
    info!("🤖 模型顺序: {}", config.models.join(" → "));
    info!("📂 数据目录: {}", config.data_dir.display());
    info!("{}", "=".repeat(60));
}

/// 记录一次成功生成的统计
///
/// # 参数
/// - `model`: 最终成功的模型
/// - `attempts`: 总尝试次数
/// - `questions`: 题目数量
/// - `elapsed`: 耗时
pub fn log_generation_complete(model: &str, attempts: usize, questions: usize, elapsed: Duration) {
    info!("{}", "─".repeat(60));
    info!("✓ 出题完成: {} 道题目", questions);
    info!("🤖 模型: {} (第 {} 次尝试)", model, attempts);
    info!("⏱️ 耗时: {:.1} 秒", elapsed.as_secs_f64());
    info!("{}", "─".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_counts_chars_not_bytes() {
        assert_eq!(truncate_text("Quang hợp", 20), "Quang hợp");
        assert_eq!(truncate_text("Điện trở", 4), "Điện...");
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init(false);
        init(true);
    }
}
