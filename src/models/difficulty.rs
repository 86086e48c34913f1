//! 题目难度（认知层级）

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// 单道题目的认知层级
///
/// 排序即难度顺序：识记 < 理解 < 应用 < 分析。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyLevel {
    /// 识记
    Recall,
    /// 理解
    Comprehension,
    /// 应用
    Application,
    /// 分析 / 综合应用
    Analysis,
}

impl DifficultyLevel {
    /// 全部层级，按难度升序
    pub const ALL: [DifficultyLevel; 4] = [
        DifficultyLevel::Recall,
        DifficultyLevel::Comprehension,
        DifficultyLevel::Application,
        DifficultyLevel::Analysis,
    ];

    /// 层级序号（1 开始），混合模式排序使用
    pub fn rank(self) -> u8 {
        match self {
            DifficultyLevel::Recall => 1,
            DifficultyLevel::Comprehension => 2,
            DifficultyLevel::Application => 3,
            DifficultyLevel::Analysis => 4,
        }
    }

    /// 线上协议中的标签
    pub fn as_str(self) -> &'static str {
        match self {
            DifficultyLevel::Recall => "recall",
            DifficultyLevel::Comprehension => "comprehension",
            DifficultyLevel::Application => "application",
            DifficultyLevel::Analysis => "analysis",
        }
    }

    /// 显示名称
    pub fn label(self) -> &'static str {
        match self {
            DifficultyLevel::Recall => "Recall",
            DifficultyLevel::Comprehension => "Comprehension",
            DifficultyLevel::Application => "Application",
            DifficultyLevel::Analysis => "Analysis",
        }
    }
}

impl fmt::Display for DifficultyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 出题请求中的难度
///
/// `Mixed` 只是请求时的指令，生成的每道题都必须落在某个具体层级上。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestedDifficulty {
    Recall,
    Comprehension,
    Application,
    Analysis,
    #[default]
    Mixed,
}

impl RequestedDifficulty {
    /// 对应的具体层级；混合模式返回 `None`
    pub fn concrete(self) -> Option<DifficultyLevel> {
        match self {
            RequestedDifficulty::Recall => Some(DifficultyLevel::Recall),
            RequestedDifficulty::Comprehension => Some(DifficultyLevel::Comprehension),
            RequestedDifficulty::Application => Some(DifficultyLevel::Application),
            RequestedDifficulty::Analysis => Some(DifficultyLevel::Analysis),
            RequestedDifficulty::Mixed => None,
        }
    }

    pub fn is_mixed(self) -> bool {
        self == RequestedDifficulty::Mixed
    }

    pub fn as_str(self) -> &'static str {
        match self.concrete() {
            Some(level) => level.as_str(),
            None => "mixed",
        }
    }

    /// 显示名称
    pub fn label(self) -> &'static str {
        match self.concrete() {
            Some(level) => level.label(),
            None => "Mixed levels",
        }
    }
}

impl From<DifficultyLevel> for RequestedDifficulty {
    fn from(level: DifficultyLevel) -> Self {
        match level {
            DifficultyLevel::Recall => RequestedDifficulty::Recall,
            DifficultyLevel::Comprehension => RequestedDifficulty::Comprehension,
            DifficultyLevel::Application => RequestedDifficulty::Application,
            DifficultyLevel::Analysis => RequestedDifficulty::Analysis,
        }
    }
}

impl fmt::Display for RequestedDifficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestedDifficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "recall" => Ok(RequestedDifficulty::Recall),
            "comprehension" => Ok(RequestedDifficulty::Comprehension),
            "application" => Ok(RequestedDifficulty::Application),
            "analysis" => Ok(RequestedDifficulty::Analysis),
            "mixed" => Ok(RequestedDifficulty::Mixed),
            other => Err(format!(
                "未知的难度 '{}'，可选: recall, comprehension, application, analysis, mixed",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_matches_ordering() {
        let ranks: Vec<u8> = DifficultyLevel::ALL.iter().map(|l| l.rank()).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4]);
        assert!(DifficultyLevel::Recall < DifficultyLevel::Analysis);
    }

    #[test]
    fn test_requested_difficulty_parse() {
        assert_eq!("Mixed".parse::<RequestedDifficulty>(), Ok(RequestedDifficulty::Mixed));
        assert_eq!(
            " analysis ".parse::<RequestedDifficulty>(),
            Ok(RequestedDifficulty::Analysis)
        );
        assert!("hard".parse::<RequestedDifficulty>().is_err());
    }

    #[test]
    fn test_mixed_has_no_concrete_level() {
        assert_eq!(RequestedDifficulty::Mixed.concrete(), None);
        assert_eq!(
            RequestedDifficulty::Application.concrete(),
            Some(DifficultyLevel::Application)
        );
    }

    #[test]
    fn test_level_wire_tags() {
        let json = serde_json::to_string(&DifficultyLevel::Comprehension).unwrap();
        assert_eq!(json, "\"comprehension\"");
        let level: DifficultyLevel = serde_json::from_str("\"analysis\"").unwrap();
        assert_eq!(level, DifficultyLevel::Analysis);
    }
}
