//! 结算结果与评价等级

use std::fmt;

use serde::Serialize;

/// 评价等级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultTier {
    /// 100%
    Flawless,
    /// 80% - 99%
    High,
    /// 50% - 79%
    Pass,
    /// 50% 以下
    Retry,
}

impl ResultTier {
    /// 下界包含在内：80 属于 High，50 属于 Pass
    pub fn from_percent(percent: u8) -> Self {
        match percent {
            100.. => ResultTier::Flawless,
            80..=99 => ResultTier::High,
            50..=79 => ResultTier::Pass,
            _ => ResultTier::Retry,
        }
    }

    /// 是否播放庆祝效果
    pub fn celebrates(self) -> bool {
        matches!(self, ResultTier::Flawless | ResultTier::High)
    }

    pub fn title(self) -> &'static str {
        match self {
            ResultTier::Flawless => "XUẤT SẮC!",
            ResultTier::High => "QUÁ ĐỈNH!",
            ResultTier::Pass => "LÀM TỐT!",
            ResultTier::Retry => "CỐ LÊN!",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            ResultTier::Flawless => "Không sai câu nào!",
            ResultTier::High => "Kiến thức rất vững vàng!",
            ResultTier::Pass => "Cố gắng thêm một chút nữa nhé!",
            ResultTier::Retry => "Hãy ôn lại bài và thử lại nhé.",
        }
    }
}

/// 一次游玩的结算
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuizResult {
    pub score: usize,
    pub total: usize,
    /// `round(100 * score / total)`，题目数为 0 时为 0
    pub percent: u8,
    pub tier: ResultTier,
}

impl QuizResult {
    pub fn new(score: usize, total: usize) -> Self {
        let percent = if total == 0 {
            0
        } else {
            (100.0 * score.min(total) as f64 / total as f64).round() as u8
        };
        Self {
            score,
            total,
            percent,
            tier: ResultTier::from_percent(percent),
        }
    }

    pub fn celebrates(&self) -> bool {
        self.tier.celebrates()
    }
}

impl fmt::Display for QuizResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}/{} ({}%) - {}",
            self.tier.title(),
            self.score,
            self.total,
            self.percent,
            self.tier.message()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_bounds() {
        assert_eq!(ResultTier::from_percent(100), ResultTier::Flawless);
        assert_eq!(ResultTier::from_percent(99), ResultTier::High);
        assert_eq!(ResultTier::from_percent(80), ResultTier::High);
        assert_eq!(ResultTier::from_percent(79), ResultTier::Pass);
        assert_eq!(ResultTier::from_percent(50), ResultTier::Pass);
        assert_eq!(ResultTier::from_percent(49), ResultTier::Retry);
        assert_eq!(ResultTier::from_percent(0), ResultTier::Retry);
    }

    #[test]
    fn test_percent_rounding() {
        assert_eq!(QuizResult::new(2, 3).percent, 67);
        assert_eq!(QuizResult::new(1, 3).percent, 33);
        assert_eq!(QuizResult::new(1, 8).percent, 13);
        assert_eq!(QuizResult::new(0, 0).percent, 0);
    }

    #[test]
    fn test_celebration_only_for_top_tiers() {
        assert!(QuizResult::new(1, 1).celebrates());
        assert!(QuizResult::new(4, 5).celebrates());
        assert!(!QuizResult::new(3, 5).celebrates());
        assert!(!QuizResult::new(0, 5).celebrates());
    }
}
