//! 答题状态机
//!
//! 纯同步的状态归约：每个事件处理完（状态迁移 + 计分）才接受下一个事件。
//!
//! ```text
//! Question(0) --answer--> Feedback(0) --acknowledge--> Question(1) ... Feedback(N-1) --acknowledge--> Results
//!                                              tick(时间到 && 强制交卷) ----------------------------> Results
//! ```
//!
//! 当前状态下不合法的事件被忽略，不产生任何效果。

use std::time::Duration;

use tracing::debug;

use crate::error::{QuizError, Result};
use crate::models::{QuizExport, QuizQuestion, QuizSettings};
use crate::player::evaluate::{evaluate, Candidate};
use crate::player::result::QuizResult;

/// 状态
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayerState {
    /// 正在回答第 `index` 题
    Question { index: usize },
    /// 第 `index` 题已作答，显示解析，等待确认
    Feedback { index: usize, correct: bool },
    /// 终态
    Results(QuizResult),
}

/// 音效
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sound {
    Correct,
    Wrong,
    Win,
}

/// 需要宿主呈现的效果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// 只有开启音效时才会产生
    PlaySound(Sound),
    /// 彩带等庆祝效果
    Celebrate,
}

/// 播放器选项
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlayerOptions {
    pub settings: QuizSettings,
    /// 倒计时结束时直接结算
    pub submit_on_expiry: bool,
}

impl PlayerOptions {
    pub fn new(settings: QuizSettings, submit_on_expiry: bool) -> Self {
        Self {
            settings,
            submit_on_expiry,
        }
    }
}

/// 反馈弹窗的内容
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeedbackView<'a> {
    pub correct: bool,
    pub explanation: &'a str,
}

/// 答题状态机
#[derive(Debug, Clone)]
pub struct QuizPlayer {
    questions: Vec<QuizQuestion>,
    options: PlayerOptions,
    state: PlayerState,
    score: usize,
    /// 按作答顺序记录每题是否正确
    answers: Vec<bool>,
}

impl QuizPlayer {
    /// 使用快照中的设置创建播放器
    pub fn new(quiz: &QuizExport) -> Result<Self> {
        Self::with_options(quiz, PlayerOptions::new(quiz.settings(), false))
    }

    /// 空题目列表无法游玩，返回 `EmptyQuiz`
    pub fn with_options(quiz: &QuizExport, options: PlayerOptions) -> Result<Self> {
        if quiz.is_empty() {
            return Err(QuizError::EmptyQuiz);
        }
        Ok(Self {
            questions: quiz.questions().to_vec(),
            options,
            state: PlayerState::Question { index: 0 },
            score: 0,
            answers: Vec::with_capacity(quiz.len()),
        })
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    pub fn answers(&self) -> &[bool] {
        &self.answers
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.state, PlayerState::Results(_))
    }

    /// 当前题目（作答中或显示解析中）
    pub fn current_question(&self) -> Option<&QuizQuestion> {
        match self.state {
            PlayerState::Question { index } | PlayerState::Feedback { index, .. } => {
                self.questions.get(index)
            }
            PlayerState::Results(_) => None,
        }
    }

    /// 完成进度 `i / N`
    ///
    /// 反映"已完成的题目"，进入结算前不会到达 1.0。
    pub fn progress(&self) -> f64 {
        match self.state {
            PlayerState::Question { index } | PlayerState::Feedback { index, .. } => {
                index as f64 / self.total() as f64
            }
            PlayerState::Results(_) => 1.0,
        }
    }

    /// 反馈弹窗内容，只在 Feedback 状态下存在
    pub fn feedback(&self) -> Option<FeedbackView<'_>> {
        match self.state {
            PlayerState::Feedback { index, correct } => Some(FeedbackView {
                correct,
                explanation: &self.questions[index].explanation,
            }),
            _ => None,
        }
    }

    pub fn result(&self) -> Option<QuizResult> {
        match self.state {
            PlayerState::Results(result) => Some(result),
            _ => None,
        }
    }

    /// 剩余时间，未设置倒计时时为 `None`
    pub fn time_remaining(&self, elapsed: Duration) -> Option<Duration> {
        let settings = self.options.settings;
        settings
            .is_timed()
            .then(|| Duration::from_secs(u64::from(settings.timer_seconds)).saturating_sub(elapsed))
    }

    /// 作答：Question(i) → Feedback(i)
    pub fn answer(&mut self, candidate: Candidate) -> Vec<Effect> {
        let PlayerState::Question { index } = self.state else {
            debug!("忽略作答事件，当前状态: {:?}", self.state);
            return Vec::new();
        };

        let correct = evaluate(&candidate, &self.questions[index]);
        if correct {
            self.score += 1;
        }
        self.answers.push(correct);
        self.state = PlayerState::Feedback { index, correct };

        self.sound(if correct { Sound::Correct } else { Sound::Wrong })
            .into_iter()
            .collect()
    }

    /// 确认解析：Feedback(i) → Question(i+1) 或 Results
    pub fn acknowledge_feedback(&mut self) -> Vec<Effect> {
        let PlayerState::Feedback { index, .. } = self.state else {
            debug!("忽略确认事件，当前状态: {:?}", self.state);
            return Vec::new();
        };

        if index + 1 < self.total() {
            self.state = PlayerState::Question { index: index + 1 };
            Vec::new()
        } else {
            self.finish()
        }
    }

    /// 时间推进；只有开启强制交卷且时间耗尽时才会迁移状态
    pub fn tick(&mut self, elapsed: Duration) -> Vec<Effect> {
        let expired = self.time_remaining(elapsed) == Some(Duration::ZERO);
        if !expired || !self.options.submit_on_expiry || self.is_finished() {
            return Vec::new();
        }
        debug!("⏰ 时间到，强制交卷");
        self.finish()
    }

    fn finish(&mut self) -> Vec<Effect> {
        let result = QuizResult::new(self.score, self.total());
        self.state = PlayerState::Results(result);

        let mut effects = Vec::new();
        if result.celebrates() {
            effects.push(Effect::Celebrate);
            effects.extend(self.sound(Sound::Win));
        }
        effects
    }

    fn sound(&self, sound: Sound) -> Option<Effect> {
        self.options
            .settings
            .sound_enabled
            .then_some(Effect::PlaySound(sound))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnswerKey, DifficultyLevel};

    fn tf(id: u32, correct: bool) -> QuizQuestion {
        QuizQuestion {
            id,
            topic: "t".to_string(),
            prompt: format!("Câu {}", id),
            answer: AnswerKey::TrueFalse {
                correct_answer: correct,
            },
            explanation: format!("Giải thích {}", id),
            difficulty_level: DifficultyLevel::Recall,
        }
    }

    fn quiz(n: u32, settings: QuizSettings) -> QuizExport {
        QuizExport::new((1..=n).map(|id| tf(id, true)).collect(), settings).unwrap()
    }

    fn silent() -> QuizSettings {
        QuizSettings {
            timer_seconds: 0,
            sound_enabled: false,
        }
    }

    #[test]
    fn test_starts_at_first_question() {
        let player = QuizPlayer::new(&quiz(3, silent())).unwrap();
        assert_eq!(player.state(), PlayerState::Question { index: 0 });
        assert_eq!(player.progress(), 0.0);
        assert_eq!(player.current_question().map(|q| q.id), Some(1));
    }

    #[test]
    fn test_empty_quiz_rejected() {
        let empty: QuizExport =
            serde_json::from_str(r#"{"questions": [], "settings": {"timerSeconds": 0, "soundEnabled": true}}"#)
                .unwrap();
        assert!(matches!(QuizPlayer::new(&empty), Err(QuizError::EmptyQuiz)));
    }

    #[test]
    fn test_feedback_then_next_question() {
        let mut player = QuizPlayer::new(&quiz(2, silent())).unwrap();

        player.answer(Candidate::Truth(false));
        assert_eq!(
            player.state(),
            PlayerState::Feedback {
                index: 0,
                correct: false
            }
        );
        let feedback = player.feedback().unwrap();
        assert!(!feedback.correct);
        assert_eq!(feedback.explanation, "Giải thích 1");
        assert_eq!(player.progress(), 0.0);

        player.acknowledge_feedback();
        assert_eq!(player.state(), PlayerState::Question { index: 1 });
        assert_eq!(player.progress(), 0.5);
    }

    #[test]
    fn test_invalid_events_ignored() {
        let mut player = QuizPlayer::new(&quiz(1, quiz_settings_with_sound())).unwrap();

        // 作答前确认
        assert!(player.acknowledge_feedback().is_empty());
        assert_eq!(player.state(), PlayerState::Question { index: 0 });

        player.answer(Candidate::Truth(true));
        // 解析期间再次作答不会重复计分
        assert!(player.answer(Candidate::Truth(true)).is_empty());
        assert_eq!(player.score(), 1);

        player.acknowledge_feedback();
        assert!(player.is_finished());
        assert!(player.answer(Candidate::Truth(true)).is_empty());
        assert!(player.acknowledge_feedback().is_empty());
        assert_eq!(player.score(), 1);
    }

    fn quiz_settings_with_sound() -> QuizSettings {
        QuizSettings {
            timer_seconds: 0,
            sound_enabled: true,
        }
    }

    #[test]
    fn test_sound_effects_follow_setting() {
        let mut loud = QuizPlayer::new(&quiz(1, quiz_settings_with_sound())).unwrap();
        assert_eq!(
            loud.answer(Candidate::Truth(true)),
            vec![Effect::PlaySound(Sound::Correct)]
        );
        assert_eq!(
            loud.acknowledge_feedback(),
            vec![Effect::Celebrate, Effect::PlaySound(Sound::Win)]
        );

        let mut quiet = QuizPlayer::new(&quiz(1, silent())).unwrap();
        assert!(quiet.answer(Candidate::Truth(false)).is_empty());
        assert!(quiet.acknowledge_feedback().is_empty());
    }

    #[test]
    fn test_time_remaining() {
        let untimed = QuizPlayer::new(&quiz(1, silent())).unwrap();
        assert_eq!(untimed.time_remaining(Duration::from_secs(5)), None);

        let timed = QuizPlayer::new(&quiz(
            1,
            QuizSettings {
                timer_seconds: 60,
                sound_enabled: false,
            },
        ))
        .unwrap();
        assert_eq!(
            timed.time_remaining(Duration::from_secs(45)),
            Some(Duration::from_secs(15))
        );
        assert_eq!(
            timed.time_remaining(Duration::from_secs(90)),
            Some(Duration::ZERO)
        );
    }

    #[test]
    fn test_expiry_submits_only_when_enabled() {
        let settings = QuizSettings {
            timer_seconds: 30,
            sound_enabled: false,
        };

        let mut lenient = QuizPlayer::new(&quiz(3, settings)).unwrap();
        lenient.tick(Duration::from_secs(31));
        assert_eq!(lenient.state(), PlayerState::Question { index: 0 });

        let mut strict =
            QuizPlayer::with_options(&quiz(3, settings), PlayerOptions::new(settings, true)).unwrap();
        strict.answer(Candidate::Truth(true));
        strict.tick(Duration::from_secs(10));
        assert!(!strict.is_finished());

        strict.tick(Duration::from_secs(30));
        let result = strict.result().unwrap();
        assert_eq!(result.score, 1);
        assert_eq!(result.total, 3);
        assert_eq!(result.percent, 33);
    }
}
