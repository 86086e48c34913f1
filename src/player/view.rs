//! 题目的呈现模型
//!
//! 与具体界面技术无关：HTML 播放器和终端预览都按这里的规则渲染。

use crate::models::{AnswerKey, QuizQuestion};
use crate::player::evaluate::Candidate;

/// 单选题按钮的四种配色，按下标循环
pub const PALETTE: [&str; 4] = ["opt-A", "opt-B", "opt-C", "opt-D"];
/// 按钮上的字母标记
pub const OPTION_KEYS: [char; 4] = ['A', 'B', 'C', 'D'];

pub const TRUE_LABEL: &str = "Đúng";
pub const FALSE_LABEL: &str = "Sai";

/// 一个答案按钮
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerButton {
    pub key: char,
    pub label: String,
    pub class: &'static str,
    /// 点击后提交的答案
    pub candidate: Candidate,
}

/// 一道题的作答控件
#[derive(Debug, Clone, PartialEq)]
pub enum AnswerControls {
    /// 单选题和判断题
    Buttons(Vec<AnswerButton>),
    /// 填数题：一个数字输入框加提交
    NumericInput,
}

/// 生成题目的作答控件
pub fn answer_controls(question: &QuizQuestion) -> AnswerControls {
    match &question.answer {
        AnswerKey::MultipleChoice { options, .. } => AnswerControls::Buttons(
            options
                .iter()
                .enumerate()
                .map(|(i, label)| AnswerButton {
                    key: OPTION_KEYS[i % OPTION_KEYS.len()],
                    label: label.clone(),
                    class: PALETTE[i % PALETTE.len()],
                    candidate: Candidate::Choice(i),
                })
                .collect(),
        ),
        AnswerKey::TrueFalse { .. } => AnswerControls::Buttons(vec![
            AnswerButton {
                key: 'A',
                label: TRUE_LABEL.to_string(),
                class: PALETTE[0],
                candidate: Candidate::Truth(true),
            },
            AnswerButton {
                key: 'B',
                label: FALSE_LABEL.to_string(),
                class: PALETTE[2],
                candidate: Candidate::Truth(false),
            },
        ]),
        AnswerKey::ShortNumeric { .. } => AnswerControls::NumericInput,
    }
}

/// 进度标签 `当前题号/总数`
pub fn progress_label(index: usize, total: usize) -> String {
    format!("{}/{}", index + 1, total)
}
