//! 应用主结构
//!
//! 持有配置和本地资源，把命令行子命令分派到各层能力上。

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{info, warn};

use crate::cli::{Command, GenerateArgs, LibraryCommand};
use crate::clients::OpenAiCompatibleProvider;
use crate::config::Config;
use crate::infrastructure::{new_record, CredentialStore, FileCredentialStore, JsonFileLibrary, QuizLibrary};
use crate::models::{load_documents, GenerationRequest, QuizExport, QuizSettings, RecordUpdate};
use crate::orchestrator::QuizGenerator;
use crate::player::{
    answer_controls, progress_label, AnswerControls, Candidate, Effect, PlayerOptions,
    PlayerState, QuizPlayer, Sound,
};
use crate::services::{extract_quiz, HtmlExporter};
use crate::utils::logging::{log_startup, truncate_text};

/// 应用主结构
pub struct App {
    config: Config,
    credentials: Arc<FileCredentialStore>,
    library: JsonFileLibrary,
    exporter: HtmlExporter,
}

impl App {
    /// 初始化应用
    pub fn new(config: Config) -> Self {
        log_startup(&config);
        Self {
            credentials: Arc::new(FileCredentialStore::from_config(&config)),
            library: JsonFileLibrary::from_config(&config),
            exporter: HtmlExporter::new(config.export_file_name.clone()),
            config,
        }
    }

    /// 执行一个子命令
    pub async fn run(&self, command: Command) -> Result<()> {
        match command {
            Command::Generate(args) => self.generate(args).await,
            Command::SetKey { key } => self.set_key(&key),
            Command::Library(cmd) => self.library(cmd),
            Command::Export { id, out } => self.export(&id, &out).await,
            Command::Play { source } => self.play(&source).await,
        }
    }

    async fn generate(&self, args: GenerateArgs) -> Result<()> {
        let documents = load_documents(args.files.as_slice()).await?;
        let request = GenerationRequest::new(
            args.topic,
            args.count.unwrap_or(self.config.default_question_count),
            args.difficulty,
        )
        .with_documents(documents);
        let settings = QuizSettings {
            timer_seconds: args.timer.unwrap_or(self.config.default_timer_seconds),
            sound_enabled: self.config.default_sound && !args.no_sound,
        };

        let generator = QuizGenerator::new(
            &self.config,
            Arc::new(OpenAiCompatibleProvider::from_config(&self.config)),
            self.credentials.clone(),
        );
        let quiz = generator.generate(&request, settings).await?;

        print_summary(&quiz);

        let path = self.exporter.write_to(&quiz, &args.out).await?;
        println!("💾 Đã xuất: {}", path.display());

        if args.no_save {
            return Ok(());
        }
        let name = args.name.unwrap_or_else(|| default_record_name(&request));
        let record = new_record(name, request.topic(), request.difficulty, quiz);
        let id = record.id.clone();
        // 保存失败不影响已经生成和导出的结果
        match self.library.append(record) {
            Ok(()) => println!("📚 Đã lưu vào thư viện: {}", id),
            Err(e) => {
                warn!("⚠️ 保存到题库失败: {}", e);
                println!("⚠️ Không thể lưu vào thư viện: {}", e);
            }
        }
        Ok(())
    }

    fn set_key(&self, key: &str) -> Result<()> {
        if key.trim().is_empty() {
            anyhow::bail!("API key 不能为空");
        }
        self.credentials.write(key)?;
        println!("🔑 Đã lưu API key vào {}", self.credentials.path().display());
        Ok(())
    }

    fn library(&self, command: LibraryCommand) -> Result<()> {
        match command {
            LibraryCommand::List => {
                let records = self.library.list()?;
                if records.is_empty() {
                    println!("Thư viện trống.");
                }
                for record in records {
                    println!("{}", record);
                }
            }
            LibraryCommand::Show { id } => {
                let record = self
                    .library
                    .get(&id)?
                    .with_context(|| format!("题库中不存在 id 为 {} 的记录", id))?;
                println!("{}", record);
                print_summary(&record.quiz);
            }
            LibraryCommand::Rename { id, name } => {
                let record = self.library.update(&id, RecordUpdate::rename(name))?;
                println!("✏️ {}", record);
            }
            LibraryCommand::Delete { id } => {
                self.library.delete(&id)?;
                println!("🗑️ Đã xóa {}", id);
            }
        }
        Ok(())
    }

    async fn export(&self, id: &str, out: &Path) -> Result<()> {
        let record = self
            .library
            .get(id)?
            .with_context(|| format!("题库中不存在 id 为 {} 的记录", id))?;
        let path = self.exporter.write_to(&record.quiz, out).await?;
        println!("💾 Đã xuất: {}", path.display());
        Ok(())
    }

    async fn play(&self, source: &str) -> Result<()> {
        let quiz = self.resolve_quiz(source).await?;
        let options = PlayerOptions::new(quiz.settings(), self.config.submit_on_expiry);
        let player = QuizPlayer::with_options(&quiz, options)?;
        play_in_terminal(player).await
    }

    /// 来源可以是导出的 HTML 文件，也可以是题库 id
    async fn resolve_quiz(&self, source: &str) -> Result<QuizExport> {
        let path = PathBuf::from(source);
        if path.is_file() {
            info!("📄 从导出文件读取题目: {}", path.display());
            let html = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("无法读取 {}", path.display()))?;
            return Ok(extract_quiz(&html)?);
        }
        let record = self
            .library
            .get(source)?
            .with_context(|| format!("找不到文件或题库记录: {}", source))?;
        Ok(record.quiz)
    }
}

fn default_record_name(request: &GenerationRequest) -> String {
    if !request.topic().is_empty() {
        return format!("Quiz: {}", truncate_text(request.topic(), 60));
    }
    match request.documents.first() {
        Some(doc) => format!("Quiz: {}", doc.name),
        None => "Quiz".to_string(),
    }
}

fn print_summary(quiz: &QuizExport) {
    println!("{}", "=".repeat(60));
    for q in quiz.questions() {
        println!(
            "{:>2}. [{} | {}] {}",
            q.id,
            q.kind().as_str(),
            q.difficulty_level,
            truncate_text(&q.prompt, 70)
        );
    }
    println!("{}", "=".repeat(60));
}

// ========== 终端试玩 ==========

/// 用同一个状态机在终端里游玩
async fn play_in_terminal(mut player: QuizPlayer) -> Result<()> {
    let started = Instant::now();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        match player.state() {
            PlayerState::Question { index } => {
                let Some(question) = player.current_question() else {
                    break;
                };
                println!();
                println!(
                    "Câu {} | Điểm: {}{}",
                    progress_label(index, player.total()),
                    player.score(),
                    remaining_label(&player, started.elapsed())
                );
                println!("[{}] {}", question.topic, question.prompt);
                let controls = answer_controls(question);
                print_controls(&controls);

                let Some(input) = read_line(&mut lines).await? else {
                    break;
                };
                let effects = player.tick(started.elapsed());
                render_effects(&effects);
                if player.is_finished() {
                    println!("⏰ Hết giờ!");
                    continue;
                }
                match parse_answer(&input, &controls) {
                    Some(candidate) => render_effects(&player.answer(candidate)),
                    None => println!("Lựa chọn không hợp lệ, hãy thử lại."),
                }
            }
            PlayerState::Feedback { .. } => {
                if let Some(feedback) = player.feedback() {
                    println!(
                        "{}",
                        if feedback.correct {
                            "🎉 CHÍNH XÁC!"
                        } else {
                            "😢 SAI RỒI..."
                        }
                    );
                    println!("💡 {}", feedback.explanation);
                }
                prompt("Nhấn Enter để tiếp tục...");
                if read_line(&mut lines).await?.is_none() {
                    break;
                }
                render_effects(&player.acknowledge_feedback());
            }
            PlayerState::Results(result) => {
                println!();
                println!("🏆 {}", result);
                return Ok(());
            }
        }
    }

    println!("Đã dừng ở câu {}/{}.", player.answers().len(), player.total());
    Ok(())
}

async fn read_line(lines: &mut Lines<BufReader<Stdin>>) -> Result<Option<String>> {
    Ok(lines.next_line().await?)
}

fn prompt(text: &str) {
    print!("{} ", text);
    let _ = std::io::stdout().flush();
}

fn remaining_label(player: &QuizPlayer, elapsed: Duration) -> String {
    match player.time_remaining(elapsed) {
        Some(left) => {
            let secs = left.as_secs();
            format!(" | ⏱️ {}:{:02}", secs / 60, secs % 60)
        }
        None => String::new(),
    }
}

fn print_controls(controls: &AnswerControls) {
    match controls {
        AnswerControls::Buttons(buttons) => {
            for button in buttons {
                println!("  {}. {}", button.key, button.label);
            }
            prompt("Chọn:");
        }
        AnswerControls::NumericInput => prompt("Nhập đáp số:"),
    }
}

/// 把终端输入转换为答案
///
/// 按钮题接受字母或序号（`b`、`2`）；填数题的任何输入都会被提交，
/// 无法解析的按答错处理。
fn parse_answer(input: &str, controls: &AnswerControls) -> Option<Candidate> {
    let input = input.trim();
    match controls {
        AnswerControls::NumericInput => Some(Candidate::parse_numeric(input)),
        AnswerControls::Buttons(buttons) => {
            let mut chars = input.chars();
            let first = chars.next()?;
            if chars.next().is_some() {
                return None;
            }
            let first = first.to_ascii_uppercase();
            buttons
                .iter()
                .enumerate()
                .find(|(i, b)| b.key == first || char::from_digit(*i as u32 + 1, 10) == Some(first))
                .map(|(_, b)| b.candidate)
        }
    }
}

fn render_effects(effects: &[Effect]) {
    for effect in effects {
        match effect {
            Effect::PlaySound(Sound::Correct) | Effect::PlaySound(Sound::Win) => print!("\x07"),
            Effect::PlaySound(Sound::Wrong) => {}
            Effect::Celebrate => println!("🎊🎊🎊"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnswerKey, DifficultyLevel, QuizQuestion, RequestedDifficulty, SourceDocument};

    fn controls_for(answer: AnswerKey) -> AnswerControls {
        answer_controls(&QuizQuestion {
            id: 1,
            topic: "t".to_string(),
            prompt: "p".to_string(),
            answer,
            explanation: String::new(),
            difficulty_level: DifficultyLevel::Recall,
        })
    }

    #[test]
    fn test_parse_answer_buttons() {
        let mcq = controls_for(AnswerKey::MultipleChoice {
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct_answer: 0,
        });
        assert_eq!(parse_answer("b", &mcq), Some(Candidate::Choice(1)));
        assert_eq!(parse_answer(" D ", &mcq), Some(Candidate::Choice(3)));
        assert_eq!(parse_answer("3", &mcq), Some(Candidate::Choice(2)));
        assert_eq!(parse_answer("e", &mcq), None);
        assert_eq!(parse_answer("", &mcq), None);
        assert_eq!(parse_answer("ab", &mcq), None);

        let tf = controls_for(AnswerKey::TrueFalse {
            correct_answer: true,
        });
        assert_eq!(parse_answer("a", &tf), Some(Candidate::Truth(true)));
        assert_eq!(parse_answer("2", &tf), Some(Candidate::Truth(false)));
    }

    #[test]
    fn test_parse_answer_numeric_never_blocks() {
        let short = controls_for(AnswerKey::ShortNumeric { correct_answer: 1.0 });
        assert_eq!(parse_answer("1.5", &short), Some(Candidate::Number(1.5)));
        assert_eq!(parse_answer("abc", &short), Some(Candidate::Unparseable));
    }

    #[test]
    fn test_default_record_name() {
        let topic = GenerationRequest::new(" Quang hợp ", 5, RequestedDifficulty::Mixed);
        assert_eq!(default_record_name(&topic), "Quiz: Quang hợp");

        let docs = GenerationRequest::new("", 5, RequestedDifficulty::Mixed)
            .with_documents(vec![SourceDocument::new("bai1.pdf", "application/pdf", vec![1])]);
        assert_eq!(default_record_name(&docs), "Quiz: bai1.pdf");
    }
}
