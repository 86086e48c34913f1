//! 命令行参数

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::models::RequestedDifficulty;

/// quizgen - 用生成式模型把主题或资料变成可离线游玩的测验
#[derive(Parser, Debug)]
#[command(name = "quizgen")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// 显示详细日志（debug 级别）
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 配置文件路径（默认: 当前目录下的 quizgen.toml）
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// 生成一套题目，导出 HTML 并保存到题库
    Generate(GenerateArgs),

    /// 保存 API key
    SetKey {
        /// API key
        key: String,
    },

    /// 管理题库
    #[command(subcommand)]
    Library(LibraryCommand),

    /// 把题库中的记录导出为 HTML
    Export {
        /// 记录 id
        id: String,

        /// 输出目录
        #[arg(short, long, value_name = "DIR", default_value = ".")]
        out: PathBuf,
    },

    /// 在终端中试玩（题库 id 或导出的 .html 文件）
    Play {
        /// 记录 id 或 HTML 文件路径
        source: String,
    },
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// 出题主题（提供了资料时可省略）
    #[arg(short, long, default_value = "")]
    pub topic: String,

    /// 资料文件，可重复；按给定顺序发送
    #[arg(short, long = "file", value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// 题目数量（1-20，默认取配置）
    #[arg(short = 'n', long)]
    pub count: Option<u8>,

    /// 难度: recall | comprehension | application | analysis | mixed
    #[arg(short, long, default_value = "mixed")]
    pub difficulty: RequestedDifficulty,

    /// 倒计时秒数，0 表示不计时（默认取配置）
    #[arg(long)]
    pub timer: Option<u32>,

    /// 关闭音效
    #[arg(long)]
    pub no_sound: bool,

    /// 保存到题库时使用的名称
    #[arg(long)]
    pub name: Option<String>,

    /// 导出目录
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub out: PathBuf,

    /// 不保存到题库
    #[arg(long)]
    pub no_save: bool,
}

#[derive(Subcommand, Debug)]
pub enum LibraryCommand {
    /// 列出全部记录（最新的在前）
    List,
    /// 查看一条记录
    Show { id: String },
    /// 重命名
    Rename { id: String, name: String },
    /// 删除
    Delete { id: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_args() {
        let cli = Cli::parse_from([
            "quizgen", "generate", "-t", "Quang hợp", "-f", "a.pdf", "-f", "b.png", "-n", "5", "-d",
            "analysis", "--no-sound",
        ]);
        let Command::Generate(args) = cli.command else {
            panic!("应解析为 generate");
        };
        assert_eq!(args.topic, "Quang hợp");
        assert_eq!(args.files, vec![PathBuf::from("a.pdf"), PathBuf::from("b.png")]);
        assert_eq!(args.count, Some(5));
        assert_eq!(args.difficulty, RequestedDifficulty::Analysis);
        assert!(args.no_sound);
        assert!(!args.no_save);
    }

    #[test]
    fn test_library_subcommands() {
        let cli = Cli::parse_from(["quizgen", "-v", "library", "rename", "quiz_1_abc", "Bài mới"]);
        assert!(cli.verbose);
        match cli.command {
            Command::Library(LibraryCommand::Rename { id, name }) => {
                assert_eq!(id, "quiz_1_abc");
                assert_eq!(name, "Bài mới");
            }
            other => panic!("意外的命令: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_difficulty_rejected() {
        assert!(Cli::try_parse_from(["quizgen", "generate", "-t", "x", "-d", "hard"]).is_err());
    }
}
