use std::process::ExitCode;

use clap::Parser;
use quizgen::app::App;
use quizgen::cli::Cli;
use quizgen::config::Config;
use quizgen::utils::logging;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // 加载配置
    let config = match Config::load_from(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {e}");
            return ExitCode::from(2);
        }
    };

    // 初始化日志
    logging::init(cli.verbose || config.verbose_logging);

    // 初始化并运行应用
    let app = App::new(config);
    match app.run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("❌ {e}");
            ExitCode::from(1)
        }
    }
}
