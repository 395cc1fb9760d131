//! MediScript AI - 命令行客户端
//!
//! 在终端里驱动与网页相同的控制器：健康检查、生成、清空、复制。

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mediscript::client::{
    CommandClipboard, Controller, GenerateOutcome, HttpTransport, Output, Shortcut,
    ViewSnapshot,
};
use mediscript::config::get_config;

#[derive(Parser)]
#[command(name = "mediscript-client", about = "Turn raw medical notes into clinical documentation")]
struct Cli {
    /// MediScript API 地址（默认取配置）
    #[arg(long, global = true)]
    api_base: Option<String>,

    /// 单次请求超时秒数，0 表示不限制
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// 检查 API 是否可用
    Health,
    /// 从文件或标准输入读取笔记并生成文档
    Generate {
        /// 笔记文件，缺省或 "-" 表示标准输入
        file: Option<PathBuf>,
        /// 输出 HTML 而不是纯文本
        #[arg(long)]
        html: bool,
        /// 生成成功后复制到剪贴板
        #[arg(long)]
        copy: bool,
    },
    /// 交互模式：输入笔记，:go 生成，:clear 清空，:copy 复制，:quit 退出
    Shell,
}

type CliController = Controller<HttpTransport, CommandClipboard>;

fn build_controller(cli: &Cli) -> anyhow::Result<CliController> {
    let config = get_config();
    let api_base = cli.api_base.clone().unwrap_or(config.api_base);
    let timeout = match cli.timeout.unwrap_or(config.request_timeout_secs) {
        0 => None,
        secs => Some(Duration::from_secs(secs)),
    };

    let transport = HttpTransport::new(&api_base, timeout)
        .with_context(|| format!("failed to create HTTP client for {}", api_base))?;
    Ok(Controller::new(transport, CommandClipboard::detect()))
}

fn print_output(snapshot: &ViewSnapshot, html: bool) {
    match &snapshot.output {
        Output::Error(message) => eprintln!("error: {}", message),
        _ if html => println!("{}", snapshot.output_html()),
        _ => println!("{}", snapshot.output_text()),
    }
}

async fn read_notes(file: Option<PathBuf>) -> anyhow::Result<String> {
    match file {
        Some(path) if path.as_os_str() != "-" => tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("failed to read {}", path.display())),
        _ => {
            let mut notes = String::new();
            tokio::io::stdin()
                .read_to_string(&mut notes)
                .await
                .context("failed to read notes from stdin")?;
            Ok(notes)
        }
    }
}

async fn run_generate(
    controller: &CliController,
    notes: &str,
    html: bool,
    copy: bool,
) -> anyhow::Result<()> {
    controller.set_notes(notes);

    match controller.generate().await {
        GenerateOutcome::Generated => print_output(&controller.snapshot(), html),
        GenerateOutcome::Failed(e) => {
            return Err(anyhow::Error::new(e).context("Failed to generate documentation"))
        }
        GenerateOutcome::Busy => bail!("a generation request is already in progress"),
    }

    if copy {
        controller.copy()?;
        eprintln!("{}", controller.snapshot().copy_label);
    }
    Ok(())
}

/// 启动时的健康检查在后台运行，失败时打印错误
fn start_health_check(controller: &Arc<CliController>) {
    let health = controller.spawn_health_check();
    let controller = Arc::clone(controller);
    tokio::spawn(async move {
        if let Ok(false) = health.await {
            print_output(&controller.snapshot(), false);
        }
    });
}

async fn run_shell(controller: &CliController) -> anyhow::Result<()> {
    let mut notes = String::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            ":quit" | ":q" => break,
            ":go" => {
                match controller.handle_shortcut(Shortcut::Generate).await {
                    Some(_) => print_output(&controller.snapshot(), false),
                    None => eprintln!("Nothing to generate yet."),
                }
            }
            ":clear" => {
                notes.clear();
                controller.handle_shortcut(Shortcut::Clear).await;
            }
            ":copy" => {
                if controller.copy().is_ok() {
                    eprintln!("{}", controller.snapshot().copy_label);
                } else {
                    print_output(&controller.snapshot(), false);
                }
            }
            _ => {
                notes.push_str(&line);
                notes.push('\n');
                controller.set_notes(&notes);
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mediscript=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let controller = Arc::new(build_controller(&cli)?);

    match cli.command {
        Command::Health => {
            if controller.check_health().await {
                println!("API is healthy ({})", controller.transport().api_base());
            } else {
                print_output(&controller.snapshot(), false);
                std::process::exit(1);
            }
        }
        Command::Generate { file, html, copy } => {
            start_health_check(&controller);
            let notes = read_notes(file).await?;
            run_generate(&controller, &notes, html, copy).await?;
        }
        Command::Shell => {
            start_health_check(&controller);
            run_shell(&controller).await?
        }
    }

    Ok(())
}
