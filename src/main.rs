//! 命令行入口 (Application Entrypoint)
//!
//! 负责 CLI 指令解析、遥测层初始化，并以 JSON 形式输出结果信封。

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;

use inspectlet::core::config::AppConfig;
use inspectlet::{Credentials, Envelope, Inspectlet, Params};

/// 命令行界面脚手架 (CLI Scaffolding)
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// 配置文件路径
    #[arg(short, long, default_value = "config.toml")]
    config: std::path::PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 列出账户下的站点
    Sites {
        /// 输出中保留原始 HTML
        #[arg(long)]
        with_html: bool,
    },
    /// 获取指定站点的录屏数据
    Captures {
        /// 站点 ID
        #[arg(short, long)]
        site: String,
        /// 请求参数 (KEY=VALUE)
        #[arg(short, long, value_parser = parse_key_val)]
        params: Vec<(String, String)>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load_from(&cli.config)?;
    let credentials = Credentials::new(config.email, config.password)
        .context("credentials are read from config.toml or INSPECTLET_EMAIL / INSPECTLET_PASSWORD")?;
    let client = Inspectlet::with_config(credentials, config.client)?;

    let success = match cli.command {
        Commands::Sites { with_html } => {
            let envelope = client.list_sites().await;
            let envelope = if with_html {
                envelope
            } else {
                envelope.without_html()
            };
            emit(&envelope)?
        }
        Commands::Captures { site, params } => {
            let params: Params = params
                .into_iter()
                .map(|(k, v)| (k, serde_json::Value::String(v)))
                .collect();
            emit(&client.get_captures(&site, params).await)?
        }
    };

    if !success {
        std::process::exit(1);
    }
    Ok(())
}

/// 输出信封并返回是否成功
fn emit<T: Serialize>(envelope: &Envelope<T>) -> anyhow::Result<bool> {
    println!("{}", serde_json::to_string_pretty(envelope)?);
    if let Some(message) = envelope.message() {
        tracing::error!("{}", message);
    }
    Ok(envelope.is_success())
}

/// 执行 KEY=VALUE 格式参数解析
fn parse_key_val(s: &str) -> std::result::Result<(String, String), String> {
    let pos = s
        .find('=')
        .ok_or_else(|| format!("invalid KEY=VALUE: no = found in {}", s))?;
    Ok((s[..pos].to_string(), s[pos + 1..].to_string()))
}
