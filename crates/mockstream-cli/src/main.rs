//! 모의 스트리밍 서버 개발 도구.
//!
//! # 사용 예시
//!
//! ```bash
//! # 서버 스트림 관찰 (처음 5개 프레임)
//! mockstream watch --url ws://localhost:5678 --count 5
//!
//! # 접속 직후 메시지 전송
//! mockstream watch --send '{"type":"subscribe"}' --send hello
//!
//! # 서버 없이 생성기 출력 확인
//! mockstream sample --count 3 --seed 42 --pretty
//! ```

use std::io::Write;

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mockstream_cli::commands::sample::{sample, SampleConfig};
use mockstream_cli::commands::watch::{watch, WatchConfig};
use mockstream_core::INITIAL_DEPTH;

#[derive(Parser)]
#[command(name = "mockstream")]
#[command(about = "Mock streaming server developer tools", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// 서버에 접속해 받은 프레임 출력
    Watch {
        /// WebSocket URL
        #[arg(short, long, default_value = "ws://localhost:5678")]
        url: String,

        /// 접속 직후 보낼 메시지 (여러 번 지정 가능)
        #[arg(short, long)]
        send: Vec<String>,

        /// 출력할 최대 프레임 수
        #[arg(short, long)]
        count: Option<usize>,

        /// JSON을 들여쓰기 없이 원문 출력
        #[arg(long)]
        raw: bool,
    },

    /// 서버 없이 생성된 값 출력
    Sample {
        /// 출력할 값 수
        #[arg(short, long, default_value = "1")]
        count: usize,

        /// 생성기 시드
        #[arg(short, long)]
        seed: Option<u64>,

        /// 최상위 생성 깊이
        #[arg(short, long, default_value_t = INITIAL_DEPTH)]
        depth: u32,

        /// 들여쓰기 출력
        #[arg(long)]
        pretty: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 프레임 출력과 섞이지 않도록 로그는 stderr로
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("mockstream_cli={}", cli.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Watch {
            url,
            send,
            count,
            raw,
        } => {
            let config = WatchConfig {
                url,
                send,
                count,
                raw,
            };

            tokio::select! {
                result = watch(&config, &mut out) => {
                    if let Err(e) = result {
                        error!("Watch failed: {:#}", e);
                        return Err(e);
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Interrupted, closing");
                }
            }
        }
        Commands::Sample {
            count,
            seed,
            depth,
            pretty,
        } => {
            let config = SampleConfig {
                count,
                seed,
                depth,
                pretty,
            };
            sample(&config, &mut out)?;
        }
    }

    out.flush()?;
    Ok(())
}
