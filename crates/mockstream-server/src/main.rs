//! Mock streaming WebSocket server.

use anyhow::Context;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use mockstream_core::{init_logging, LogConfig, LogFormat, StreamConfig, StreamMode};
use mockstream_server::{metrics::setup_metrics_recorder, serve, ServerState};

/// 명령줄 인자. 지정한 값은 환경변수보다 우선합니다.
#[derive(Parser)]
#[command(name = "mockstream-server")]
#[command(about = "Streams randomly generated JSON values to every WebSocket client", long_about = None)]
#[command(version)]
struct Cli {
    /// 바인딩 호스트 (STREAM_HOST)
    #[arg(long)]
    host: Option<String>,

    /// 바인딩 포트 (STREAM_PORT)
    #[arg(long, short)]
    port: Option<u16>,

    /// 송신 주기 (밀리초, STREAM_INTERVAL_MS)
    #[arg(long)]
    interval_ms: Option<u64>,

    /// 루프 동작 방식: duplex 또는 push (STREAM_MODE)
    #[arg(long)]
    mode: Option<StreamMode>,

    /// 최상위 생성 깊이 (STREAM_INITIAL_DEPTH)
    #[arg(long)]
    initial_depth: Option<u32>,

    /// 생성기 시드 기준값 (STREAM_SEED)
    #[arg(long)]
    seed: Option<u64>,

    /// 로그 형식: pretty, json, compact (LOG_FORMAT)
    #[arg(long)]
    log_format: Option<LogFormat>,

    /// /metrics 엔드포인트 비활성화
    #[arg(long)]
    no_metrics: bool,
}

impl Cli {
    /// 환경변수 설정 위에 명령줄 값을 덮어씁니다.
    fn apply(&self, config: &mut StreamConfig) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(interval_ms) = self.interval_ms {
            config.stream.interval_ms = interval_ms;
        }
        if let Some(mode) = self.mode {
            config.stream.mode = mode;
        }
        if let Some(depth) = self.initial_depth {
            config.stream.initial_depth = depth;
        }
        if self.seed.is_some() {
            config.stream.seed = self.seed;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 로깅 초기화
    let mut log_config = LogConfig::from_env();
    if let Some(format) = cli.log_format {
        log_config = log_config.with_format(format);
    }
    init_logging(log_config).map_err(|e| anyhow::anyhow!(e))?;

    // 설정 로드 (.env → 환경변수 → 명령줄)
    let mut config = StreamConfig::from_env().context("설정 로드 실패")?;
    cli.apply(&mut config);
    config.validate().context("설정 검증 실패")?;

    let addr = config.socket_addr().map_err(|e| {
        error!(
            host = %config.server.host,
            port = config.server.port,
            error = %e,
            "소켓 주소 설정이 유효하지 않습니다. STREAM_HOST, STREAM_PORT 환경변수를 확인하세요."
        );
        e
    })?;

    info!("Configuration:\n{}", config.to_json_pretty()?);

    // Prometheus 메트릭 레코더 설정
    let metrics_handle = if cli.no_metrics {
        None
    } else {
        let handle = setup_metrics_recorder();
        info!("Prometheus metrics recorder initialized");
        Some(handle)
    };

    let shutdown = CancellationToken::new();
    let state = ServerState::new(config.stream.clone(), shutdown.clone());

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("{addr} 바인딩 실패"))?;

    info!("WebSocket available at ws://{}/", addr);
    if metrics_handle.is_some() {
        info!("Metrics available at http://{}/metrics", addr);
    }

    tokio::spawn(shutdown_signal(shutdown));

    serve(listener, state.clone(), metrics_handle).await?;

    info!(
        total_connections = state.connections.total(),
        uptime_secs = state.uptime_secs(),
        "Server stopped gracefully"
    );

    Ok(())
}

/// Graceful shutdown 시그널 대기.
///
/// Ctrl+C 또는 SIGTERM 시그널을 수신하면 종료 토큰을 취소합니다.
async fn shutdown_signal(shutdown_token: CancellationToken) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
    }

    // 모든 연결 루프에 종료 시그널 전파
    shutdown_token.cancel();
    info!("Shutdown signal propagated to connection loops");
}
