//! 환경변수 기반 설정 모듈.
//!
//! 코어 동작에 필수 설정은 없으며 모든 값에 기본값이 있습니다.
//! `.env` 파일이 있으면 먼저 로드합니다.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::generator::{INITIAL_DEPTH, MAX_DEPTH};

/// 기본 바인딩 호스트.
pub const DEFAULT_HOST: &str = "0.0.0.0";
/// 기본 바인딩 포트.
pub const DEFAULT_PORT: u16 = 5678;
/// 송신 주기 사이의 고정 대기 시간 (밀리초).
pub const DEFAULT_INTERVAL_MS: u64 = 1000;

/// 연결 루프 동작 방식.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamMode {
    /// 수신과 송신 주기를 경쟁시키는 기본 모드
    #[default]
    Duplex,
    /// 수신을 보지 않고 생성 → 송신 → 대기만 반복하는 축소 모드
    PushOnly,
}

impl FromStr for StreamMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "duplex" => Ok(Self::Duplex),
            "push" | "push_only" | "push-only" => Ok(Self::PushOnly),
            _ => Err(ConfigError::invalid("STREAM_MODE", s)),
        }
    }
}

impl std::fmt::Display for StreamMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Duplex => write!(f, "duplex"),
            Self::PushOnly => write!(f, "push"),
        }
    }
}

/// 전체 설정.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamConfig {
    /// 서버 설정
    pub server: ServerConfig,
    /// 스트림 설정
    pub stream: StreamSettings,
}

/// 서버 설정.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// 연결별 스트림 설정.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamSettings {
    /// 송신 후 다음 주기까지의 대기 시간 (밀리초)
    pub interval_ms: u64,
    /// 루프 동작 방식
    pub mode: StreamMode,
    /// 최상위 생성 깊이
    pub initial_depth: u32,
    /// 연결별 생성기 시드의 기준값 (없으면 엔트로피 사용)
    pub seed: Option<u64>,
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_INTERVAL_MS,
            mode: StreamMode::Duplex,
            initial_depth: INITIAL_DEPTH,
            seed: None,
        }
    }
}

impl StreamConfig {
    /// 환경변수에서 설정 로드.
    ///
    /// # Errors
    /// `STREAM_MODE`가 알 수 없는 값이거나 검증에 실패하면 `ConfigError`를 반환합니다.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let mode = match std::env::var("STREAM_MODE") {
            Ok(raw) => raw.parse()?,
            Err(_) => StreamMode::default(),
        };

        let config = Self {
            server: ServerConfig {
                host: std::env::var("STREAM_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
                port: env_var_parse("STREAM_PORT", DEFAULT_PORT),
            },
            stream: StreamSettings {
                interval_ms: env_var_parse("STREAM_INTERVAL_MS", DEFAULT_INTERVAL_MS),
                mode,
                initial_depth: env_var_parse("STREAM_INITIAL_DEPTH", INITIAL_DEPTH),
                seed: std::env::var("STREAM_SEED").ok().and_then(|s| s.parse().ok()),
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// 값 범위를 검증합니다.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stream.interval_ms == 0 {
            return Err(ConfigError::invalid("STREAM_INTERVAL_MS", 0));
        }
        if self.stream.initial_depth > MAX_DEPTH + 1 {
            return Err(ConfigError::invalid(
                "STREAM_INITIAL_DEPTH",
                self.stream.initial_depth,
            ));
        }
        Ok(())
    }

    /// 소켓 주소 반환.
    ///
    /// # Errors
    /// `host:port` 형식이 유효하지 않으면 `ConfigError::InvalidAddress`를 반환합니다.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        Ok(format!("{}:{}", self.server.host, self.server.port).parse()?)
    }

    /// 들여쓰기된 JSON으로 직렬화 (시작 로그용).
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl StreamSettings {
    /// 대기 시간을 Duration으로 반환
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// `index`번째 연결에 쓸 시드.
    pub fn seed_for(&self, index: u64) -> Option<u64> {
        self.seed.map(|base| base.wrapping_add(index))
    }
}

/// 환경변수에서 값을 파싱 (실패 시 기본값 사용)
fn env_var_parse<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_deployment() {
        let config = StreamConfig::default();

        assert_eq!(config.socket_addr().unwrap().to_string(), "0.0.0.0:5678");
        assert_eq!(config.stream.interval(), Duration::from_secs(1));
        assert_eq!(config.stream.mode, StreamMode::Duplex);
        assert_eq!(config.stream.initial_depth, 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_stream_mode_from_str() {
        assert_eq!("duplex".parse::<StreamMode>().unwrap(), StreamMode::Duplex);
        assert_eq!("PUSH".parse::<StreamMode>().unwrap(), StreamMode::PushOnly);
        assert_eq!("push-only".parse::<StreamMode>().unwrap(), StreamMode::PushOnly);
        assert!("sideways".parse::<StreamMode>().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_interval_and_deep_start() {
        let mut config = StreamConfig::default();
        config.stream.interval_ms = 0;
        assert!(config.validate().is_err());

        let mut config = StreamConfig::default();
        config.stream.initial_depth = MAX_DEPTH + 2;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_host_is_reported() {
        let mut config = StreamConfig::default();
        config.server.host = "not a host".to_string();

        assert!(matches!(
            config.socket_addr(),
            Err(ConfigError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_seed_for_connection() {
        let mut settings = StreamSettings::default();
        assert_eq!(settings.seed_for(3), None);

        settings.seed = Some(100);
        assert_eq!(settings.seed_for(0), Some(100));
        assert_eq!(settings.seed_for(3), Some(103));
    }

    #[test]
    fn test_config_json_dump() {
        let json = StreamConfig::default().to_json_pretty().unwrap();
        assert!(json.contains("\"port\": 5678"));
        assert!(json.contains("\"mode\": \"duplex\""));
    }
}
