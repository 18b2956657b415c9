//! 스트리밍 서버의 에러 타입.
//!
//! 연결 루프와 설정 로딩에서 사용되는 에러 타입을 정의합니다.

use thiserror::Error;

/// 연결 단위 스트리밍 에러.
///
/// 어떤 변형이든 해당 연결의 루프만 종료시키며 서버 프로세스로 전파되지 않습니다.
#[derive(Debug, Error)]
pub enum StreamError {
    /// 피어가 연결을 닫았거나 스트림이 끝남
    #[error("연결 종료")]
    ConnectionClosed,

    /// 그 외 모든 전송 계층 오류
    #[error("전송 에러: {0}")]
    Transport(String),

    /// 직렬화 에러
    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// 스트리밍 작업을 위한 Result 타입.
pub type StreamResult<T> = Result<T, StreamError>;

impl StreamError {
    /// 전송 에러를 생성합니다.
    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self::Transport(err.to_string())
    }

    /// 피어에 의한 정상 종료인지 확인합니다.
    pub fn is_clean_close(&self) -> bool {
        matches!(self, Self::ConnectionClosed)
    }

    /// 메트릭 라벨로 쓰이는 짧은 사유 코드.
    pub fn reason_code(&self) -> &'static str {
        match self {
            Self::ConnectionClosed => "closed",
            Self::Transport(_) => "transport",
            Self::Serialization(_) => "serialization",
        }
    }
}

/// 설정 에러.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 환경 변수 또는 인자의 값이 유효하지 않음
    #[error("잘못된 설정 값 {key}={value}")]
    InvalidValue {
        /// 설정 키
        key: String,
        /// 입력된 값
        value: String,
    },

    /// `host:port` 형식이 유효하지 않음
    #[error("잘못된 소켓 주소: {0}")]
    InvalidAddress(#[from] std::net::AddrParseError),
}

impl ConfigError {
    /// 잘못된 값 에러를 생성합니다.
    pub fn invalid(key: impl Into<String>, value: impl ToString) -> Self {
        Self::InvalidValue {
            key: key.into(),
            value: value.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_close_detection() {
        assert!(StreamError::ConnectionClosed.is_clean_close());
        assert!(!StreamError::transport("reset by peer").is_clean_close());
    }

    #[test]
    fn test_reason_codes() {
        assert_eq!(StreamError::ConnectionClosed.reason_code(), "closed");
        assert_eq!(StreamError::transport("boom").reason_code(), "transport");

        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(StreamError::from(json_err).reason_code(), "serialization");
    }

    #[test]
    fn test_config_error_message() {
        let err = ConfigError::invalid("STREAM_MODE", "sideways");
        assert!(err.to_string().contains("STREAM_MODE=sideways"));
    }
}
