//! # Mockstream Core
//!
//! 모의 스트리밍 서버의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 서버와 CLI 전반에서 사용되는 기본 요소를 제공합니다:
//! - 합성 값 모델 ([`SyntheticValue`], [`UserRecord`])
//! - 깊이 제한이 있는 재귀 생성기 ([`Generator`])
//! - 환경 변수 기반 설정 관리
//! - 에러 타입
//! - 로깅 인프라

pub mod config;
pub mod error;
pub mod generator;
pub mod logging;
pub mod record;
pub mod value;

pub use config::*;
pub use error::*;
pub use generator::*;
pub use logging::*;
pub use record::UserRecord;
pub use value::SyntheticValue;
