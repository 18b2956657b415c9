//! 모의 스트리밍 서버용 개발 도구.
//!
//! - `watch`: 서버에 접속해 받은 프레임을 보기 좋게 출력
//! - `sample`: 서버 없이 생성기 출력 확인

pub mod commands;
