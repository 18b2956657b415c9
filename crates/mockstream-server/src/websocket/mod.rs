//! 합성 값 스트리밍을 위한 WebSocket 서버.
//!
//! 연결마다 독립된 루프가 돌며, 수신과 송신 주기를 경쟁시킵니다.
//!
//! # 메시지 형식
//!
//! ## 서버 → 클라이언트
//!
//! 매 주기마다 JSON 객체 하나를 텍스트 프레임으로 보냅니다.
//!
//! ```json
//! {"key_0": {"key": [{"name": "Mina Park", "address": "12 Harbor Road, Seoul", "email": "mina.park7@example.com"}]}, "key_1": {"key_0": 0.25}}
//! {"key": {"key_0": ["banana", 42, null], "key_1": true}}
//! ```
//!
//! ## 클라이언트 → 서버
//!
//! 어떤 메시지든 받을 수 있으며 내용은 해석하지 않고 로그만 남깁니다.
//! 메시지를 받으면 진행 중이던 송신 주기(남은 대기 포함)는 취소됩니다.

pub mod connection;
pub mod handler;
pub mod messages;

pub use connection::{Connection, ConnectionSummary};
pub use handler::{websocket_handler, websocket_router};
pub use messages::InboundFrame;
