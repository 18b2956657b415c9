//! WebSocket 스트림 관찰.
//!
//! 서버에 접속해 지정한 메시지를 먼저 보낸 뒤, 받은 프레임을 하나씩 출력합니다.

use std::io::Write;

use anyhow::{Context, Result};
use futures::{SinkExt, StreamExt};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info, warn};

/// 관찰 설정.
#[derive(Debug, Clone)]
pub struct WatchConfig {
    /// 접속할 WebSocket URL
    pub url: String,
    /// 접속 직후 보낼 텍스트 메시지
    pub send: Vec<String>,
    /// 출력할 최대 프레임 수 (없으면 연결이 끝날 때까지)
    pub count: Option<usize>,
    /// JSON 들여쓰기 없이 원문 출력
    pub raw: bool,
}

/// 서버에 접속해 프레임을 `out`에 출력합니다.
///
/// 출력한 프레임 수를 반환합니다.
pub async fn watch<W: Write>(config: &WatchConfig, out: &mut W) -> Result<usize> {
    let (mut socket, response) = connect_async(config.url.as_str())
        .await
        .with_context(|| format!("{} 접속 실패", config.url))?;
    info!(url = %config.url, status = %response.status(), "Connected");

    for text in &config.send {
        socket
            .send(Message::Text(text.clone()))
            .await
            .context("메시지 전송 실패")?;
        debug!(message = %text, "Sent");
    }

    let mut printed = 0;
    while config.count.map_or(true, |limit| printed < limit) {
        let message = match socket.next().await {
            Some(Ok(message)) => message,
            Some(Err(e)) => {
                warn!(error = %e, "Connection error");
                break;
            }
            None => break,
        };

        let is_close = message.is_close();
        writeln!(out, "{}", render_frame(&message, config.raw))?;
        printed += 1;

        if is_close {
            break;
        }
    }

    // 서버가 이미 닫았다면 실패해도 무시
    let _ = socket.close(None).await;

    info!(frames = printed, "Watch finished");
    Ok(printed)
}

/// 프레임 하나를 출력용 문자열로 변환합니다.
///
/// JSON 텍스트/바이너리 프레임은 들여쓰기하고, 제어 프레임은 내용을 설명합니다.
pub fn render_frame(message: &Message, raw: bool) -> String {
    match message {
        Message::Text(text) if raw => text.clone(),
        Message::Text(text) => match pretty_json(text.as_bytes()) {
            Some(pretty) => format!("Text: {pretty}"),
            None => format!("Text: {text}"),
        },
        Message::Binary(data) => match (raw, pretty_json(data)) {
            (false, Some(pretty)) => format!("Binary: {pretty}"),
            (true, Some(_)) => format!("Binary: {}", String::from_utf8_lossy(data)),
            (_, None) => format!("Binary: <{} bytes>", data.len()),
        },
        Message::Ping(data) => format!("Ping: {data:?}"),
        Message::Pong(data) => format!("Pong: {data:?}"),
        Message::Close(Some(frame)) => format!(
            "Close: code={}, reason={}",
            u16::from(frame.code),
            frame.reason
        ),
        Message::Close(None) => "Close: no details".to_string(),
        Message::Frame(_) => "Frame: <raw>".to_string(),
    }
}

fn pretty_json(bytes: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(bytes).ok()?;
    serde_json::to_string_pretty(&value).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_tungstenite::tungstenite::protocol::{frame::coding::CloseCode, CloseFrame};

    #[test]
    fn test_json_text_is_pretty_printed() {
        let rendered = render_frame(&Message::Text(r#"{"key":[1,2]}"#.to_string()), false);

        assert!(rendered.starts_with("Text: {\n"));
        assert!(rendered.contains("\"key\": ["));
    }

    #[test]
    fn test_raw_text_is_untouched() {
        let rendered = render_frame(&Message::Text(r#"{"key":1}"#.to_string()), true);
        assert_eq!(rendered, r#"{"key":1}"#);
    }

    #[test]
    fn test_plain_text_is_printed_as_is() {
        let rendered = render_frame(&Message::Text("hello".to_string()), false);
        assert_eq!(rendered, "Text: hello");
    }

    #[test]
    fn test_binary_frames() {
        let json = render_frame(&Message::Binary(br#"{"a":true}"#.to_vec()), false);
        assert!(json.starts_with("Binary: {\n"));

        let opaque = render_frame(&Message::Binary(vec![0xff, 0x00]), false);
        assert_eq!(opaque, "Binary: <2 bytes>");
    }

    #[test]
    fn test_control_frames() {
        assert_eq!(render_frame(&Message::Ping(vec![1]), false), "Ping: [1]");
        assert_eq!(render_frame(&Message::Close(None), false), "Close: no details");

        let close = Message::Close(Some(CloseFrame {
            code: CloseCode::Normal,
            reason: "bye".into(),
        }));
        assert_eq!(render_frame(&close, false), "Close: code=1000, reason=bye");
    }
}
