//! 수신 메시지 요약.
//!
//! 클라이언트가 보낸 메시지는 해석하지 않고 로그용 요약만 만듭니다.

use std::fmt;

use axum::extract::ws::Message;

/// 로그에 남길 미리보기 최대 글자 수.
const PREVIEW_CHARS: usize = 120;

/// 수신 프레임 요약.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundFrame {
    /// 프레임 종류 ("text", "binary", "ping", "pong", "close")
    pub kind: &'static str,
    /// 페이로드 바이트 수
    pub len: usize,
    /// 잘라낸 미리보기
    pub preview: String,
    /// 페이로드가 JSON으로 파싱되는지 여부
    pub is_json: bool,
}

impl InboundFrame {
    /// 메시지에서 요약 생성.
    pub fn from_message(message: &Message) -> Self {
        match message {
            Message::Text(text) => Self::payload("text", text.as_str().as_bytes()),
            Message::Binary(data) => Self::payload("binary", data),
            Message::Ping(data) => Self::control("ping", data.len(), String::new()),
            Message::Pong(data) => Self::control("pong", data.len(), String::new()),
            Message::Close(Some(frame)) => Self::control(
                "close",
                frame.reason.as_str().len(),
                format!("code={}, reason={}", frame.code, frame.reason.as_str()),
            ),
            Message::Close(None) => Self::control("close", 0, "no details".to_string()),
        }
    }

    fn payload(kind: &'static str, bytes: &[u8]) -> Self {
        let is_json = serde_json::from_slice::<serde_json::Value>(bytes).is_ok();
        let preview = match std::str::from_utf8(bytes) {
            Ok(text) => truncate(text, PREVIEW_CHARS),
            Err(_) => format!("<{} bytes>", bytes.len()),
        };

        Self {
            kind,
            len: bytes.len(),
            preview,
            is_json,
        }
    }

    fn control(kind: &'static str, len: usize, preview: String) -> Self {
        Self {
            kind,
            len,
            preview,
            is_json: false,
        }
    }
}

impl fmt::Display for InboundFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} bytes", self.kind, self.len)?;
        if self.is_json {
            write!(f, ", json")?;
        }
        write!(f, ")")?;
        if !self.preview.is_empty() {
            write!(f, ": {}", self.preview)?;
        }
        Ok(())
    }
}

/// 문자 경계를 지키며 `max_chars`자로 자릅니다.
fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => format!("{}…", &text[..end]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::ws::CloseFrame;

    #[test]
    fn test_text_json_frame() {
        let frame = InboundFrame::from_message(&Message::Text(r#"{"type":"subscribe"}"#.into()));

        assert_eq!(frame.kind, "text");
        assert!(frame.is_json);
        assert_eq!(frame.len, 20);
        assert_eq!(frame.to_string(), r#"text (20 bytes, json): {"type":"subscribe"}"#);
    }

    #[test]
    fn test_plain_text_frame() {
        let frame = InboundFrame::from_message(&Message::Text("hello".into()));

        assert!(!frame.is_json);
        assert_eq!(frame.to_string(), "text (5 bytes): hello");
    }

    #[test]
    fn test_binary_non_utf8_frame() {
        let frame = InboundFrame::from_message(&Message::Binary(vec![0xff, 0xfe, 0x00].into()));

        assert_eq!(frame.kind, "binary");
        assert_eq!(frame.preview, "<3 bytes>");
    }

    #[test]
    fn test_close_frame() {
        let frame = InboundFrame::from_message(&Message::Close(Some(CloseFrame {
            code: 1000,
            reason: "bye".into(),
        })));

        assert_eq!(frame.kind, "close");
        assert_eq!(frame.preview, "code=1000, reason=bye");
    }

    #[test]
    fn test_long_text_is_truncated_on_char_boundary() {
        let text = "가".repeat(PREVIEW_CHARS + 10);
        let frame = InboundFrame::from_message(&Message::Text(text.into()));

        assert_eq!(frame.preview.chars().count(), PREVIEW_CHARS + 1);
        assert!(frame.preview.ends_with('…'));
    }
}
