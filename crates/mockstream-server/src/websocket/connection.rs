//! 연결 루프.
//!
//! 연결 하나를 소유하고 "다음 수신 메시지 대기"와 "생성 → 송신 → 대기" 주기를
//! 경쟁시킵니다. 먼저 끝난 쪽을 처리하고 다른 쪽은 취소한 뒤 다시 반복하며,
//! 연결이 닫히거나 전송 오류가 나면 종료합니다.
//!
//! 쓰기 절반과 읽기 절반에 대해 제네릭이므로 axum WebSocket을 `split()`한 결과와
//! 테스트용 인메모리 채널 모두에서 동작합니다.

use std::fmt::Display;
use std::time::Duration;

use axum::extract::ws::Message;
use futures::{Sink, SinkExt, Stream, StreamExt};
use mockstream_core::{Generator, StreamError, StreamMode, StreamResult, StreamSettings, SyntheticValue};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::messages::InboundFrame;
use crate::metrics::{record_connection_closed, record_message_received, record_message_sent};

/// 송신이 끝난 값과 직렬화된 크기.
#[derive(Debug, Clone)]
struct SentFrame {
    value: SyntheticValue,
    bytes: usize,
}

/// 싱크에 넘겨진 프레임과 flush 완료 여부.
#[derive(Debug)]
struct InFlight {
    frame: SentFrame,
    flushed: bool,
}

/// 한 번의 경쟁 결과.
enum Race<E> {
    /// 수신이 먼저 끝남 (`None`이면 스트림 종료)
    Inbound(Option<Result<Message, E>>),
    /// 송신 주기가 먼저 끝남
    Sent(StreamResult<SentFrame>),
}

/// 연결 하나의 루프 상태.
pub struct Connection<W, R> {
    peer: String,
    writer: W,
    reader: R,
    generator: Generator,
    interval: Duration,
    mode: StreamMode,
    sent: u64,
    received: u64,
}

/// 종료된 연결의 요약.
#[derive(Debug)]
pub struct ConnectionSummary {
    /// 원격 피어
    pub peer: String,
    /// 송신 완료된 값 수
    pub sent: u64,
    /// 수신한 메시지 수 (close 프레임 제외)
    pub received: u64,
    /// 종료 사유
    pub reason: StreamError,
    /// 연결 유지 시간
    pub elapsed: Duration,
}

impl ConnectionSummary {
    /// 종료 로그 출력
    pub fn log(&self) {
        if self.reason.is_clean_close() {
            info!(
                peer = %self.peer,
                sent = self.sent,
                received = self.received,
                elapsed = format!("{:.1}s", self.elapsed.as_secs_f64()),
                "Connection with client {} closed", self.peer
            );
        } else {
            warn!(
                peer = %self.peer,
                sent = self.sent,
                received = self.received,
                elapsed = format!("{:.1}s", self.elapsed.as_secs_f64()),
                reason = %self.reason,
                "Connection with client {} terminated", self.peer
            );
        }
    }
}

impl<W, R, E> Connection<W, R>
where
    W: Sink<Message> + Unpin,
    <W as Sink<Message>>::Error: Display,
    R: Stream<Item = Result<Message, E>> + Unpin,
    E: Display,
{
    /// 새 연결 루프 생성.
    pub fn new(
        peer: impl Into<String>,
        writer: W,
        reader: R,
        generator: Generator,
        settings: &StreamSettings,
    ) -> Self {
        Self {
            peer: peer.into(),
            writer,
            reader,
            generator,
            interval: settings.interval(),
            mode: settings.mode,
            sent: 0,
            received: 0,
        }
    }

    /// 연결이 닫힐 때까지 루프를 실행합니다.
    ///
    /// 종료 후 쓰기/읽기 절반은 이 함수 안에서 drop되어 정확히 한 번 해제됩니다.
    pub async fn run(mut self) -> ConnectionSummary {
        let started = Instant::now();

        let reason = loop {
            let step = match self.mode {
                StreamMode::Duplex => self.step_duplex().await,
                StreamMode::PushOnly => self.step_push().await,
            };
            if let Err(reason) = step {
                break reason;
            }
        };

        record_connection_closed(reason.reason_code());

        ConnectionSummary {
            peer: self.peer,
            sent: self.sent,
            received: self.received,
            reason,
            elapsed: started.elapsed(),
        }
    }

    /// 수신과 송신 주기를 한 번 경쟁시킵니다.
    ///
    /// 수신을 먼저 poll하므로 클라이언트가 쉬지 않고 메시지를 보내면 송신 주기는
    /// 한 번도 시작되지 못합니다.
    async fn step_duplex(&mut self) -> StreamResult<()> {
        let mut in_flight = None;

        let race = tokio::select! {
            biased;
            inbound = self.reader.next() => Race::Inbound(inbound),
            sent = send_cycle(
                &mut self.writer,
                &mut self.generator,
                self.interval,
                &mut in_flight,
            ) => Race::Sent(sent),
        };

        match race {
            Race::Inbound(inbound) => {
                let pending = in_flight.take();

                let message = match inbound {
                    Some(Ok(message @ Message::Close(_))) => {
                        debug!(peer = %self.peer, frame = %InboundFrame::from_message(&message), "Close frame received");
                        self.settle_on_exit(pending);
                        return Err(StreamError::ConnectionClosed);
                    }
                    Some(Ok(message)) => message,
                    Some(Err(e)) => {
                        self.settle_on_exit(pending);
                        return Err(StreamError::transport(e));
                    }
                    None => {
                        self.settle_on_exit(pending);
                        return Err(StreamError::ConnectionClosed);
                    }
                };

                // 취소된 송신 주기가 넘긴 프레임은 flush가 끝나야 송신으로 집계
                self.writer.flush().await.map_err(StreamError::transport)?;
                if let Some(in_flight) = pending {
                    self.record_sent(&in_flight.frame, true);
                }

                self.record_received(&message);
                Ok(())
            }
            Race::Sent(sent) => {
                self.record_sent(&sent?, false);
                Ok(())
            }
        }
    }

    /// 종료 경로에서 취소된 송신 주기의 프레임을 정리합니다.
    ///
    /// flush까지 끝난 프레임만 송신으로 집계하고, 싱크 버퍼에 남은 프레임은 버립니다.
    fn settle_on_exit(&mut self, pending: Option<InFlight>) {
        match pending {
            Some(in_flight) if in_flight.flushed => self.record_sent(&in_flight.frame, true),
            Some(in_flight) => {
                debug!(
                    peer = %self.peer,
                    kind = in_flight.frame.value.kind(),
                    "Discarded unflushed value"
                );
            }
            None => {}
        }
    }

    /// 축소 모드: 수신을 보지 않고 생성 → 송신 → 대기.
    async fn step_push(&mut self) -> StreamResult<()> {
        let mut in_flight = None;
        let frame = send_cycle(
            &mut self.writer,
            &mut self.generator,
            self.interval,
            &mut in_flight,
        )
        .await?;
        self.record_sent(&frame, false);
        Ok(())
    }

    fn record_sent(&mut self, frame: &SentFrame, delay_skipped: bool) {
        self.sent += 1;
        record_message_sent(frame.value.kind());

        info!(
            peer = %self.peer,
            seq = self.sent,
            kind = frame.value.kind(),
            bytes = frame.bytes,
            delay_skipped,
            "Sent value"
        );
        debug!(peer = %self.peer, payload = ?frame.value, "Sent payload");
    }

    fn record_received(&mut self, message: &Message) {
        let frame = InboundFrame::from_message(message);
        self.received += 1;
        record_message_received(frame.kind);

        info!(peer = %self.peer, seq = self.received, "Received: {}", frame);
    }
}

/// 송신 주기: 생성 → 직렬화 → 싱크에 전달 → flush → 고정 대기.
///
/// 싱크에 프레임을 넘기는 즉시 `in_flight`에 기록하고 flush가 끝나면 표시하므로,
/// 이 future가 중간에 취소되어도 호출자는 프레임이 어디까지 나갔는지 알 수 있습니다.
async fn send_cycle<W>(
    writer: &mut W,
    generator: &mut Generator,
    interval: Duration,
    in_flight: &mut Option<InFlight>,
) -> StreamResult<SentFrame>
where
    W: Sink<Message> + Unpin,
    <W as Sink<Message>>::Error: Display,
{
    let value = generator.payload();
    let json = value.to_json()?;
    let frame = SentFrame {
        value,
        bytes: json.len(),
    };

    writer
        .feed(Message::Text(json.into()))
        .await
        .map_err(StreamError::transport)?;
    *in_flight = Some(InFlight {
        frame: frame.clone(),
        flushed: false,
    });

    writer.flush().await.map_err(StreamError::transport)?;
    if let Some(in_flight) = in_flight.as_mut() {
        in_flight.flushed = true;
    }
    tokio::time::sleep(interval).await;

    Ok(frame)
}
