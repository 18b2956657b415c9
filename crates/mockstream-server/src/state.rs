//! 서버 공유 상태.
//!
//! 연결 루프끼리는 상태를 공유하지 않습니다. 여기 있는 것은 설정, 종료 토큰,
//! 그리고 헬스 체크용 연결 카운터뿐입니다.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use mockstream_core::{Generator, StreamSettings};
use tokio_util::sync::CancellationToken;

use crate::metrics::{record_connection_opened, record_connection_released};

/// 핸들러 간에 공유되는 서버 상태.
#[derive(Clone)]
pub struct ServerState {
    /// 연결별 스트림 설정
    pub settings: Arc<StreamSettings>,
    /// 연결 카운터
    pub connections: ConnectionTracker,
    /// 서버 종료 토큰 (취소되면 모든 연결 루프가 종료됨)
    pub shutdown: CancellationToken,
    /// 서버 시작 시각
    pub started_at: DateTime<Utc>,
}

impl ServerState {
    /// 새로운 서버 상태 생성.
    pub fn new(settings: StreamSettings, shutdown: CancellationToken) -> Self {
        Self {
            settings: Arc::new(settings),
            connections: ConnectionTracker::default(),
            shutdown,
            started_at: Utc::now(),
        }
    }

    /// `index`번째 연결에 쓸 생성기.
    ///
    /// 시드가 설정되어 있으면 `seed + index`로 고정하고, 아니면 엔트로피를 씁니다.
    pub fn generator_for(&self, index: u64) -> Generator {
        let generator = match self.settings.seed_for(index) {
            Some(seed) => Generator::seeded(seed),
            None => Generator::from_entropy(),
        };
        generator.with_initial_depth(self.settings.initial_depth)
    }

    /// 서버 업타임(초).
    pub fn uptime_secs(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds()
    }
}

/// 활성/누적 연결 수 추적기.
#[derive(Clone, Default)]
pub struct ConnectionTracker {
    active: Arc<AtomicUsize>,
    total: Arc<AtomicU64>,
}

impl ConnectionTracker {
    /// 새 연결을 등록하고 해제용 guard를 반환합니다.
    pub fn open(&self) -> ConnectionGuard {
        let index = self.total.fetch_add(1, Ordering::SeqCst);
        self.active.fetch_add(1, Ordering::SeqCst);
        record_connection_opened();

        ConnectionGuard {
            active: Arc::clone(&self.active),
            index,
        }
    }

    /// 현재 열린 연결 수.
    pub fn active(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    /// 지금까지 수락한 연결 수.
    pub fn total(&self) -> u64 {
        self.total.load(Ordering::SeqCst)
    }
}

/// 연결 하나의 수명 동안 유지되는 guard.
///
/// drop될 때 활성 연결 수를 정확히 한 번 감소시킵니다.
#[derive(Debug)]
pub struct ConnectionGuard {
    active: Arc<AtomicUsize>,
    index: u64,
}

impl ConnectionGuard {
    /// 0부터 시작하는 연결 순번.
    pub fn index(&self) -> u64 {
        self.index
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
        record_connection_released();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_releases_exactly_once() {
        let tracker = ConnectionTracker::default();

        let first = tracker.open();
        let second = tracker.open();
        assert_eq!(first.index(), 0);
        assert_eq!(second.index(), 1);
        assert_eq!(tracker.active(), 2);

        drop(first);
        assert_eq!(tracker.active(), 1);
        drop(second);
        assert_eq!(tracker.active(), 0);
        assert_eq!(tracker.total(), 2);
    }

    #[test]
    fn test_seeded_generators_differ_per_connection() {
        let settings = StreamSettings {
            seed: Some(10),
            ..Default::default()
        };
        let state = ServerState::new(settings, CancellationToken::new());

        let mut again = state.generator_for(0);
        assert_eq!(state.generator_for(0).payload(), again.payload());
        assert_eq!(state.generator_for(0).initial_depth(), 4);

        let a: Vec<_> = {
            let mut g = state.generator_for(0);
            (0..5).map(|_| g.payload()).collect()
        };
        let b: Vec<_> = {
            let mut g = state.generator_for(1);
            (0..5).map(|_| g.payload()).collect()
        };
        assert_ne!(a, b);
    }
}
