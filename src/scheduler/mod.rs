/// 카운트다운 갱신 스케줄러
/// 경매 상태 전이는 백엔드가 담당한다고 가정하고, 여기서는 화면용 카운트다운만 다시 계산한다.
/// 매 틱마다 예정된 카탈로그 전체의 맵을 새로 만들어 통째로 교체한다.
// region:    --- Imports
use crate::auction::model::Catalog;
use crate::auction::status::{countdown_map, Countdown};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

// endregion: --- Imports

// region:    --- Countdown Ticker

/// 0 주기는 interval 이 허용하지 않는다
const MIN_TICK: Duration = Duration::from_millis(1);

/// 현재 시각 공급자
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// catalogName -> 카운트다운
pub type CountdownMap = HashMap<String, Countdown>;

/// 카운트다운 갱신 스케줄러
pub struct CountdownTicker {
    cancel: CancellationToken,
    receiver: watch::Receiver<CountdownMap>,
    handle: Option<JoinHandle<()>>,
}

impl CountdownTicker {
    /// 시스템 시계로 스케줄러 시작
    pub fn start(catalogs: Vec<Catalog>, tick: Duration) -> Self {
        Self::start_with_clock(catalogs, tick, Arc::new(Utc::now))
    }

    /// 주어진 시계로 스케줄러 시작
    pub fn start_with_clock(catalogs: Vec<Catalog>, tick: Duration, clock: Clock) -> Self {
        let (sender, receiver) = watch::channel(countdown_map(&catalogs, clock()));
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        info!(
            "{:<12} --> 카운트다운 스케줄러 시작: 카탈로그 {}개",
            "Scheduler",
            catalogs.len()
        );

        let handle = tokio::spawn(async move {
            let mut interval = interval(tick.max(MIN_TICK));
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // 첫 틱은 즉시 반환되므로 건너뛴다 (초기값은 이미 발행됨)
            interval.tick().await;

            loop {
                tokio::select! {
                    _ = token.cancelled() => {
                        debug!("{:<12} --> 카운트다운 스케줄러 종료", "Scheduler");
                        break;
                    }
                    _ = interval.tick() => {
                        let map = countdown_map(&catalogs, clock());
                        if sender.send(map).is_err() {
                            break;
                        }
                    }
                }
            }
        });

        Self {
            cancel,
            receiver,
            handle: Some(handle),
        }
    }

    /// 카운트다운 맵 구독
    pub fn subscribe(&self) -> watch::Receiver<CountdownMap> {
        self.receiver.clone()
    }

    /// 현재 카운트다운 맵
    pub fn current(&self) -> CountdownMap {
        self.receiver.borrow().clone()
    }

    /// 스케줄러 중지 (여러 번 호출해도 안전)
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }

    /// 중지 후 작업 종료까지 대기
    pub async fn shutdown(&mut self) {
        self.stop();
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for CountdownTicker {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

// endregion: --- Countdown Ticker
