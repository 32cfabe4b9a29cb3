/// 경매 상태 판별 및 카운트다운 계산
/// 종료 시간 검사는 하지 않는다. 한번 시작된 카탈로그는 계속 Live 로 남는다.
// region:    --- Imports
use super::model::Catalog;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

// endregion: --- Imports

// region:    --- Auction Status

const MS_PER_DAY: i64 = 86_400_000;
const MS_PER_HOUR: i64 = 3_600_000;
const MS_PER_MINUTE: i64 = 60_000;
const MS_PER_SECOND: i64 = 1000;

/// 카탈로그 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AuctionStatus {
    Live,
    Upcoming,
    Scheduled,
}

impl AuctionStatus {
    pub fn label(&self) -> &'static str {
        match self {
            AuctionStatus::Live => "LIVE",
            AuctionStatus::Upcoming => "UPCOMING",
            AuctionStatus::Scheduled => "SCHEDULED",
        }
    }
}

/// 카탈로그 상태 판별
pub fn classify(catalog: &Catalog, now: DateTime<Utc>) -> AuctionStatus {
    match catalog.start_date() {
        Some(start) if start <= now => AuctionStatus::Live,
        Some(_) => AuctionStatus::Upcoming,
        None => AuctionStatus::Scheduled,
    }
}

// endregion: --- Auction Status

// region:    --- Countdown

/// 시작까지 남은 시간
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Countdown {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl Countdown {
    pub const ZERO: Countdown = Countdown {
        days: 0,
        hours: 0,
        minutes: 0,
        seconds: 0,
    };

    /// start - now 를 일/시/분/초로 분해 (이미 시작된 경우 0)
    pub fn until(start: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let diff = (start - now).num_milliseconds();
        if diff <= 0 {
            return Self::ZERO;
        }

        let days = diff / MS_PER_DAY;
        let rem = diff % MS_PER_DAY;
        let hours = rem / MS_PER_HOUR;
        let rem = rem % MS_PER_HOUR;
        let minutes = rem / MS_PER_MINUTE;
        let rem = rem % MS_PER_MINUTE;
        let seconds = rem / MS_PER_SECOND;

        Self {
            days: days as u64,
            hours: hours as u64,
            minutes: minutes as u64,
            seconds: seconds as u64,
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

impl std::fmt::Display for Countdown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}d {:02}h {:02}m {:02}s",
            self.days, self.hours, self.minutes, self.seconds
        )
    }
}

/// 카탈로그 카운트다운 (날짜를 알 수 없으면 0)
pub fn catalog_countdown(catalog: &Catalog, now: DateTime<Utc>) -> Countdown {
    catalog
        .start_date()
        .map(|start| Countdown::until(start, now))
        .unwrap_or(Countdown::ZERO)
}

/// 예정된 카탈로그 전체의 카운트다운 맵 (catalogName 기준)
pub fn countdown_map(catalogs: &[Catalog], now: DateTime<Utc>) -> HashMap<String, Countdown> {
    catalogs
        .iter()
        .filter(|catalog| classify(catalog, now) == AuctionStatus::Upcoming)
        .map(|catalog| {
            (
                catalog.catalog_name.clone(),
                catalog_countdown(catalog, now),
            )
        })
        .collect()
}

// endregion: --- Countdown
