// region:    --- Imports
use crate::error::{Result, StorefrontError};
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

// endregion: --- Imports

// region:    --- Config

pub const DEFAULT_API_URL: &str = "http://localhost:5000";
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;
pub const DEFAULT_PAGE_SIZE: usize = 100;
pub const DEFAULT_TICK_MS: u64 = 1000;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// 스토어프론트 설정
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub http_timeout: Duration,
    pub search_debounce: Duration,
    pub search_page_size: usize,
    pub countdown_tick: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            search_debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            search_page_size: DEFAULT_PAGE_SIZE,
            countdown_tick: Duration::from_millis(DEFAULT_TICK_MS),
        }
    }
}

impl Config {
    /// 환경 변수에서 설정 로드
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 키 조회 함수로 설정 로드
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("STOREFRONT_API_URL")
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        if !api_url.starts_with("http://") && !api_url.starts_with("https://") {
            return Err(StorefrontError::Config(format!(
                "STOREFRONT_API_URL 은 http(s) URL 이어야 합니다: {}",
                api_url
            )));
        }

        let timeout_secs: u64 = parse_or(
            &lookup,
            "STOREFRONT_HTTP_TIMEOUT_SECS",
            DEFAULT_HTTP_TIMEOUT_SECS,
        )?;
        let debounce_ms: u64 =
            parse_or(&lookup, "STOREFRONT_SEARCH_DEBOUNCE_MS", DEFAULT_DEBOUNCE_MS)?;
        let page_size: usize = parse_or(&lookup, "STOREFRONT_SEARCH_PAGE_SIZE", DEFAULT_PAGE_SIZE)?;
        let tick_ms: u64 = parse_or(&lookup, "STOREFRONT_COUNTDOWN_TICK_MS", DEFAULT_TICK_MS)?;

        if page_size == 0 {
            return Err(StorefrontError::Config(
                "STOREFRONT_SEARCH_PAGE_SIZE 는 0보다 커야 합니다".to_string(),
            ));
        }
        if tick_ms == 0 {
            return Err(StorefrontError::Config(
                "STOREFRONT_COUNTDOWN_TICK_MS 는 0보다 커야 합니다".to_string(),
            ));
        }

        let config = Self {
            api_url,
            http_timeout: Duration::from_secs(timeout_secs),
            search_debounce: Duration::from_millis(debounce_ms),
            search_page_size: page_size,
            countdown_tick: Duration::from_millis(tick_ms),
        };
        info!("{:<12} --> 설정 로드 완료: {}", "Config", config.api_url);
        Ok(config)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| StorefrontError::Config(format!("{} 값이 잘못되었습니다: {}", key, e))),
        None => Ok(default),
    }
}

// endregion: --- Config
