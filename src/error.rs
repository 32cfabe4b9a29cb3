// region:    --- Imports
use thiserror::Error;

// endregion: --- Imports

// region:    --- Error

/// 스토어프론트 공통 에러
#[derive(Error, Debug)]
pub enum StorefrontError {
    #[error("HTTP 요청 실패: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API 오류 (status={status}): {message}")]
    Api { status: u16, message: String },

    #[error("응답 파싱 실패: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("입력 검증 실패: {0}")]
    Validation(String),

    #[error("요청이 취소되었습니다")]
    Cancelled,

    #[error("설정 오류: {0}")]
    Config(String),

    #[error("IO 오류: {0}")]
    Io(#[from] std::io::Error),
}

impl StorefrontError {
    /// 취소된 요청은 실패로 취급하지 않는다
    pub fn is_cancelled(&self) -> bool {
        matches!(self, StorefrontError::Cancelled)
    }
}

pub type Result<T> = std::result::Result<T, StorefrontError>;

// endregion: --- Error
