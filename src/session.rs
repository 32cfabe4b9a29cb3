/// 로그인 세션 저장소
/// 전역 상태 대신 명시적으로 전달되는 객체. login 으로 시작하고 logout 으로 정리한다.
// region:    --- Imports
use crate::error::{Result, StorefrontError};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::info;

// endregion: --- Imports

// region:    --- Session

pub const MIN_PASSWORD_LEN: usize = 8;

// 사용자 정보 (응답에서 사용하는 필드만)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub user: Option<UserProfile>,
    pub logged_in_at: DateTime<Utc>,
}

/// 세션 저장소
#[derive(Debug, Default)]
pub struct SessionStore {
    current: RwLock<Option<Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 세션 시작
    pub fn login(&self, token: String, user: Option<UserProfile>) {
        info!("{:<12} --> 로그인 세션 시작", "Session");
        *self.current.write() = Some(Session {
            token,
            user,
            logged_in_at: Utc::now(),
        });
    }

    /// 세션 정리
    pub fn logout(&self) -> Option<Session> {
        info!("{:<12} --> 로그인 세션 종료", "Session");
        self.current.write().take()
    }

    pub fn token(&self) -> Option<String> {
        self.current.read().as_ref().map(|session| session.token.clone())
    }

    pub fn session(&self) -> Option<Session> {
        self.current.read().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.read().is_some()
    }
}

// endregion: --- Session

// region:    --- Credential Validation

/// 이메일 형식 검사 (local@domain.tld 수준)
pub fn validate_email(email: &str) -> Result<()> {
    let email = email.trim();
    if email.is_empty() {
        return Err(StorefrontError::Validation("이메일을 입력하세요".to_string()));
    }
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .split_once('.')
                    .map_or(false, |(host, tld)| !host.is_empty() && !tld.is_empty())
        }
        None => false,
    };
    if !valid {
        return Err(StorefrontError::Validation(format!(
            "이메일 형식이 올바르지 않습니다: {}",
            email
        )));
    }
    Ok(())
}

/// 비밀번호 강도 (대문자/소문자/숫자/특수문자 중 몇 종류를 쓰는지)
pub fn password_strength(password: &str) -> usize {
    let classes = [
        password.chars().any(|c| c.is_ascii_uppercase()),
        password.chars().any(|c| c.is_ascii_lowercase()),
        password.chars().any(|c| c.is_ascii_digit()),
        password.chars().any(|c| !c.is_alphanumeric()),
    ];
    classes.iter().filter(|present| **present).count()
}

/// 비밀번호 검사: 8자 이상, 문자 종류 3가지 이상
pub fn validate_password(password: &str) -> Result<()> {
    if password.is_empty() {
        return Err(StorefrontError::Validation(
            "비밀번호를 입력하세요".to_string(),
        ));
    }
    if password.chars().count() < MIN_PASSWORD_LEN || password_strength(password) < 3 {
        return Err(StorefrontError::Validation(
            "비밀번호는 8자 이상이며 대문자, 소문자, 숫자, 특수문자 중 3가지 이상을 포함해야 합니다"
                .to_string(),
        ));
    }
    Ok(())
}

// endregion: --- Credential Validation
