// region:    --- Imports
use crate::auction::model::{Catalog, Product};
use crate::session::UserProfile;
use serde::{Deserialize, Serialize};

// endregion: --- Imports

// region:    --- Envelopes

/// 응답의 status 필드 (백엔드마다 bool/숫자/문자열로 섞여 온다)
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ApiStatus {
    Flag(bool),
    Code(i64),
    Text(String),
}

impl ApiStatus {
    pub fn is_ok(&self) -> bool {
        match self {
            ApiStatus::Flag(flag) => *flag,
            ApiStatus::Code(code) => (200..300).contains(code),
            ApiStatus::Text(text) => {
                matches!(text.to_ascii_lowercase().as_str(), "success" | "ok" | "true")
            }
        }
    }
}

/// items 가 반드시 있어야 하는 응답
#[derive(Debug, Deserialize)]
pub struct ItemsEnvelope<T> {
    #[serde(default)]
    pub status: Option<ApiStatus>,
    pub items: T,
    #[serde(default)]
    pub message: Option<String>,
}

/// message 만 있는 응답
#[derive(Debug, Deserialize)]
pub struct MessageEnvelope {
    #[serde(default)]
    pub status: Option<ApiStatus>,
    #[serde(default)]
    pub message: Option<String>,
}

/// 실패 응답 본문
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

// endregion: --- Envelopes

// region:    --- Payloads

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogList {
    #[serde(default)]
    pub catalogs: Vec<Catalog>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage {
    #[serde(default)]
    pub items: Vec<Product>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub total_pages: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginItems {
    pub token: String,
    #[serde(default)]
    pub user: Option<UserProfile>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerProfile {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub store_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

// endregion: --- Payloads

// region:    --- Requests

/// GET /v1/api/auction/bulk 쿼리
#[derive(Debug, Clone, Default, Serialize)]
pub struct AuctionQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upcoming: Option<bool>,
}

/// GET /v1/api/product/filter 쿼리
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl ProductFilter {
    pub fn search(query: &str) -> Self {
        Self {
            search: Some(query.to_string()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// 업로드할 이미지 파일
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

// endregion: --- Requests
