use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// 카탈로그 모델 (catalogName 이 고유 키)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    pub catalog_name: String,
    #[serde(default)]
    pub auctions: Vec<Auction>,
}

impl Catalog {
    /// 카탈로그의 표시 시작 시간은 첫 번째 경매가 결정한다
    pub fn first_auction(&self) -> Option<&Auction> {
        self.auctions.first()
    }

    pub fn start_date(&self) -> Option<DateTime<Utc>> {
        self.first_auction().and_then(|auction| auction.start_date)
    }

    pub fn cover_image(&self) -> Option<&str> {
        self.first_auction()
            .and_then(|auction| auction.product.as_ref())
            .and_then(|product| product.image.first())
            .map(String::as_str)
    }
}

// 경매 모델 (화면에서 사용하는 필드만)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Auction {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub product: Option<AuctionProduct>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuctionProduct {
    #[serde(default)]
    pub image: Vec<String>,
    #[serde(default)]
    pub title: String,
}

// 상품 모델 (검색 및 즉시 구매 목록)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub image: Vec<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}
