/// 백엔드 REST API 클라이언트
/// 경매, 결제, 인증 등 모든 비즈니스 로직은 백엔드가 담당하고 여기서는 요청/응답만 다룬다.
/// 응답은 스키마 구조체로 파싱한 뒤에만 사용한다.
// region:    --- Imports
pub mod schema;

use self::schema::{
    AuctionQuery, CatalogList, ErrorBody, ImageUpload, ItemsEnvelope, LoginItems,
    MessageEnvelope, ProductFilter, ProductPage, RegisterRequest, SellerProfile,
};
use crate::auction::model::{Catalog, Product};
use crate::config::Config;
use crate::error::{Result, StorefrontError};
use crate::search::ProductLookup;
use crate::session::{validate_email, validate_password, Session, SessionStore};
use crate::wizard::WizardSink;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, info, warn};

// endregion: --- Imports

// region:    --- Endpoints

/// Authorization 헤더 형식
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    /// `Bearer <token>`
    Bearer,
    /// `<token>`
    Raw,
    None,
}

/// 백엔드 엔드포인트
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    AuctionBulk,
    ProductFilter,
    Login,
    Register,
    Logout,
    VerifyEmail,
    ForgotPassword,
    FavoriteToggle,
    FavoriteAll,
    SellerCreate,
    SellerGet,
    UploadImages,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::AuctionBulk => "/v1/api/auction/bulk",
            Endpoint::ProductFilter => "/v1/api/product/filter",
            Endpoint::Login => "/v1/api/auth/login",
            Endpoint::Register => "/v1/api/auth/register",
            Endpoint::Logout => "/v1/api/auth/logout",
            Endpoint::VerifyEmail => "/v1/api/auth/verify-email",
            Endpoint::ForgotPassword => "/v1/api/auth/forgotPassword",
            Endpoint::FavoriteToggle => "/v1/api/favorite/toggle",
            Endpoint::FavoriteAll => "/v1/api/favorite/all",
            Endpoint::SellerCreate => "/v1/api/seller/create",
            Endpoint::SellerGet => "/v1/api/seller/getbyid",
            Endpoint::UploadImages => "/v1/api/uploadImg/upload-multiple",
        }
    }

    /// 엔드포인트별 헤더 형식.
    /// 백엔드가 기대하는 형식이 확인되기 전까지 호출부마다 쓰던 형식을 그대로 유지한다.
    pub fn auth_scheme(&self) -> AuthScheme {
        match self {
            Endpoint::FavoriteToggle | Endpoint::FavoriteAll | Endpoint::SellerGet => {
                AuthScheme::Bearer
            }
            Endpoint::Logout | Endpoint::SellerCreate | Endpoint::UploadImages => AuthScheme::Raw,
            _ => AuthScheme::None,
        }
    }
}

// endregion: --- Endpoints

// region:    --- Api Client

pub struct ApiClient {
    client: Client,
    base_url: String,
    session: Arc<SessionStore>,
}

impl ApiClient {
    pub fn new(config: &Config, session: Arc<SessionStore>) -> Result<Self> {
        let client = Client::builder().timeout(config.http_timeout).build()?;
        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn session(&self) -> Arc<SessionStore> {
        Arc::clone(&self.session)
    }

    fn url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }

    /// 엔드포인트 형식에 맞춰 Authorization 헤더 추가
    fn authorize(&self, request: RequestBuilder, endpoint: Endpoint) -> Result<RequestBuilder> {
        let scheme = endpoint.auth_scheme();
        if scheme == AuthScheme::None {
            return Ok(request);
        }
        let token = self.session.token().ok_or_else(|| {
            StorefrontError::Validation(format!("로그인이 필요합니다: {}", endpoint.path()))
        })?;
        let value = match scheme {
            AuthScheme::Bearer => format!("Bearer {}", token),
            _ => token,
        };
        Ok(request.header(reqwest::header::AUTHORIZATION, value))
    }

    /// 응답 상태 확인 후 본문 파싱
    async fn decode<T: DeserializeOwned>(endpoint: Endpoint, response: Response) -> Result<T> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let parsed: ErrorBody = serde_json::from_str(&body).unwrap_or_default();
            let message = parsed
                .message
                .or(parsed.error)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown").to_string());
            error!(
                "{:<12} --> {} 요청 실패 (status={}): {}",
                "Api",
                endpoint.path(),
                status.as_u16(),
                message
            );
            return Err(StorefrontError::Api {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            error!(
                "{:<12} --> {} 응답 형식 오류: {:?}",
                "Api",
                endpoint.path(),
                e
            );
            StorefrontError::Decode(e)
        })
    }

    /// 본문 status 가 실패를 나타내면 Api 에러로 변환
    fn ensure_ok(endpoint: Endpoint, status: Option<&schema::ApiStatus>, message: Option<&str>) -> Result<()> {
        match status {
            Some(status) if !status.is_ok() => {
                let message = message.unwrap_or("요청이 거부되었습니다").to_string();
                warn!("{:<12} --> {} 거부: {}", "Api", endpoint.path(), message);
                Err(StorefrontError::Api {
                    status: 200,
                    message,
                })
            }
            _ => Ok(()),
        }
    }

    async fn get_items<T, Q>(&self, endpoint: Endpoint, suffix: Option<&str>, query: Option<&Q>) -> Result<T>
    where
        T: DeserializeOwned,
        Q: serde::Serialize + ?Sized,
    {
        let mut url = Url::parse(&self.url(endpoint))
            .map_err(|e| StorefrontError::Config(format!("잘못된 API URL: {}", e)))?;
        if let Some(suffix) = suffix {
            url.path_segments_mut()
                .map_err(|_| StorefrontError::Config("경로를 붙일 수 없는 API URL".to_string()))?
                .push(suffix);
        }
        let mut request = self.client.get(url);
        if let Some(query) = query {
            request = request.query(query);
        }
        let request = self.authorize(request, endpoint)?;
        let envelope: ItemsEnvelope<T> = Self::decode(endpoint, request.send().await?).await?;
        Self::ensure_ok(endpoint, envelope.status.as_ref(), envelope.message.as_deref())?;
        Ok(envelope.items)
    }

    async fn post_items<T, B>(&self, endpoint: Endpoint, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: serde::Serialize + ?Sized,
    {
        let request = self.authorize(self.client.post(self.url(endpoint)).json(body), endpoint)?;
        let envelope: ItemsEnvelope<T> = Self::decode(endpoint, request.send().await?).await?;
        Self::ensure_ok(endpoint, envelope.status.as_ref(), envelope.message.as_deref())?;
        Ok(envelope.items)
    }

    async fn post_message<B>(&self, endpoint: Endpoint, body: &B) -> Result<String>
    where
        B: serde::Serialize + ?Sized,
    {
        let request = self.authorize(self.client.post(self.url(endpoint)).json(body), endpoint)?;
        let envelope: MessageEnvelope = Self::decode(endpoint, request.send().await?).await?;
        Self::ensure_ok(endpoint, envelope.status.as_ref(), envelope.message.as_deref())?;
        Ok(envelope.message.unwrap_or_default())
    }

    // region:    --- Catalog

    /// 경매 카탈로그 조회
    pub async fn fetch_catalogs(&self, query: &AuctionQuery) -> Result<Vec<Catalog>> {
        info!("{:<12} --> 경매 카탈로그 조회: {:?}", "Api", query);
        let list: CatalogList = self
            .get_items(Endpoint::AuctionBulk, None, Some(query))
            .await?;
        Ok(list.catalogs)
    }

    /// 상품 필터 조회
    pub async fn filter_products(&self, filter: &ProductFilter) -> Result<ProductPage> {
        info!("{:<12} --> 상품 필터 조회: {:?}", "Api", filter);
        self.get_items(Endpoint::ProductFilter, None, Some(filter))
            .await
    }

    // endregion: --- Catalog

    // region:    --- Auth

    /// 로그인 (성공 시 세션 저장)
    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        validate_email(email)?;
        if password.is_empty() {
            return Err(StorefrontError::Validation(
                "비밀번호를 입력하세요".to_string(),
            ));
        }
        info!("{:<12} --> 로그인 요청: {}", "Api", email.trim());
        let items: LoginItems = self
            .post_items(
                Endpoint::Login,
                &json!({ "email": email.trim(), "password": password }),
            )
            .await?;
        self.session.login(items.token, items.user);
        self.session.session().ok_or_else(|| {
            StorefrontError::Validation("세션 저장에 실패했습니다".to_string())
        })
    }

    /// 회원가입
    pub async fn register(&self, request: &RegisterRequest) -> Result<String> {
        if request.name.trim().is_empty() {
            return Err(StorefrontError::Validation("이름을 입력하세요".to_string()));
        }
        validate_email(&request.email)?;
        validate_password(&request.password)?;
        info!("{:<12} --> 회원가입 요청: {}", "Api", request.email);
        self.post_message(Endpoint::Register, request).await
    }

    /// 로그아웃 (백엔드 실패와 무관하게 세션은 정리)
    pub async fn logout(&self) -> Result<()> {
        let result = match self.session.token() {
            Some(_) => self
                .post_message(Endpoint::Logout, &json!({}))
                .await
                .map(|_| ()),
            None => Ok(()),
        };
        self.session.logout();
        result
    }

    pub async fn verify_email(&self, email: &str, code: &str) -> Result<String> {
        validate_email(email)?;
        if code.trim().is_empty() {
            return Err(StorefrontError::Validation(
                "인증 코드를 입력하세요".to_string(),
            ));
        }
        self.post_message(
            Endpoint::VerifyEmail,
            &json!({ "email": email.trim(), "code": code.trim() }),
        )
        .await
    }

    pub async fn forgot_password(&self, email: &str) -> Result<String> {
        validate_email(email)?;
        self.post_message(Endpoint::ForgotPassword, &json!({ "email": email.trim() }))
            .await
    }

    // endregion: --- Auth

    // region:    --- Favorites

    pub async fn toggle_favorite(&self, product_id: &str) -> Result<String> {
        self.post_message(Endpoint::FavoriteToggle, &json!({ "productId": product_id }))
            .await
    }

    pub async fn favorites(&self) -> Result<Vec<Product>> {
        self.get_items::<_, ()>(Endpoint::FavoriteAll, None, None)
            .await
    }

    // endregion: --- Favorites

    // region:    --- Seller

    /// 판매자 등록
    pub async fn create_seller(&self, payload: &Value) -> Result<SellerProfile> {
        info!("{:<12} --> 판매자 등록 요청", "Api");
        self.post_items(Endpoint::SellerCreate, payload).await
    }

    pub async fn seller_by_id(&self, id: &str) -> Result<SellerProfile> {
        self.get_items::<_, ()>(Endpoint::SellerGet, Some(id), None)
            .await
    }

    // endregion: --- Seller

    // region:    --- Upload

    /// 이미지 여러 장 업로드 (업로드된 URL 목록 반환)
    pub async fn upload_images(&self, files: Vec<ImageUpload>) -> Result<Vec<String>> {
        if files.is_empty() {
            return Err(StorefrontError::Validation(
                "업로드할 이미지가 없습니다".to_string(),
            ));
        }
        info!("{:<12} --> 이미지 {}장 업로드", "Api", files.len());
        let mut form = Form::new();
        for file in files {
            let part = Part::bytes(file.bytes)
                .file_name(file.file_name)
                .mime_str(&file.mime)?;
            form = form.part("images", part);
        }
        let endpoint = Endpoint::UploadImages;
        let request = self.authorize(self.client.post(self.url(endpoint)).multipart(form), endpoint)?;
        let envelope: ItemsEnvelope<Vec<String>> =
            Self::decode(endpoint, request.send().await?).await?;
        Self::ensure_ok(endpoint, envelope.status.as_ref(), envelope.message.as_deref())?;
        Ok(envelope.items)
    }

    // endregion: --- Upload
}

// endregion: --- Api Client

// region:    --- Trait Impls

#[async_trait]
impl ProductLookup for ApiClient {
    async fn lookup(&self, query: &str) -> Result<Vec<Product>> {
        let page = self.filter_products(&ProductFilter::search(query)).await?;
        Ok(page.items)
    }
}

#[async_trait]
impl WizardSink for ApiClient {
    async fn submit(&self, payload: Value) -> Result<Value> {
        let seller = self.create_seller(&payload).await?;
        Ok(serde_json::to_value(seller)?)
    }
}

// endregion: --- Trait Impls
