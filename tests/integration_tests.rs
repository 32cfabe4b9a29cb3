use auction_storefront::api::schema::{AuctionQuery, ImageUpload, ProductFilter, RegisterRequest};
use auction_storefront::api::{ApiClient, AuthScheme, Endpoint};
use auction_storefront::auction::status::{classify, AuctionStatus};
use auction_storefront::config::Config;
use auction_storefront::error::StorefrontError;
use auction_storefront::search::SearchDebouncer;
use auction_storefront::session::SessionStore;
use auction_storefront::wizard::{seller_onboarding_steps, FormWizard, StepOutcome};
use axum::body::Bytes;
use axum::extract::{Path, Query, RawQuery, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{Duration, Utc};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::net::TcpListener;

/// 트레이싱 초기화
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .without_time()
        .with_target(false)
        .with_test_writer()
        .try_init();
}

// region:    --- Stub Backend

/// 요청 기록 (경로, Authorization 헤더, 쿼리)
#[derive(Clone, Default)]
struct Recorder {
    requests: Arc<Mutex<Vec<(String, Option<String>, Option<String>)>>>,
}

impl Recorder {
    fn record(&self, path: &str, headers: &HeaderMap, query: Option<String>) {
        let auth = headers
            .get("authorization")
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        self.requests.lock().push((path.to_string(), auth, query));
    }

    fn find(&self, path: &str) -> Option<(String, Option<String>, Option<String>)> {
        self.requests
            .lock()
            .iter()
            .rev()
            .find(|(p, _, _)| p == path)
            .cloned()
    }

    fn count(&self) -> usize {
        self.requests.lock().len()
    }
}

fn product_json(id: &str, title: &str, price: f64) -> Value {
    json!({ "_id": id, "title": title, "image": [], "price": price })
}

async fn auction_bulk(
    State(recorder): State<Recorder>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> impl IntoResponse {
    recorder.record("/v1/api/auction/bulk", &headers, query);
    let past = (Utc::now() - Duration::days(1)).to_rfc3339();
    let future = (Utc::now() + Duration::days(2)).to_rfc3339();
    Json(json!({
        "status": "success",
        "items": { "catalogs": [
            { "catalogName": "Estate Jewelry", "auctions": [
                { "_id": "a1", "startDate": past, "product": { "image": ["https://img/1.jpg"], "title": "Ring" } }
            ]},
            { "catalogName": "Modern Art", "auctions": [
                { "_id": "a2", "startDate": future, "product": { "image": [], "title": "Canvas" } }
            ]},
            { "catalogName": "Unsorted", "auctions": [] }
        ]}
    }))
}

async fn product_filter(
    State(recorder): State<Recorder>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let search = params.get("search").cloned().unwrap_or_default();
    recorder.record("/v1/api/product/filter", &headers, Some(search.clone()));
    match search.as_str() {
        "boom" => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "message": "db down" })),
        )
            .into_response(),
        "bad" => Json(json!({ "items": "nope" })).into_response(),
        "denied" => Json(json!({
            "status": false,
            "message": "not allowed",
            "items": { "items": [], "total": 0, "totalPages": 0 }
        }))
        .into_response(),
        _ => Json(json!({
            "items": {
                "items": [
                    product_json("p1", &format!("{} lamp", search), 25.0),
                    product_json("p2", &format!("{} chair", search), 80.0)
                ],
                "total": 2,
                "totalPages": 1
            }
        }))
        .into_response(),
    }
}

async fn login(State(recorder): State<Recorder>, headers: HeaderMap, Json(body): Json<Value>) -> impl IntoResponse {
    recorder.record("/v1/api/auth/login", &headers, None);
    if body["password"] == "Right-pass1" {
        Json(json!({
            "status": "success",
            "items": { "token": "tok-123", "user": { "_id": "u1", "email": body["email"] } }
        }))
        .into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "status": "fail", "message": "invalid credentials" })),
        )
            .into_response()
    }
}

async fn logout(State(recorder): State<Recorder>, headers: HeaderMap) -> impl IntoResponse {
    recorder.record("/v1/api/auth/logout", &headers, None);
    Json(json!({ "status": true, "message": "logged out" }))
}

async fn register(State(recorder): State<Recorder>, headers: HeaderMap) -> impl IntoResponse {
    recorder.record("/v1/api/auth/register", &headers, None);
    Json(json!({ "status": "success", "message": "check your inbox" }))
}

async fn favorites(State(recorder): State<Recorder>, headers: HeaderMap) -> impl IntoResponse {
    recorder.record("/v1/api/favorite/all", &headers, None);
    Json(json!({ "status": "success", "items": [product_json("p9", "Clock", 40.0)] }))
}

async fn seller_create(
    State(recorder): State<Recorder>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    recorder.record("/v1/api/seller/create", &headers, None);
    Json(json!({
        "status": "success",
        "items": { "_id": "s1", "storeName": body["storeName"], "email": body["email"], "status": "pending" }
    }))
}

async fn seller_get(
    State(recorder): State<Recorder>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> impl IntoResponse {
    recorder.record("/v1/api/seller/getbyid", &headers, Some(id.clone()));
    Json(json!({ "status": "success", "items": { "_id": id, "storeName": "Attic Finds" } }))
}

async fn upload(State(recorder): State<Recorder>, headers: HeaderMap, body: Bytes) -> impl IntoResponse {
    recorder.record("/v1/api/uploadImg/upload-multiple", &headers, None);
    let is_multipart = headers
        .get("content-type")
        .and_then(|value| value.to_str().ok())
        .map_or(false, |value| value.starts_with("multipart/form-data"));
    if !is_multipart {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": "multipart expected" }))).into_response();
    }
    let files = String::from_utf8_lossy(&body).matches("filename=").count();
    let urls: Vec<String> = (0..files)
        .map(|i| format!("https://cdn.example.com/{}.jpg", i))
        .collect();
    Json(json!({ "status": "success", "items": urls })).into_response()
}

/// 테스트용 백엔드 실행 (임의 포트)
async fn spawn_backend() -> (String, Recorder) {
    let recorder = Recorder::default();
    let app = Router::new()
        .route("/v1/api/auction/bulk", get(auction_bulk))
        .route("/v1/api/product/filter", get(product_filter))
        .route("/v1/api/auth/login", post(login))
        .route("/v1/api/auth/logout", post(logout))
        .route("/v1/api/auth/register", post(register))
        .route("/v1/api/favorite/all", get(favorites))
        .route("/v1/api/seller/create", post(seller_create))
        .route("/v1/api/seller/getbyid/:id", get(seller_get))
        .route("/v1/api/uploadImg/upload-multiple", post(upload))
        .with_state(recorder.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}", addr), recorder)
}

fn client(base_url: &str) -> ApiClient {
    let config = Config {
        api_url: base_url.to_string(),
        ..Config::default()
    };
    ApiClient::new(&config, Arc::new(SessionStore::new())).unwrap()
}

async fn logged_in(base_url: &str) -> ApiClient {
    let api = client(base_url);
    api.login("buyer@example.com", "Right-pass1").await.unwrap();
    api
}

// endregion: --- Stub Backend

/// 카탈로그 조회 및 상태 판별
#[tokio::test]
async fn test_fetch_catalogs() {
    init_tracing();
    let (base_url, recorder) = spawn_backend().await;
    let api = client(&base_url);

    let query = AuctionQuery {
        status: Some("live".to_string()),
        page: Some(2),
        ..AuctionQuery::default()
    };
    let catalogs = api.fetch_catalogs(&query).await.unwrap();
    assert_eq!(catalogs.len(), 3);

    let now = Utc::now();
    let statuses: Vec<_> = catalogs.iter().map(|c| classify(c, now)).collect();
    assert_eq!(
        statuses,
        vec![
            AuctionStatus::Live,
            AuctionStatus::Upcoming,
            AuctionStatus::Scheduled
        ]
    );

    let (_, auth, raw_query) = recorder.find("/v1/api/auction/bulk").unwrap();
    assert!(auth.is_none());
    let raw_query = raw_query.unwrap();
    assert!(raw_query.contains("status=live"));
    assert!(raw_query.contains("page=2"));
    assert!(!raw_query.contains("upcoming"));
}

/// 상품 조회: 성공, 서버 오류, 형식 오류, 본문 status 거부
#[tokio::test]
async fn test_filter_products_errors() {
    init_tracing();
    let (base_url, _) = spawn_backend().await;
    let api = client(&base_url);

    let page = api.filter_products(&ProductFilter::search("oak")).await.unwrap();
    assert_eq!(page.total, 2);
    assert_eq!(page.total_pages, 1);
    assert_eq!(page.items[0].title, "oak lamp");

    match api.filter_products(&ProductFilter::search("boom")).await {
        Err(StorefrontError::Api { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "db down");
        }
        other => panic!("unexpected: {:?}", other),
    }

    assert!(matches!(
        api.filter_products(&ProductFilter::search("bad")).await,
        Err(StorefrontError::Decode(_))
    ));

    match api.filter_products(&ProductFilter::search("denied")).await {
        Err(StorefrontError::Api { message, .. }) => assert_eq!(message, "not allowed"),
        other => panic!("unexpected: {:?}", other),
    }
}

/// 로그인/로그아웃 세션 수명주기
#[tokio::test]
async fn test_login_logout_session() {
    init_tracing();
    let (base_url, recorder) = spawn_backend().await;
    let api = client(&base_url);

    match api.login("buyer@example.com", "wrong").await {
        Err(StorefrontError::Api { status, message }) => {
            assert_eq!(status, 401);
            assert_eq!(message, "invalid credentials");
        }
        other => panic!("unexpected: {:?}", other),
    }
    assert!(!api.session().is_authenticated());

    let session = api.login("buyer@example.com", "Right-pass1").await.unwrap();
    assert_eq!(session.token, "tok-123");
    assert_eq!(session.user.unwrap().id, "u1");

    api.logout().await.unwrap();
    assert!(!api.session().is_authenticated());
    let (_, auth, _) = recorder.find("/v1/api/auth/logout").unwrap();
    assert_eq!(auth.as_deref(), Some("tok-123"));

    // 세션이 없으면 요청 없이 종료
    let before = recorder.count();
    api.logout().await.unwrap();
    assert_eq!(recorder.count(), before);
}

/// 엔드포인트별 Authorization 헤더 형식 유지
#[tokio::test]
async fn test_authorization_formats() {
    init_tracing();
    let (base_url, recorder) = spawn_backend().await;

    // 로그인 전에는 요청을 보내지 않는다
    let anonymous = client(&base_url);
    assert!(matches!(
        anonymous.favorites().await,
        Err(StorefrontError::Validation(_))
    ));
    assert!(recorder.find("/v1/api/favorite/all").is_none());

    let api = logged_in(&base_url).await;
    let favorites = api.favorites().await.unwrap();
    assert_eq!(favorites[0].id, "p9");
    let (_, auth, _) = recorder.find("/v1/api/favorite/all").unwrap();
    assert_eq!(auth.as_deref(), Some("Bearer tok-123"));

    let seller = api.seller_by_id("s42").await.unwrap();
    assert_eq!(seller.id, "s42");

    // 경로 구분 문자가 들어간 id 도 한 구간으로 전달
    let seller = api.seller_by_id("s/42?x#y").await.unwrap();
    assert_eq!(seller.id, "s/42?x#y");
    let (_, auth, id) = recorder.find("/v1/api/seller/getbyid").unwrap();
    assert_eq!(id.as_deref(), Some("s/42?x#y"));
    assert_eq!(auth.as_deref(), Some("Bearer tok-123"));

    api.create_seller(&json!({ "storeName": "Attic Finds" }))
        .await
        .unwrap();
    let (_, auth, _) = recorder.find("/v1/api/seller/create").unwrap();
    assert_eq!(auth.as_deref(), Some("tok-123"));

    assert_eq!(Endpoint::FavoriteToggle.auth_scheme(), AuthScheme::Bearer);
    assert_eq!(Endpoint::ProductFilter.auth_scheme(), AuthScheme::None);
}

/// 회원가입 입력 검증은 요청 전에 수행
#[tokio::test]
async fn test_register_validation() {
    init_tracing();
    let (base_url, recorder) = spawn_backend().await;
    let api = client(&base_url);

    let weak = RegisterRequest {
        name: "Kim".to_string(),
        email: "kim@example.com".to_string(),
        password: "password".to_string(),
    };
    assert!(matches!(
        api.register(&weak).await,
        Err(StorefrontError::Validation(_))
    ));
    assert_eq!(recorder.count(), 0);

    let strong = RegisterRequest {
        password: "Passw0rd!".to_string(),
        ..weak
    };
    assert_eq!(api.register(&strong).await.unwrap(), "check your inbox");
}

/// 이미지 업로드 (multipart, 토큰 그대로)
#[tokio::test]
async fn test_upload_images() {
    init_tracing();
    let (base_url, recorder) = spawn_backend().await;
    let api = logged_in(&base_url).await;

    assert!(api.upload_images(vec![]).await.is_err());

    let files = vec![
        ImageUpload {
            file_name: "front.jpg".to_string(),
            mime: "image/jpeg".to_string(),
            bytes: vec![0xFF, 0xD8, 0xFF],
        },
        ImageUpload {
            file_name: "back.jpg".to_string(),
            mime: "image/jpeg".to_string(),
            bytes: vec![0xFF, 0xD8, 0xFF],
        },
    ];
    let urls = api.upload_images(files).await.unwrap();
    assert_eq!(urls.len(), 2);
    let (_, auth, _) = recorder.find("/v1/api/uploadImg/upload-multiple").unwrap();
    assert_eq!(auth.as_deref(), Some("tok-123"));
}

/// 검색 디바운서를 실제 HTTP 클라이언트로 구동
#[tokio::test]
async fn test_search_through_api() {
    init_tracing();
    let (base_url, recorder) = spawn_backend().await;
    let api = Arc::new(client(&base_url));

    let search = SearchDebouncer::spawn(api, std::time::Duration::from_millis(50), 100);
    search.input("O");
    search.input("Oa");
    search.input(" Oak ");

    let mut state = search.subscribe();
    let deadline = tokio::time::Instant::now() + std::time::Duration::from_secs(5);
    loop {
        {
            let current = state.borrow_and_update();
            if !current.loading && current.results.total() > 0 {
                break;
            }
        }
        tokio::time::timeout_at(deadline, state.changed())
            .await
            .expect("검색 결과 대기 시간 초과")
            .unwrap();
    }

    let current = search.state();
    assert_eq!(current.query, "oak");
    assert_eq!(current.results.displayed().len(), 2);
    let lookups: Vec<_> = recorder
        .requests
        .lock()
        .iter()
        .filter(|(path, _, _)| path == "/v1/api/product/filter")
        .map(|(_, _, query)| query.clone().unwrap_or_default())
        .collect();
    assert_eq!(lookups, vec!["oak".to_string()]);
}

/// 판매자 등록 폼을 실제 HTTP 클라이언트로 제출
#[tokio::test]
async fn test_seller_wizard_through_api() {
    init_tracing();
    let (base_url, _) = spawn_backend().await;
    let api = logged_in(&base_url).await;

    let mut wizard = FormWizard::new(seller_onboarding_steps()).unwrap();
    let steps = [
        json!({ "storeName": "Attic Finds", "category": "antiques" }),
        json!({ "email": "seller@example.com", "phone": "010-1234-5678" }),
        json!({ "accountHolder": "Attic Finds LLC", "accountNumber": "123-456" }),
        json!({ "logo": "https://cdn.example.com/0.jpg" }),
    ];

    let mut last = None;
    for step in steps {
        let Value::Object(fields) = step else {
            unreachable!()
        };
        last = Some(wizard.submit_step(fields, &api).await.unwrap());
    }

    match last {
        Some(StepOutcome::Submitted(seller)) => {
            assert_eq!(seller["_id"], "s1");
            assert_eq!(seller["storeName"], "Attic Finds");
            assert_eq!(seller["email"], "seller@example.com");
        }
        other => panic!("unexpected: {:?}", other),
    }
    assert_eq!(wizard.current_step(), 1);
    assert!(wizard.accumulator().is_empty());
}
