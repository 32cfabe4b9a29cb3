/// 검색 디바운서
/// 1. 입력이 멈춘 뒤 일정 시간(기본 300ms)이 지나면 한 번만 조회
/// 2. 새 조회가 시작되면 이전 조회는 취소
/// 3. 결과는 한 번에 받고, 화면에는 고정 크기 단위로 앞부분만 노출
// region:    --- Imports
use crate::auction::model::Product;
use crate::error::{Result, StorefrontError};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::time::{sleep_until, Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

// endregion: --- Imports

// region:    --- Lookup

/// 상품 조회 백엔드
#[async_trait]
pub trait ProductLookup: Send + Sync + 'static {
    async fn lookup(&self, query: &str) -> Result<Vec<Product>>;
}

/// 검색어 정규화 (앞뒤 공백 제거, 소문자)
pub fn normalize_query(raw: &str) -> String {
    raw.trim().to_lowercase()
}

// endregion: --- Lookup

// region:    --- Result Page

/// 이미 받아온 결과 목록의 클라이언트 페이지
#[derive(Debug, Clone, PartialEq)]
pub struct ResultPage<T> {
    all: Vec<T>,
    page: usize,
    page_size: usize,
}

impl<T> ResultPage<T> {
    pub fn new(all: Vec<T>, page_size: usize) -> Self {
        Self {
            all,
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn empty(page_size: usize) -> Self {
        Self::new(Vec::new(), page_size)
    }

    /// 노출 중인 앞부분
    pub fn displayed(&self) -> &[T] {
        let end = self.page.saturating_mul(self.page_size).min(self.all.len());
        &self.all[..end]
    }

    pub fn all(&self) -> &[T] {
        &self.all
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn total(&self) -> usize {
        self.all.len()
    }

    pub fn has_more(&self) -> bool {
        self.displayed().len() < self.all.len()
    }

    /// 다음 구간 노출 (더 없으면 false)
    pub fn load_more(&mut self) -> bool {
        if !self.has_more() {
            return false;
        }
        self.page += 1;
        true
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }
}

// endregion: --- Result Page

// region:    --- Search State

/// 화면에 노출되는 검색 상태
#[derive(Debug, Clone, PartialEq)]
pub struct SearchState {
    pub query: String,
    pub results: ResultPage<Product>,
    pub loading: bool,
    pub error: Option<String>,
}

impl SearchState {
    fn new(page_size: usize) -> Self {
        Self {
            query: String::new(),
            results: ResultPage::empty(page_size),
            loading: false,
            error: None,
        }
    }
}

// endregion: --- Search State

// region:    --- Search Debouncer

enum Command {
    Input(String),
    LoadMore,
}

/// 조회 완료 메시지 (세대, 검색어, 결과)
type Completion = (u64, String, Result<Vec<Product>>);

/// 검색 디바운서 핸들
pub struct SearchDebouncer {
    commands: mpsc::UnboundedSender<Command>,
    state: watch::Receiver<SearchState>,
    shutdown: CancellationToken,
}

impl SearchDebouncer {
    /// 디바운서 작업 시작
    pub fn spawn<L: ProductLookup>(lookup: Arc<L>, debounce: Duration, page_size: usize) -> Self {
        let (commands, receiver) = mpsc::unbounded_channel();
        let (state_tx, state) = watch::channel(SearchState::new(page_size));
        let shutdown = CancellationToken::new();

        let worker = Worker {
            lookup,
            debounce,
            page_size,
            state: state_tx,
            shutdown: shutdown.clone(),
            generation: 0,
            in_flight: None,
        };
        tokio::spawn(worker.run(receiver));

        Self {
            commands,
            state,
            shutdown,
        }
    }

    /// 키 입력마다 호출
    pub fn input(&self, raw: impl Into<String>) {
        if self.commands.send(Command::Input(raw.into())).is_err() {
            warn!("{:<12} --> 검색 작업이 이미 종료되었습니다", "Search");
        }
    }

    /// 다음 결과 구간 노출
    pub fn load_more(&self) {
        if self.commands.send(Command::LoadMore).is_err() {
            warn!("{:<12} --> 검색 작업이 이미 종료되었습니다", "Search");
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.clone()
    }

    pub fn state(&self) -> SearchState {
        self.state.borrow().clone()
    }

    /// 작업 및 진행 중인 조회 취소
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}

impl Drop for SearchDebouncer {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

struct Worker<L: ProductLookup> {
    lookup: Arc<L>,
    debounce: Duration,
    page_size: usize,
    state: watch::Sender<SearchState>,
    shutdown: CancellationToken,
    generation: u64,
    in_flight: Option<CancellationToken>,
}

impl<L: ProductLookup> Worker<L> {
    async fn run(mut self, mut commands: mpsc::UnboundedReceiver<Command>) {
        let (done_tx, mut done_rx) = mpsc::unbounded_channel::<Completion>();
        let mut pending: Option<String> = None;
        let mut deadline = Instant::now();
        let shutdown = self.shutdown.clone();

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    debug!("{:<12} --> 검색 작업 종료", "Search");
                    break;
                }
                command = commands.recv() => match command {
                    Some(Command::Input(raw)) => {
                        pending = Some(raw);
                        deadline = Instant::now() + self.debounce;
                    }
                    Some(Command::LoadMore) => {
                        self.state.send_modify(|state| {
                            state.results.load_more();
                        });
                    }
                    None => break,
                },
                _ = sleep_until(deadline), if pending.is_some() => {
                    if let Some(raw) = pending.take() {
                        self.fire(&raw, &done_tx);
                    }
                }
                Some((generation, query, result)) = done_rx.recv() => {
                    self.complete(generation, query, result);
                }
            }
        }

        if let Some(token) = self.in_flight.take() {
            token.cancel();
        }
    }

    /// 조회 시작 (이전 조회는 취소)
    fn fire(&mut self, raw: &str, done_tx: &mpsc::UnboundedSender<Completion>) {
        if let Some(token) = self.in_flight.take() {
            debug!("{:<12} --> 이전 조회 취소", "Search");
            token.cancel();
        }
        self.generation += 1;

        let query = normalize_query(raw);
        if query.is_empty() {
            let page_size = self.page_size;
            self.state.send_modify(|state| {
                state.query.clear();
                state.results = ResultPage::empty(page_size);
                state.loading = false;
                state.error = None;
            });
            return;
        }

        info!("{:<12} --> 검색 조회 시작: {}", "Search", query);
        self.state.send_modify(|state| {
            state.query = query.clone();
            state.loading = true;
        });

        let token = self.shutdown.child_token();
        self.in_flight = Some(token.clone());

        let lookup = Arc::clone(&self.lookup);
        let generation = self.generation;
        let done_tx = done_tx.clone();
        tokio::spawn(async move {
            let result = tokio::select! {
                _ = token.cancelled() => Err(StorefrontError::Cancelled),
                result = lookup.lookup(&query) => result,
            };
            let _ = done_tx.send((generation, query, result));
        });
    }

    /// 조회 결과 반영 (최신 세대만)
    fn complete(&mut self, generation: u64, query: String, result: Result<Vec<Product>>) {
        if generation != self.generation {
            debug!("{:<12} --> 지난 조회 결과 무시: {}", "Search", query);
            return;
        }
        self.in_flight = None;

        let page_size = self.page_size;
        match result {
            Ok(products) => {
                info!(
                    "{:<12} --> 검색 결과 {}건: {}",
                    "Search",
                    products.len(),
                    query
                );
                self.state.send_modify(|state| {
                    state.results = ResultPage::new(products, page_size);
                    state.loading = false;
                    state.error = None;
                });
            }
            Err(e) if e.is_cancelled() => {
                debug!("{:<12} --> 취소된 조회: {}", "Search", query);
            }
            Err(e) => {
                error!("{:<12} --> 검색 조회 실패: {:?}", "Search", e);
                self.state.send_modify(|state| {
                    state.results = ResultPage::empty(page_size);
                    state.loading = false;
                    state.error = Some(e.to_string());
                });
            }
        }
    }
}

// endregion: --- Search Debouncer
