// region:    --- Imports
use auction_storefront::api::schema::AuctionQuery;
use auction_storefront::api::ApiClient;
use auction_storefront::auction::status::classify;
use auction_storefront::config::Config;
use auction_storefront::scheduler::CountdownTicker;
use auction_storefront::search::{SearchDebouncer, SearchState};
use auction_storefront::session::SessionStore;
use chrono::Utc;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};
// endregion: --- Imports

// region:    --- Main
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // logging 초기화
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .without_time()
        .with_target(false)
        .init();

    // 설정 로드
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{:<12} --> 설정 로드 실패: {:?}", "Main", e);
            return Err(e.into());
        }
    };

    // API 클라이언트 생성
    let session = Arc::new(SessionStore::new());
    let api = Arc::new(ApiClient::new(&config, session)?);
    info!("{:<12} --> API 클라이언트 준비: {}", "Main", config.api_url);

    // 경매 카탈로그 조회 (실패해도 검색은 계속 사용 가능)
    let catalogs = match api.fetch_catalogs(&AuctionQuery::default()).await {
        Ok(catalogs) => catalogs,
        Err(e) => {
            error!("{:<12} --> 카탈로그 조회 실패: {}", "Main", e);
            println!("! 경매 목록을 불러오지 못했습니다: {}", e);
            Vec::new()
        }
    };
    let now = Utc::now();
    for catalog in &catalogs {
        println!("[{:<9}] {}", classify(catalog, now).label(), catalog.catalog_name);
    }

    // 카운트다운 스케줄러 시작
    let mut ticker = CountdownTicker::start(catalogs, config.countdown_tick);
    let mut countdowns = ticker.subscribe();
    let mut show_board = false;

    // 검색 디바운서 시작
    let search = SearchDebouncer::spawn(
        Arc::clone(&api),
        config.search_debounce,
        config.search_page_size,
    );
    let mut search_state = search.subscribe();

    println!("검색어를 입력하세요 (:more 다음 결과, :board 카운트다운, :quit 종료)");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            line = lines.next_line() => match line? {
                Some(line) => match line.trim().to_string().as_str() {
                    ":quit" => break,
                    ":more" => search.load_more(),
                    ":board" => show_board = !show_board,
                    _ => search.input(line),
                },
                None => break,
            },
            Ok(()) = countdowns.changed() => {
                if show_board {
                    let board = countdowns.borrow_and_update().clone();
                    let mut names: Vec<_> = board.keys().cloned().collect();
                    names.sort();
                    for name in names {
                        println!("  {:<24} {}", name, board[&name]);
                    }
                }
            }
            Ok(()) = search_state.changed() => {
                let state = search_state.borrow_and_update().clone();
                print_search_state(&state);
            }
        }
    }

    // 종료 처리
    search.shutdown();
    ticker.shutdown().await;
    info!("{:<12} --> 종료", "Main");
    Ok(())
}
// endregion: --- Main

fn print_search_state(state: &SearchState) {
    if state.loading {
        println!("… '{}' 검색 중", state.query);
        return;
    }
    if let Some(message) = &state.error {
        println!("! 검색 실패: {}", message);
        return;
    }
    if state.results.is_empty() {
        if !state.query.is_empty() {
            println!("'{}' 검색 결과가 없습니다", state.query);
        }
        return;
    }
    for product in state.results.displayed() {
        match product.price {
            Some(price) => println!("  {:<40} {:>10.2}", product.title, price),
            None => println!("  {}", product.title),
        }
    }
    println!(
        "  ({}/{}건{})",
        state.results.displayed().len(),
        state.results.total(),
        if state.results.has_more() { ", :more" } else { "" }
    );
}
