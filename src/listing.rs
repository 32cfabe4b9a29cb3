// region:    --- Imports
use crate::auction::model::Product;
use std::cmp::Ordering;

// endregion: --- Imports

// region:    --- Listing

/// 상품 목록 정렬 기준
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductSort {
    PriceLowToHigh,
    PriceHighToLow,
    TitleAsc,
    Newest,
}

/// 가져온 상품 목록 정렬 (가격/날짜가 없는 상품은 뒤로)
pub fn sort_products(products: &mut [Product], sort: ProductSort) {
    match sort {
        ProductSort::PriceLowToHigh => {
            products.sort_by(|a, b| compare_missing_last(a.price, b.price, |x, y| x.total_cmp(y)))
        }
        ProductSort::PriceHighToLow => {
            products.sort_by(|a, b| compare_missing_last(a.price, b.price, |x, y| y.total_cmp(x)))
        }
        ProductSort::TitleAsc => {
            products.sort_by(|a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase()))
        }
        ProductSort::Newest => {
            products.sort_by(|a, b| compare_missing_last(a.created_at, b.created_at, |x, y| y.cmp(x)))
        }
    }
}

fn compare_missing_last<T, F>(a: Option<T>, b: Option<T>, cmp: F) -> Ordering
where
    F: Fn(&T, &T) -> Ordering,
{
    match (a, b) {
        (Some(x), Some(y)) => cmp(&x, &y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// 가격 범위 필터 (양 끝 포함)
pub fn filter_by_price(products: &[Product], min: Option<f64>, max: Option<f64>) -> Vec<Product> {
    if min.is_none() && max.is_none() {
        return products.to_vec();
    }
    products
        .iter()
        .filter(|product| match product.price {
            Some(price) => min.map_or(true, |m| price >= m) && max.map_or(true, |m| price <= m),
            None => false,
        })
        .cloned()
        .collect()
}

/// 1부터 시작하는 페이지 슬라이스
pub fn paginate<T>(items: &[T], page: usize, per_page: usize) -> &[T] {
    if page == 0 || per_page == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(per_page);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(per_page).min(items.len());
    &items[start..end]
}

// endregion: --- Listing
