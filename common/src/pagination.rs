//! ページ分割
//!
//! ページ番号は 1 始まり。範囲外のページは空スライスを返す。

/// 1ページあたりの表示件数
pub const PAGE_SIZE: usize = 5;

/// 指定ページの要素 `[(page-1)*per_page, page*per_page)` を返す
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

/// 総ページ数 `ceil(len / per_page)`
pub fn total_pages(len: usize, per_page: usize) -> usize {
    if per_page == 0 {
        return 0;
    }
    len.div_ceil(per_page)
}
