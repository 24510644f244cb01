//! 端末表示
//!
//! 画面状態から在庫テーブル・ページ表示・エラー行を組み立てる。

use pantry_ai_common::{InventoryItem, InventoryState};

const HEADERS: [&str; 7] = ["ID", "Item", "Quantity", "Total Weight", "Unit", "Date Added", "Class"];

/// 総重量（重量 × 数量、小数2桁）
pub fn format_total_weight(item: &InventoryItem) -> String {
    format!("{:.2}", item.total_weight())
}

fn row(item: &InventoryItem) -> [String; 7] {
    [
        item.id.clone(),
        item.item.clone(),
        item.quantity.to_string(),
        format_total_weight(item),
        item.weight_unit.to_string(),
        item.date_added.clone(),
        item.classification.clone().unwrap_or_default(),
    ]
}

/// 現在ページのテーブル
pub fn render_table(state: &InventoryState) -> String {
    let rows: Vec<[String; 7]> = state.page_items().iter().map(row).collect();

    let mut widths: [usize; 7] = HEADERS.map(|h| h.chars().count());
    for r in &rows {
        for (width, cell) in widths.iter_mut().zip(r.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, &HEADERS.map(String::from), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&rule.join("  "));
    out.push('\n');

    if rows.is_empty() {
        out.push_str(if state.is_searching() {
            "(no matching items)\n"
        } else {
            "(no items)\n"
        });
    }
    for r in &rows {
        push_line(&mut out, r, &widths);
    }

    out.push_str(&render_footer(state));
    out
}

fn push_line(out: &mut String, cells: &[String; 7], widths: &[usize; 7]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths.iter())
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect();
    out.push_str(padded.join("  ").trim_end());
    out.push('\n');
}

/// ページ表示（検索中は検索語も）
pub fn render_footer(state: &InventoryState) -> String {
    let total = state.total_pages().max(1);
    let mut footer = format!(
        "Page {} of {} ({} items)",
        state.current_page(),
        total,
        state.active_items().len()
    );
    if state.is_searching() {
        footer.push_str(&format!("  search: \"{}\"", state.search_term));
    }
    footer.push('\n');
    footer
}

/// エラー行（無ければ None）
pub fn render_error(state: &InventoryState) -> Option<String> {
    state.error_message().map(|message| format!("✖ {}", message))
}
