//! 在庫テーブル（現在ページのみ）

use crate::actions::{self, AppState};
use leptos::prelude::*;
use pantry_ai_common::InventoryItem;

/// 総重量（重量 × 数量、小数2桁）
pub fn total_weight_label(item: &InventoryItem) -> String {
    format!("{:.2}", item.total_weight())
}

#[component]
pub fn InventoryTable(state: AppState) -> impl IntoView {
    let rows = move || state.with(|s| s.page_items().to_vec());

    view! {
        <table class="inventory-table">
            <thead>
                <tr>
                    <th>"Item"</th>
                    <th>"Quantity"</th>
                    <th>"Total Weight"</th>
                    <th>"Weight Unit"</th>
                    <th>"Date Added"</th>
                    <th>"Actions"</th>
                </tr>
            </thead>
            <tbody>
                <For
                    each=rows
                    key=|item| (item.id.clone(), item.quantity)
                    children=move |item| {
                        let inc_id = item.id.clone();
                        let dec_id = item.id.clone();
                        let del_id = item.id.clone();
                        view! {
                            <tr>
                                <td>
                                    {item.photo_url.clone().map(|src| view! { <img class="thumb" src=src alt="" /> })}
                                    {item.item.clone()}
                                </td>
                                <td>{item.quantity}</td>
                                <td>{total_weight_label(&item)}</td>
                                <td>{item.weight_unit.as_str()}</td>
                                <td>{item.date_added.clone()}</td>
                                <td class="row-actions">
                                    <button on:click=move |_| actions::adjust_quantity(state, inc_id.clone(), 1)>"+"</button>
                                    <button on:click=move |_| actions::adjust_quantity(state, dec_id.clone(), -1)>"-"</button>
                                    <button class="btn-danger" on:click=move |_| actions::delete_item(state, del_id.clone())>
                                        "Delete"
                                    </button>
                                </td>
                            </tr>
                        }
                    }
                />
            </tbody>
        </table>
    }
}
