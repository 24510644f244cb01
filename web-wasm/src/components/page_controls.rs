//! ページ送り（前後ボタンとページ番号）

use leptos::prelude::*;
use crate::actions::AppState;

/// 表示するページ番号（空のリストでも 1 ページ目は出す）
pub fn page_numbers(total_pages: usize) -> Vec<usize> {
    (1..=total_pages.max(1)).collect()
}

#[component]
pub fn PageControls(state: AppState) -> impl IntoView {
    let page = move || state.with(|s| s.current_page());
    let total = move || state.with(|s| s.total_pages().max(1));

    view! {
        <nav class="page-controls">
            <button disabled=move || page() <= 1 on:click=move |_| state.update(|s| s.prev_page())>
                "Previous"
            </button>
            <For
                each=move || page_numbers(total())
                key=|number| *number
                children=move |number| {
                    view! {
                        <button
                            class="page-number"
                            class:active=move || page() == number
                            on:click=move |_| state.update(|s| s.set_page(number))
                        >
                            {number}
                        </button>
                    }
                }
            />
            <button disabled=move || page() >= total() on:click=move |_| state.update(|s| s.next_page())>
                "Next"
            </button>
        </nav>
    }
}
