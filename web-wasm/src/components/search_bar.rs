//! 検索バー

use crate::actions::{self, AppState};
use leptos::prelude::*;

#[component]
pub fn SearchBar(state: AppState) -> impl IntoView {
    view! {
        <div class="search-bar">
            <input
                type="text"
                placeholder="Search item"
                prop:value=move || state.with(|s| s.search_term.clone())
                on:input=move |ev| {
                    let value = event_target_value(&ev);
                    state.update(|s| s.search_term = value);
                }
            />
            <button class="btn btn-primary" on:click=move |_| actions::search(state)>
                "Search"
            </button>
            <Show when=move || state.with(|s| s.is_searching())>
                <button class="btn btn-secondary" on:click=move |_| actions::reset_search(state)>
                    "Reset"
                </button>
            </Show>
        </div>
    }
}
