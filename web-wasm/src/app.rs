//! メインアプリケーションコンポーネント

use crate::actions::{self, AppState};
use crate::components::{
    camera_panel::CameraPanel,
    header::Header,
    inventory_table::InventoryTable,
    item_form::ItemForm,
    page_controls::PageControls,
    search_bar::SearchBar,
};
use leptos::prelude::*;
use pantry_ai_common::InventoryState;

#[component]
pub fn App() -> impl IntoView {
    let state: AppState = RwSignal::new(InventoryState::new());
    actions::start_sync(state);

    let error = move || state.with(|s| s.error_message());

    view! {
        <div class="container">
            <Header />

            {move || error().map(|message| view! {
                <div class="error-banner" role="alert">
                    <span>{message}</span>
                    <button class="btn-small" on:click=move |_| state.update(|s| s.clear_error())>"×"</button>
                </div>
            })}

            <SearchBar state=state />
            <ItemForm state=state />
            <CameraPanel state=state />

            <Show
                when=move || state.with(|s| !s.active_items().is_empty())
                fallback=move || view! {
                    <p class="text-muted">
                        {move || if state.with(|s| s.is_searching()) { "No matching items." } else { "No items yet." }}
                    </p>
                }
            >
                <InventoryTable state=state />
            </Show>

            <PageControls state=state />
        </div>
    }
}
