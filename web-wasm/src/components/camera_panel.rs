//! カメラパネル
//!
//! カメラを開いている間はプレビューと撮影ボタン、
//! 分類中はローディング表示、撮影後は写真と分類結果を表示する。

use crate::actions::{self, AppState};
use crate::bridge::camera::VIDEO_ID;
use leptos::prelude::*;

#[component]
pub fn CameraPanel(state: AppState) -> impl IntoView {
    let photo = move || state.with(|s| s.pending_photo().map(str::to_string));

    view! {
        <div class="camera-panel">
            <Show when=move || state.with(|s| s.is_camera_open())>
                <video id=VIDEO_ID class="camera-preview" autoplay=true playsinline=true muted=true></video>
                <div class="camera-actions">
                    <button class="btn btn-primary" on:click=move |_| actions::capture_photo(state)>
                        "Capture"
                    </button>
                    <button class="btn btn-tertiary" on:click=move |_| actions::close_camera(state)>
                        "Close Camera"
                    </button>
                </div>
            </Show>

            <Show when=move || state.with(|s| s.is_loading())>
                <div class="loading">"Classifying..."</div>
            </Show>

            {move || {
                photo()
                    .map(|src| {
                        let label = state
                            .with(|s| s.pending_classification().map(str::to_string))
                            .unwrap_or_default();
                        view! {
                            <figure class="photo-preview">
                                <img src=src alt="captured item" />
                                <figcaption>{label}</figcaption>
                            </figure>
                        }
                    })
            }}
        </div>
    }
}
