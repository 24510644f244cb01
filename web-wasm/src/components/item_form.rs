//! 追加フォーム

use crate::actions::{self, AppState};
use leptos::prelude::*;
use pantry_ai_common::WeightUnit;

#[component]
pub fn ItemForm(state: AppState) -> impl IntoView {
    let busy = move || state.with(|s| s.is_loading());

    view! {
        <div class="item-form">
            <div class="form-group">
                <label for="item">"Item"</label>
                <input
                    type="text"
                    id="item"
                    prop:value=move || state.with(|s| s.form.item.clone())
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        state.update(|s| s.form.item = value);
                    }
                />
            </div>

            <div class="form-group">
                <label for="quantity">"Quantity"</label>
                <input
                    type="number"
                    id="quantity"
                    prop:value=move || state.with(|s| s.form.quantity.clone())
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        state.update(|s| s.form.quantity = value);
                    }
                />
            </div>

            <div class="form-group">
                <label for="weight">"Weight"</label>
                <input
                    type="number"
                    id="weight"
                    step="any"
                    prop:value=move || state.with(|s| s.form.weight.clone())
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        state.update(|s| s.form.weight = value);
                    }
                />
            </div>

            <div class="form-group">
                <label for="weight-unit">"Weight unit"</label>
                <select
                    id="weight-unit"
                    on:change=move |ev| {
                        let value = event_target_value(&ev);
                        state.update(|s| s.form.weight_unit = value);
                    }
                >
                    {WeightUnit::ALL
                        .iter()
                        .map(|unit| {
                            let value = unit.as_str();
                            view! {
                                <option
                                    value=value
                                    selected=move || state.with(|s| s.form.weight_unit == value)
                                >
                                    {value}
                                </option>
                            }
                        })
                        .collect_view()}
                </select>
            </div>

            <div class="form-actions">
                <button class="btn btn-primary" disabled=busy on:click=move |_| actions::add_item(state)>
                    "Add Item"
                </button>
                <button
                    class="btn btn-secondary"
                    disabled=move || busy() || state.with(|s| s.is_camera_open())
                    on:click=move |_| actions::open_camera(state)
                >
                    "Take Photo"
                </button>
            </div>
        </div>
    }
}
