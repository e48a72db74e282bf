//! カテゴリ別入力カードコンポーネント

use crate::form::FormHandle;
use grocery_request_common::{CategoryKey, FieldUpdate};
use leptos::prelude::*;

#[component]
pub fn CategoryCard(form: FormHandle, category: CategoryKey) -> impl IntoView {
    let photo_url = move || {
        form.request.with(|r| {
            r.categories[category]
                .photo
                .as_ref()
                .map(|p| p.data_url().to_string())
        })
    };
    let has_photo = move || form.request.with(|r| r.categories[category].has_photo());

    view! {
        <div class="category-card">
            <div class="category-header">
                <h3>{category.label()}</h3>
                <Show when=has_photo>
                    <span class="photo-badge">"✓ Photo captured"</span>
                </Show>
            </div>

            <div class="photo-slot">
                <Show
                    when=has_photo
                    fallback=move || view! {
                        <button class="btn-take-photo" on:click=move |_| form.start_capture(category)>
                            <span class="upload-icon">"📷"</span>
                            <span>"Take Photo"</span>
                            <span class="text-muted">"Tap to open camera"</span>
                        </button>
                    }
                >
                    <img
                        src=move || photo_url().unwrap_or_default()
                        alt=format!("{} reference", category.as_str())
                    />
                    <div class="photo-actions">
                        <button class="btn btn-small btn-primary" on:click=move |_| form.start_capture(category)>
                            "Retake Photo"
                        </button>
                        <button class="btn btn-small btn-danger" on:click=move |_| form.delete_photo(category)>
                            "Remove"
                        </button>
                    </div>
                </Show>
            </div>

            <div class="form-group">
                <label>"Items to Purchase"</label>
                <textarea
                    placeholder="e.g., Organic apples, bananas, spinach..."
                    prop:value=move || form.request.with(|r| r.categories[category].items.clone())
                    on:input=move |ev| {
                        form.update(FieldUpdate::Items(category, event_target_value(&ev)));
                    }
                />
            </div>

            <div class="form-group">
                <label>"Special Instructions"</label>
                <textarea
                    placeholder="e.g., Choose ripe but not overripe..."
                    prop:value=move || form.request.with(|r| r.categories[category].instructions.clone())
                    on:input=move |ev| {
                        form.update(FieldUpdate::Instructions(category, event_target_value(&ev)));
                    }
                />
            </div>
        </div>
    }
}
