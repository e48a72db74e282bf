//! 撮影モーダルコンポーネント

use crate::form::FormHandle;
use grocery_request_common::CategoryKey;
use leptos::html;
use leptos::prelude::*;

#[component]
pub fn CameraModal(form: FormHandle, category: CategoryKey) -> impl IntoView {
    let preview_ref = NodeRef::<html::Div>::new();

    // 描画後にストリームのvideo要素を枠へ差し込む
    Effect::new(move |_| {
        if let Some(container) = preview_ref.get() {
            form.mount_preview(&container);
        }
    });

    view! {
        <div class="modal-backdrop">
            <div class="modal">
                <div class="camera-preview" node_ref=preview_ref></div>
                <div class="modal-body">
                    <h3>{category.label()}</h3>
                    <p class="text-muted">"Position your item in the camera view and tap \"Capture Photo\""</p>
                    <div class="modal-actions">
                        <button class="btn btn-primary" on:click=move |_| form.capture_photo(category)>
                            "📷 Capture Photo"
                        </button>
                        <button class="btn btn-secondary" on:click=move |_| form.cancel_capture()>
                            "✕ Cancel"
                        </button>
                    </div>
                </div>
            </div>
        </div>
    }
}
