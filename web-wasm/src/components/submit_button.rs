//! 送信ボタンコンポーネント

use crate::form::FormHandle;
use leptos::prelude::*;

#[component]
pub fn SubmitButton(form: FormHandle) -> impl IntoView {
    view! {
        <button
            class=move || {
                if form.submitted.get() { "btn btn-submit submitted" } else { "btn btn-submit" }
            }
            on:click=move |_| form.submit()
        >
            {move || {
                if form.submitted.get() { "Request Submitted!" } else { "Submit Grocery Request" }
            }}
        </button>
    }
}
