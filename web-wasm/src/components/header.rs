//! ヘッダーコンポーネント

use leptos::prelude::*;

#[component]
pub fn Header() -> impl IntoView {
    view! {
        <header class="header">
            <h1>"Grocery Request"</h1>
            <p class="text-muted">"Fill out your shopping preferences and take photos for reference"</p>
        </header>
    }
}
