//! 自由記述欄コンポーネント

use leptos::prelude::*;

#[component]
pub fn TextSection<FV, FI>(
    id: &'static str,
    label: &'static str,
    placeholder: &'static str,
    value: FV,
    on_input: FI,
) -> impl IntoView
where
    FV: Fn() -> String + Send + Sync + 'static,
    FI: Fn(String) + Send + Sync + 'static,
{
    view! {
        <div class="section form-group">
            <label for=id>{label}</label>
            <textarea
                id=id
                placeholder=placeholder
                prop:value=value
                on:input=move |ev| on_input(event_target_value(&ev))
            />
        </div>
    }
}
