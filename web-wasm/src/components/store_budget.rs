//! 店舗・予算コンポーネント

use crate::form::FormHandle;
use grocery_request_common::{Budget, FieldUpdate, Store};
use leptos::prelude::*;

#[component]
pub fn StoreBudget(form: FormHandle) -> impl IntoView {
    // 入力途中の文字列（"12." など）はそのまま表示し、Requestには解釈できた値だけ入れる
    let (budget_text, set_budget_text) = signal(String::new());

    view! {
        <div class="section settings-grid">
            <div class="form-group">
                <label for="store">"Store Preference *"</label>
                <select
                    id="store"
                    on:change=move |ev| {
                        if let Ok(store) = event_target_value(&ev).parse::<Store>() {
                            form.update(FieldUpdate::Store(store));
                        }
                    }
                >
                    {Store::ALL
                        .into_iter()
                        .map(|store| {
                            view! {
                                <option
                                    value=store.as_str()
                                    selected=move || form.request.with(|r| r.store_preference == store)
                                >
                                    {store.label()}
                                </option>
                            }
                        })
                        .collect_view()}
                </select>
            </div>

            <div class="form-group">
                <label for="budget">"Budget Cap"</label>
                <div class="budget-input">
                    <span class="text-muted">"$"</span>
                    <input
                        type="number"
                        id="budget"
                        min="0"
                        placeholder="e.g., 150"
                        prop:value=move || budget_text.get()
                        on:input=move |ev| {
                            let text = event_target_value(&ev);
                            form.update(FieldUpdate::BudgetCap(Budget::parse(&text)));
                            set_budget_text.set(text);
                        }
                    />
                </div>
            </div>
        </div>
    }
}
