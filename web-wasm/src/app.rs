//! メインアプリケーションコンポーネント

use crate::components::{
    camera_modal::CameraModal,
    category_card::CategoryCard,
    delivery_time::DeliveryTimePicker,
    header::Header,
    store_budget::StoreBudget,
    submit_button::SubmitButton,
    text_section::TextSection,
};
use crate::form::FormHandle;
use grocery_request_common::{CategoryKey, FieldUpdate};
use leptos::prelude::*;

/// メインアプリケーションコンポーネント
#[component]
pub fn App() -> impl IntoView {
    let form = FormHandle::new();

    view! {
        <div class="container">
            <Header />

            <div class="card">
                <StoreBudget form=form />

                <DeliveryTimePicker form=form />

                <div class="section">
                    <h2>"Shopping by Category"</h2>
                    {CategoryKey::ALL
                        .into_iter()
                        .map(|category| view! { <CategoryCard form=form category=category /> })
                        .collect_view()}
                </div>

                <TextSection
                    id="substitutions"
                    label="Substitution Preferences"
                    placeholder="e.g., If Tropicana OJ is out, get Simply Orange or skip. If grass-fed beef is unavailable, substitute with organic..."
                    value=move || form.request.with(|r| r.substitutions.clone())
                    on_input=move |text| form.update(FieldUpdate::Substitutions(text))
                />

                <TextSection
                    id="notes"
                    label="Additional Notes"
                    placeholder="Any other preferences or information..."
                    value=move || form.request.with(|r| r.notes.clone())
                    on_input=move |text| form.update(FieldUpdate::Notes(text))
                />

                <SubmitButton form=form />
            </div>

            <p class="footer text-muted">"We'll review your request and confirm delivery within 2 hours"</p>

            {move || {
                form.phase
                    .get()
                    .active_category()
                    .map(|category| view! { <CameraModal form=form category=category /> })
            }}
        </div>
    }
}
