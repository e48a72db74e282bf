//! 配達時間帯コンポーネント

use crate::form::FormHandle;
use grocery_request_common::{DeliveryTime, FieldUpdate};
use leptos::prelude::*;

#[component]
pub fn DeliveryTimePicker(form: FormHandle) -> impl IntoView {
    view! {
        <div class="section">
            <label class="section-label">"Preferred Delivery Time *"</label>
            <div class="time-slots">
                {DeliveryTime::ALL
                    .into_iter()
                    .map(|slot| {
                        view! {
                            <label class="time-slot">
                                <input
                                    type="radio"
                                    name="deliveryTime"
                                    value=slot.as_str()
                                    prop:checked=move || form.request.with(|r| r.delivery_time == slot)
                                    on:change=move |_| form.update(FieldUpdate::DeliveryTime(slot))
                                />
                                <span>{slot.label()}</span>
                            </label>
                        }
                    })
                    .collect_view()}
            </div>
        </div>
    }
}
