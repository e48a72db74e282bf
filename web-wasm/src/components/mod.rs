pub mod header;
pub mod store_budget;
pub mod delivery_time;
pub mod category_card;
pub mod text_section;
pub mod camera_modal;
pub mod submit_button;
