//! Grocery Request CLI
//!
//! フォームの状態管理は grocery_request_common、ここは端末とファイル入出力の層

pub mod camera;
pub mod cli;
pub mod config;
pub mod error;
pub mod form;
pub mod interactive;
pub mod logging;
