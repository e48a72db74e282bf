//! Grocery Request Common Library
//!
//! WebとCLIで共有されるフォーム状態・更新処理・撮影コントローラ

pub mod types;
pub mod action;
pub mod capture;
pub mod controller;
pub mod error;
pub mod settings;

pub use types::{Budget, Categories, CategoryEntry, CategoryKey, DeliveryTime, Photo, Request, Store};
pub use action::FieldUpdate;
pub use capture::{Camera, CapturePhase, CaptureState, CaptureTicket, Facing};
pub use controller::{FormController, Submission, CAMERA_NOTICE};
pub use error::{CameraError, Error};
pub use settings::{FormSettings, DEFAULT_ACK_WINDOW_MS};
