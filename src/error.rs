use grocery_request_common::CameraError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GroceryError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("カメラエラー: {0}")]
    Camera(#[from] CameraError),

    #[error("不明な店舗: {0}")]
    UnknownStore(String),

    #[error("不明な配達時間帯: {0}")]
    UnknownDeliveryTime(String),

    #[error("不明なカテゴリ: {0}")]
    UnknownCategory(String),

    #[error("指定が不正です（CATEGORY=VALUE の形式）: {0}")]
    InvalidAssignment(String),

    #[error("予算が不正です: {0}")]
    InvalidBudget(String),

    #[error("入力エラー: {0}")]
    Prompt(String),

    #[error("JSONエラー: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

impl From<dialoguer::Error> for GroceryError {
    fn from(e: dialoguer::Error) -> Self {
        GroceryError::Prompt(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GroceryError>;
