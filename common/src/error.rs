//! エラー型定義

use thiserror::Error;

/// 入力値の解釈エラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid budget: {0}")]
    InvalidBudget(String),

    #[error("Unknown value: {0}")]
    UnknownValue(String),
}

/// カメラ操作のエラー
///
/// どれもフォームの状態を壊さない。ユーザーに通知して再試行させる。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CameraError {
    /// ユーザーが権限を拒否した
    #[error("Camera permission denied: {0}")]
    PermissionDenied(String),

    /// デバイスが存在しない・使用中など
    #[error("Camera unavailable: {0}")]
    Unavailable(String),

    /// フレームの取得・エンコードに失敗
    #[error("Frame capture failed: {0}")]
    Frame(String),
}
