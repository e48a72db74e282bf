//! フォーム動作設定

use crate::capture::Facing;
use std::time::Duration;

/// 送信完了表示の既定時間（ミリ秒）
pub const DEFAULT_ACK_WINDOW_MS: u64 = 3000;

/// コントローラに渡す設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormSettings {
    /// 「送信しました」を表示しておく時間
    pub ack_window: Duration,
    /// 撮影に使うカメラの向き
    pub facing: Facing,
}

impl Default for FormSettings {
    fn default() -> Self {
        Self {
            ack_window: Duration::from_millis(DEFAULT_ACK_WINDOW_MS),
            facing: Facing::Environment,
        }
    }
}
