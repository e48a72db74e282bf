//! カメラ撮影の状態機械とカメラ抽象
//!
//! Idle → Requesting → Active → (撮影 | キャンセル) → Idle
//!
//! 実機（getUserMedia）やファイル読み込みは `Camera` を実装する側の責務。
//! コントローラはストリームの取得・解放の順序だけを管理する。

use crate::error::CameraError;
use crate::types::{CategoryKey, Photo};
use std::fmt;

/// カメラの向き
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Facing {
    /// 背面カメラ
    #[default]
    Environment,
    /// 前面カメラ
    User,
}

impl Facing {
    /// getUserMediaの facingMode に渡す値
    pub fn as_str(&self) -> &'static str {
        match self {
            Facing::Environment => "environment",
            Facing::User => "user",
        }
    }
}

/// カメラデバイス
///
/// ストリームは排他資源。`acquire` で得たものは必ず `release` に渡すこと。
#[allow(async_fn_in_trait)]
pub trait Camera {
    type Stream;

    /// カメラの使用権を要求する（権限ダイアログ待ちでサスペンドしうる）
    async fn acquire(&self, facing: Facing) -> Result<Self::Stream, CameraError>;

    /// ストリームから静止画を1枚取得してエンコードする
    fn capture_frame(&self, stream: &Self::Stream) -> Result<Photo, CameraError>;

    /// ストリームを停止してデバイスを解放する
    fn release(&self, stream: Self::Stream);
}

/// 撮影要求の識別子
///
/// 要求ごとに増える。取得完了時に現在の要求と一致しなければ結果は捨てられる。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CaptureTicket(pub(crate) u64);

impl fmt::Display for CaptureTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 撮影状態（ストリームを保持する）
#[derive(Debug)]
pub enum CaptureState<S> {
    Idle,
    Requesting {
        category: CategoryKey,
        ticket: CaptureTicket,
    },
    Active {
        category: CategoryKey,
        ticket: CaptureTicket,
        stream: S,
    },
}

impl<S> Default for CaptureState<S> {
    fn default() -> Self {
        CaptureState::Idle
    }
}

impl<S> CaptureState<S> {
    pub fn phase(&self) -> CapturePhase {
        match self {
            CaptureState::Idle => CapturePhase::Idle,
            CaptureState::Requesting { category, .. } => CapturePhase::Requesting(*category),
            CaptureState::Active { category, .. } => CapturePhase::Active(*category),
        }
    }
}

/// 撮影状態（表示用、ストリームなし）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CapturePhase {
    #[default]
    Idle,
    Requesting(CategoryKey),
    Active(CategoryKey),
}

impl CapturePhase {
    /// 撮影モーダルを表示するカテゴリ
    pub fn active_category(&self) -> Option<CategoryKey> {
        match self {
            CapturePhase::Active(category) => Some(*category),
            _ => None,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, CapturePhase::Idle)
    }
}
