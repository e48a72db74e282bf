//! フォームコントローラ
//!
//! Requestの状態、撮影状態機械、送信完了フラグを1か所で持つ。
//! 表示側（Leptos / CLI）はイベントごとにここのメソッドを呼ぶだけ。

use crate::action::FieldUpdate;
use crate::capture::{Camera, CapturePhase, CaptureState, CaptureTicket};
use crate::error::CameraError;
use crate::settings::FormSettings;
use crate::types::{CategoryKey, Request};
use std::time::Duration;
use tracing::{debug, info, warn};

/// カメラ失敗時にユーザーへ出す通知
pub const CAMERA_NOTICE: &str = "Please allow camera access to take photos";

/// 送信の受付結果
///
/// ホストは `ack_window` 経過後に `clear_submitted(generation)` を呼ぶ。
#[derive(Debug, Clone)]
pub struct Submission {
    pub generation: u64,
    pub request: Request,
    pub ack_window: Duration,
}

pub struct FormController<C: Camera> {
    camera: C,
    settings: FormSettings,
    request: Request,
    capture: CaptureState<C::Stream>,
    next_ticket: u64,
    submitted: bool,
    generation: u64,
    notice: Option<String>,
}

impl<C: Camera> FormController<C> {
    pub fn new(camera: C) -> Self {
        Self::with_settings(camera, FormSettings::default())
    }

    pub fn with_settings(camera: C, settings: FormSettings) -> Self {
        Self {
            camera,
            settings,
            request: Request::new(),
            capture: CaptureState::Idle,
            next_ticket: 0,
            submitted: false,
            generation: 0,
            notice: None,
        }
    }

    /// 初期値入りのRequestから始める
    pub fn with_request(mut self, request: Request) -> Self {
        self.request = request;
        self
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn camera(&self) -> &C {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut C {
        &mut self.camera
    }

    pub fn settings(&self) -> &FormSettings {
        &self.settings
    }

    pub fn phase(&self) -> CapturePhase {
        self.capture.phase()
    }

    /// Active中のストリーム（プレビュー表示用）
    pub fn active_stream(&self) -> Option<&C::Stream> {
        match &self.capture {
            CaptureState::Active { stream, .. } => Some(stream),
            _ => None,
        }
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn update(&mut self, update: FieldUpdate) {
        self.request = self.request.apply(update);
    }

    /// 撮影要求を開始する（Requestingへ）
    ///
    /// Active中のストリームがあれば先に解放する。
    /// 返したチケットを `finish_acquire` に渡すこと。
    pub fn begin_capture(&mut self, category: CategoryKey) -> CaptureTicket {
        self.release_active();
        self.next_ticket += 1;
        let ticket = CaptureTicket(self.next_ticket);
        debug!(%category, %ticket, "camera requested");
        self.capture = CaptureState::Requesting { category, ticket };
        ticket
    }

    /// カメラ取得の結果を反映する
    ///
    /// キャンセル・別要求で置き換えられたチケットの結果は捨てる（ストリームは即解放）。
    pub fn finish_acquire(
        &mut self,
        ticket: CaptureTicket,
        result: Result<C::Stream, CameraError>,
    ) -> Result<(), CameraError> {
        let category = match &self.capture {
            CaptureState::Requesting { category, ticket: current } if *current == ticket => *category,
            _ => {
                debug!(%ticket, "stale camera result dropped");
                if let Ok(stream) = result {
                    self.camera.release(stream);
                }
                return Ok(());
            }
        };

        match result {
            Ok(stream) => {
                debug!(%category, %ticket, "camera active");
                self.capture = CaptureState::Active {
                    category,
                    ticket,
                    stream,
                };
                Ok(())
            }
            Err(e) => {
                warn!(%category, error = %e, "camera access failed");
                self.capture = CaptureState::Idle;
                self.notice = Some(CAMERA_NOTICE.to_string());
                Err(e)
            }
        }
    }

    /// 撮影開始（要求から取得完了まで）
    pub async fn start_capture(&mut self, category: CategoryKey) -> Result<(), CameraError> {
        let ticket = self.begin_capture(category);
        let result = self.camera.acquire(self.settings.facing).await;
        self.finish_acquire(ticket, result)
    }

    /// 静止画を撮ってカテゴリに保存し、カメラを解放する
    ///
    /// 指定カテゴリがActiveでなければ何もしない（Ok(false)）。
    /// フレーム取得に失敗した場合はActiveのまま（再撮影かキャンセルを待つ）。
    pub fn capture_photo(&mut self, category: CategoryKey) -> Result<bool, CameraError> {
        let photo = match &self.capture {
            CaptureState::Active {
                category: active,
                stream,
                ..
            } if *active == category => self.camera.capture_frame(stream),
            _ => return Ok(false),
        };

        let photo = match photo {
            Ok(photo) => photo,
            Err(e) => {
                warn!(%category, error = %e, "frame capture failed");
                self.notice = Some(e.to_string());
                return Err(e);
            }
        };

        self.release_active();
        self.request = self.request.with_photo(category, Some(photo));
        debug!(%category, "photo captured");
        Ok(true)
    }

    /// 撮影をやめる（Requestは変更しない）
    pub fn cancel_capture(&mut self) {
        if !self.capture.phase().is_idle() {
            debug!("capture cancelled");
        }
        self.release_active();
    }

    /// 写真を削除する（無ければ何もしない）
    pub fn delete_photo(&mut self, category: CategoryKey) {
        if self.request.categories[category].has_photo() {
            self.request = self.request.with_photo(category, None);
        }
    }

    /// 送信する
    ///
    /// 送信先は無いので内容をログに出し、完了フラグを立てるだけ。
    pub fn submit(&mut self) -> Submission {
        self.generation += 1;
        self.submitted = true;

        match serde_json::to_string(&self.request) {
            Ok(json) => info!(generation = self.generation, request = %json, "grocery request submitted"),
            Err(e) => warn!(error = %e, "request serialization failed"),
        }

        Submission {
            generation: self.generation,
            request: self.request.clone(),
            ack_window: self.settings.ack_window,
        }
    }

    /// 完了表示を消す
    ///
    /// 古い送信のタイマーは無視する。消した場合はtrue。
    pub fn clear_submitted(&mut self, generation: u64) -> bool {
        if self.submitted && generation == self.generation {
            self.submitted = false;
            true
        } else {
            false
        }
    }

    /// Active/Requestingを終わらせてIdleへ
    fn release_active(&mut self) {
        if let CaptureState::Active { stream, .. } = std::mem::take(&mut self.capture) {
            self.camera.release(stream);
        }
    }
}

impl<C: Camera> Drop for FormController<C> {
    fn drop(&mut self) {
        self.release_active();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::Facing;
    use crate::types::{Photo, Store};
    use futures::executor::block_on;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    /// 取得・解放を記録するカメラ
    #[derive(Default)]
    struct MockCamera {
        deny: Cell<bool>,
        fail_frame: Cell<bool>,
        next_id: Cell<u32>,
        live: Rc<RefCell<Vec<u32>>>,
        released: Rc<RefCell<Vec<u32>>>,
        facings: RefCell<Vec<Facing>>,
    }

    impl Camera for MockCamera {
        type Stream = u32;

        async fn acquire(&self, facing: Facing) -> Result<u32, CameraError> {
            self.facings.borrow_mut().push(facing);
            if self.deny.get() {
                return Err(CameraError::PermissionDenied("NotAllowedError".to_string()));
            }
            let id = self.next_id.get() + 1;
            self.next_id.set(id);
            self.live.borrow_mut().push(id);
            Ok(id)
        }

        fn capture_frame(&self, stream: &u32) -> Result<Photo, CameraError> {
            if self.fail_frame.get() {
                return Err(CameraError::Frame("video not ready".to_string()));
            }
            Ok(Photo::from_base64("image/jpeg", &format!("frame{}", stream)))
        }

        fn release(&self, stream: u32) {
            self.live.borrow_mut().retain(|id| *id != stream);
            self.released.borrow_mut().push(stream);
        }
    }

    fn controller() -> FormController<MockCamera> {
        FormController::new(MockCamera::default())
    }

    #[test]
    fn test_capture_stores_photo_and_returns_to_idle() {
        let mut form = controller();
        block_on(form.start_capture(CategoryKey::Produce)).expect("camera");
        assert_eq!(form.phase(), CapturePhase::Active(CategoryKey::Produce));

        assert_eq!(form.capture_photo(CategoryKey::Produce), Ok(true));

        let photo = form.request().categories[CategoryKey::Produce].photo.clone();
        let photo = photo.expect("photo");
        assert!(!photo.data_url().is_empty());
        assert_eq!(form.phase(), CapturePhase::Idle);
        assert!(form.camera().live.borrow().is_empty());
        assert_eq!(*form.camera().released.borrow(), vec![1]);
    }

    #[test]
    fn test_requests_rear_camera() {
        let mut form = controller();
        block_on(form.start_capture(CategoryKey::Meat)).expect("camera");
        assert_eq!(*form.camera().facings.borrow(), vec![Facing::Environment]);
    }

    #[test]
    fn test_capture_without_active_surface_is_noop() {
        let mut form = controller();
        let before = form.request().clone();

        assert_eq!(form.capture_photo(CategoryKey::Pantry), Ok(false));
        assert_eq!(form.request(), &before);
        assert_eq!(form.phase(), CapturePhase::Idle);
    }

    #[test]
    fn test_capture_for_other_category_is_noop() {
        let mut form = controller();
        block_on(form.start_capture(CategoryKey::Produce)).expect("camera");

        assert_eq!(form.capture_photo(CategoryKey::Meat), Ok(false));
        assert_eq!(form.phase(), CapturePhase::Active(CategoryKey::Produce));
        assert!(!form.request().categories[CategoryKey::Meat].has_photo());
    }

    #[test]
    fn test_permission_denied_reports_notice_and_keeps_state() {
        let mut form = controller();
        form.update(FieldUpdate::Notes("keep me".to_string()));
        let before = form.request().clone();
        form.camera().deny.set(true);

        let result = block_on(form.start_capture(CategoryKey::Frozen));

        assert!(matches!(result, Err(CameraError::PermissionDenied(_))));
        assert_eq!(form.phase(), CapturePhase::Idle);
        assert_eq!(form.request(), &before);
        assert_eq!(form.notice(), Some(CAMERA_NOTICE));

        // 再試行できる
        form.dismiss_notice();
        form.camera().deny.set(false);
        block_on(form.start_capture(CategoryKey::Frozen)).expect("retry");
        assert_eq!(form.phase(), CapturePhase::Active(CategoryKey::Frozen));
        assert!(form.notice().is_none());
    }

    #[test]
    fn test_cancel_releases_without_mutation() {
        let mut form = controller();
        block_on(form.start_capture(CategoryKey::Household)).expect("camera");
        let before = form.request().clone();

        form.cancel_capture();

        assert_eq!(form.phase(), CapturePhase::Idle);
        assert_eq!(form.request(), &before);
        assert!(form.camera().live.borrow().is_empty());
    }

    #[test]
    fn test_new_request_interrupts_active_stream() {
        let mut form = controller();
        block_on(form.start_capture(CategoryKey::Produce)).expect("camera");
        block_on(form.start_capture(CategoryKey::Meat)).expect("camera");

        assert_eq!(form.phase(), CapturePhase::Active(CategoryKey::Meat));
        assert_eq!(*form.camera().live.borrow(), vec![2]);
        assert_eq!(*form.camera().released.borrow(), vec![1]);
    }

    #[test]
    fn test_stale_acquire_is_released() {
        let mut form = controller();
        let first = form.begin_capture(CategoryKey::Produce);
        let second = form.begin_capture(CategoryKey::Pantry);

        // 1回目の結果が遅れて届く
        let late = block_on(form.camera().acquire(Facing::Environment));
        assert_eq!(form.finish_acquire(first, late), Ok(()));
        assert_eq!(form.phase(), CapturePhase::Requesting(CategoryKey::Pantry));
        assert!(form.camera().live.borrow().is_empty());

        let current = block_on(form.camera().acquire(Facing::Environment));
        form.finish_acquire(second, current).expect("camera");
        assert_eq!(form.phase(), CapturePhase::Active(CategoryKey::Pantry));
    }

    #[test]
    fn test_cancel_while_requesting_discards_result() {
        let mut form = controller();
        let ticket = form.begin_capture(CategoryKey::Meat);
        form.cancel_capture();
        assert_eq!(form.phase(), CapturePhase::Idle);

        let result = block_on(form.camera().acquire(Facing::Environment));
        form.finish_acquire(ticket, result).expect("ignored");

        assert_eq!(form.phase(), CapturePhase::Idle);
        assert!(form.camera().live.borrow().is_empty());
    }

    #[test]
    fn test_stale_denial_is_ignored() {
        let mut form = controller();
        let first = form.begin_capture(CategoryKey::Meat);
        let _second = form.begin_capture(CategoryKey::Meat);

        let result = form.finish_acquire(first, Err(CameraError::Unavailable("busy".to_string())));
        assert_eq!(result, Ok(()));
        assert!(form.notice().is_none());
        assert_eq!(form.phase(), CapturePhase::Requesting(CategoryKey::Meat));
    }

    #[test]
    fn test_frame_failure_keeps_surface_open() {
        let mut form = controller();
        block_on(form.start_capture(CategoryKey::Produce)).expect("camera");
        form.camera().fail_frame.set(true);

        let result = form.capture_photo(CategoryKey::Produce);

        assert!(matches!(result, Err(CameraError::Frame(_))));
        assert_eq!(form.phase(), CapturePhase::Active(CategoryKey::Produce));
        assert!(!form.request().categories[CategoryKey::Produce].has_photo());
        assert!(form.notice().is_some());

        form.cancel_capture();
        assert!(form.camera().live.borrow().is_empty());
    }

    #[test]
    fn test_retake_replaces_photo() {
        let mut form = controller();
        block_on(form.start_capture(CategoryKey::Produce)).expect("camera");
        form.capture_photo(CategoryKey::Produce).expect("capture");
        block_on(form.start_capture(CategoryKey::Produce)).expect("camera");
        form.capture_photo(CategoryKey::Produce).expect("capture");

        let photo = form.request().categories[CategoryKey::Produce].photo.clone();
        assert_eq!(photo.and_then(|p| p.base64_payload().map(String::from)), Some("frame2".to_string()));
    }

    #[test]
    fn test_delete_photo() {
        let mut form = controller();
        block_on(form.start_capture(CategoryKey::Pantry)).expect("camera");
        form.capture_photo(CategoryKey::Pantry).expect("capture");

        form.delete_photo(CategoryKey::Pantry);
        assert!(!form.request().categories[CategoryKey::Pantry].has_photo());
    }

    #[test]
    fn test_delete_missing_photo_is_noop() {
        let mut form = controller();
        form.update(FieldUpdate::Items(CategoryKey::Meat, "Ribs".to_string()));
        let before = form.request().clone();

        form.delete_photo(CategoryKey::Meat);
        assert_eq!(form.request(), &before);
    }

    #[test]
    fn test_submit_sets_and_clears_flag() {
        let mut form = controller();
        form.update(FieldUpdate::Store(Store::Costco));
        let before = form.request().clone();

        let submission = form.submit();
        assert!(form.is_submitted());
        assert_eq!(submission.request, before);
        assert_eq!(submission.ack_window, Duration::from_millis(3000));

        assert!(form.clear_submitted(submission.generation));
        assert!(!form.is_submitted());
        assert_eq!(form.request(), &before);
        assert_eq!(form.phase(), CapturePhase::Idle);
    }

    #[test]
    fn test_old_timer_does_not_clear_new_submission() {
        let mut form = controller();
        let first = form.submit();
        let second = form.submit();

        assert!(!form.clear_submitted(first.generation));
        assert!(form.is_submitted());
        assert!(form.clear_submitted(second.generation));
        assert!(!form.clear_submitted(second.generation));
    }

    #[test]
    fn test_drop_releases_active_stream() {
        let live;
        {
            let mut form = controller();
            live = Rc::clone(&form.camera().live);
            block_on(form.start_capture(CategoryKey::Frozen)).expect("camera");
            assert_eq!(live.borrow().len(), 1);
        }
        assert!(live.borrow().is_empty());
    }

}
