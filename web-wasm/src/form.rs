//! フォーム状態のハンドル
//!
//! `FormController` はカメラストリーム（!Send）を持つのでローカルストレージに置き、
//! 表示に必要な値だけをシグナルへ写す。コンポーネントにはこのハンドルを渡す。

use crate::camera::BrowserCamera;
use gloo::timers::callback::Timeout;
use grocery_request_common::{
    Camera, CapturePhase, CategoryKey, FieldUpdate, FormController, FormSettings, Request,
};
use leptos::prelude::*;
use leptos::task::spawn_local;

type Controller = FormController<BrowserCamera>;

#[derive(Clone, Copy)]
pub struct FormHandle {
    controller: StoredValue<Controller, LocalStorage>,
    pub request: RwSignal<Request>,
    pub phase: RwSignal<CapturePhase>,
    pub submitted: RwSignal<bool>,
    notify: fn(&str),
}

impl FormHandle {
    /// 通知は `alert` で表示する
    pub fn new() -> Self {
        Self::with_settings(FormSettings::default(), gloo::dialogs::alert)
    }

    pub fn with_settings(settings: FormSettings, notify: fn(&str)) -> Self {
        Self {
            controller: StoredValue::new_local(FormController::with_settings(BrowserCamera, settings)),
            request: RwSignal::new(Request::new()),
            phase: RwSignal::new(CapturePhase::Idle),
            submitted: RwSignal::new(false),
            notify,
        }
    }

    /// コントローラを操作し、結果をシグナルに反映する
    fn apply<R>(&self, f: impl FnOnce(&mut Controller) -> R) -> Option<R> {
        let (out, request, phase, submitted, notice) = self.controller.try_update_value(|form| {
            let out = f(form);
            let notice = form.notice().map(String::from);
            form.dismiss_notice();
            (out, form.request().clone(), form.phase(), form.is_submitted(), notice)
        })?;

        if self.request.with_untracked(|current| current != &request) {
            self.request.set(request);
        }
        if self.phase.get_untracked() != phase {
            self.phase.set(phase);
        }
        if self.submitted.get_untracked() != submitted {
            self.submitted.set(submitted);
        }
        if let Some(notice) = notice {
            (self.notify)(&notice);
        }
        Some(out)
    }

    /// Active中のカメラ映像をプレビュー枠に挿入する
    pub fn mount_preview(&self, container: &web_sys::Element) {
        self.controller.with_value(|form| {
            if let Some(feed) = form.active_stream() {
                if let Err(e) = container.append_child(feed.video()) {
                    gloo::console::error!("preview mount failed:", e);
                }
            }
        });
    }

    pub fn update(&self, update: FieldUpdate) {
        self.apply(|form| form.update(update));
    }

    /// カメラ権限を要求する（待機中も画面は操作可能）
    pub fn start_capture(&self, category: CategoryKey) {
        let Some((ticket, facing, camera)) = self.apply(|form| {
            let ticket = form.begin_capture(category);
            (ticket, form.settings().facing, *form.camera())
        }) else {
            return;
        };

        let handle = *self;
        spawn_local(async move {
            let result = camera.acquire(facing).await;
            handle.apply(|form| {
                if let Err(e) = form.finish_acquire(ticket, result) {
                    gloo::console::error!("Camera access denied:", e.to_string());
                }
            });
        });
    }

    pub fn capture_photo(&self, category: CategoryKey) {
        self.apply(|form| {
            if let Err(e) = form.capture_photo(category) {
                gloo::console::warn!("capture failed:", e.to_string());
            }
        });
    }

    pub fn cancel_capture(&self) {
        self.apply(|form| form.cancel_capture());
    }

    pub fn delete_photo(&self, category: CategoryKey) {
        self.apply(|form| form.delete_photo(category));
    }

    /// 送信（コンソールへ出力し、一定時間「送信済み」を表示）
    pub fn submit(&self) {
        let Some(submission) = self.apply(|form| form.submit()) else {
            return;
        };

        match serde_json::to_string_pretty(&submission.request) {
            Ok(json) => gloo::console::log!("Form Data:", json),
            Err(e) => gloo::console::error!("serialize failed:", e.to_string()),
        }

        let handle = *self;
        let generation = submission.generation;
        let millis = u32::try_from(submission.ack_window.as_millis()).unwrap_or(u32::MAX);
        Timeout::new(millis, move || {
            handle.apply(|form| form.clear_submitted(generation));
        })
        .forget();
    }
}

impl Default for FormHandle {
    fn default() -> Self {
        Self::new()
    }
}
