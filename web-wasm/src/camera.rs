//! ブラウザカメラ（getUserMedia）
//!
//! ストリームごとに `<video>` 要素を1つ作り、プレビュー表示とフレーム取得の両方に使う。
//! 解放時はすべてのトラックを停止し、video要素をDOMから外す。

use grocery_request_common::{Camera, CameraError, Facing, Photo};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    CanvasRenderingContext2d, DomException, HtmlCanvasElement, HtmlVideoElement, MediaStream,
    MediaStreamConstraints, MediaStreamTrack,
};

const JPEG_MIME: &str = "image/jpeg";

/// getUserMediaの video 制約
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VideoConstraints<'a> {
    facing_mode: &'a str,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserCamera;

/// 取得済みのカメラストリーム
pub struct CameraFeed {
    stream: MediaStream,
    video: HtmlVideoElement,
}

impl CameraFeed {
    /// プレビュー用のvideo要素（撮影モーダルに挿入する）
    pub fn video(&self) -> &HtmlVideoElement {
        &self.video
    }
}

impl Camera for BrowserCamera {
    type Stream = CameraFeed;

    async fn acquire(&self, facing: Facing) -> Result<CameraFeed, CameraError> {
        let window = web_sys::window()
            .ok_or_else(|| CameraError::Unavailable("window not available".to_string()))?;
        let devices = window.navigator().media_devices().map_err(classify_error)?;

        let video_constraints = serde_wasm_bindgen::to_value(&VideoConstraints {
            facing_mode: facing.as_str(),
        })
        .map_err(|e| CameraError::Unavailable(e.to_string()))?;

        let constraints = MediaStreamConstraints::new();
        constraints.set_video(&video_constraints);

        let promise = devices
            .get_user_media_with_constraints(&constraints)
            .map_err(classify_error)?;
        let stream: MediaStream = JsFuture::from(promise)
            .await
            .map_err(classify_error)?
            .dyn_into()
            .map_err(|_| CameraError::Unavailable("getUserMedia returned no stream".to_string()))?;

        match attach_video(&stream) {
            Ok(video) => Ok(CameraFeed { stream, video }),
            Err(e) => {
                stop_tracks(&stream);
                Err(e)
            }
        }
    }

    fn capture_frame(&self, feed: &CameraFeed) -> Result<Photo, CameraError> {
        let video = &feed.video;
        let (width, height) = (video.video_width(), video.video_height());
        if width == 0 || height == 0 {
            return Err(CameraError::Frame("camera is still starting".to_string()));
        }

        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| CameraError::Frame("document not available".to_string()))?;
        let canvas: HtmlCanvasElement = document
            .create_element("canvas")
            .map_err(frame_error)?
            .dyn_into()
            .map_err(|_| CameraError::Frame("canvas element".to_string()))?;
        canvas.set_width(width);
        canvas.set_height(height);

        let context: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .map_err(frame_error)?
            .ok_or_else(|| CameraError::Frame("2d context not available".to_string()))?
            .dyn_into()
            .map_err(|_| CameraError::Frame("2d context".to_string()))?;
        context
            .draw_image_with_html_video_element(video, 0.0, 0.0)
            .map_err(frame_error)?;

        let data_url = canvas.to_data_url_with_type(JPEG_MIME).map_err(frame_error)?;
        Photo::from_data_url(data_url)
            .ok_or_else(|| CameraError::Frame("empty frame".to_string()))
    }

    fn release(&self, feed: CameraFeed) {
        stop_tracks(&feed.stream);
        feed.video.set_src_object(None);
        feed.video.remove();
    }
}

/// ストリームを再生するvideo要素を作る
fn attach_video(stream: &MediaStream) -> Result<HtmlVideoElement, CameraError> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| CameraError::Unavailable("document not available".to_string()))?;
    let video: HtmlVideoElement = document
        .create_element("video")
        .map_err(classify_error)?
        .dyn_into()
        .map_err(|_| CameraError::Unavailable("video element".to_string()))?;

    video.set_class_name("camera-video");
    video.set_autoplay(true);
    video.set_muted(true);
    // iOS Safariでフルスクリーン再生にしない
    video.set_attribute("playsinline", "").map_err(classify_error)?;
    video.set_src_object(Some(stream));
    // 再生開始はautoplayに任せる。失敗してもプレビューが黒いだけ
    let _ = video.play();
    Ok(video)
}

fn stop_tracks(stream: &MediaStream) {
    for track in stream.get_tracks().iter() {
        if let Ok(track) = track.dyn_into::<MediaStreamTrack>() {
            track.stop();
        }
    }
}

/// DOMExceptionの名前で権限拒否とそれ以外を分ける
pub fn classify_error(err: JsValue) -> CameraError {
    match err.dyn_ref::<DomException>() {
        Some(dom) => {
            let name = dom.name();
            let detail = format!("{}: {}", name, dom.message());
            match name.as_str() {
                "NotAllowedError" | "SecurityError" | "PermissionDeniedError" => {
                    CameraError::PermissionDenied(detail)
                }
                _ => CameraError::Unavailable(detail),
            }
        }
        None => CameraError::Unavailable(format!("{:?}", err)),
    }
}

fn frame_error(err: JsValue) -> CameraError {
    CameraError::Frame(format!("{:?}", err))
}
