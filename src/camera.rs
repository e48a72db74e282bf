//! 画像ファイルをカメラとして扱う
//!
//! `aim` で撮影対象のファイルを指定し、取得時にデコード、撮影時にJPEGへ再エンコードする。

use base64::{engine::general_purpose::STANDARD, Engine as _};
use grocery_request_common::{Camera, CameraError, Facing, Photo};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageError};
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct FileCamera {
    scene: Option<PathBuf>,
    jpeg_quality: u8,
}

/// デコード済みの画像（ストリーム相当）
pub struct FileFeed {
    source: PathBuf,
    image: DynamicImage,
}

impl FileFeed {
    pub fn dimensions(&self) -> (u32, u32) {
        (self.image.width(), self.image.height())
    }
}

impl FileCamera {
    pub fn new(jpeg_quality: u8) -> Self {
        Self {
            scene: None,
            jpeg_quality: jpeg_quality.clamp(1, 100),
        }
    }

    /// 次に撮影する画像ファイルを指定
    pub fn aim(&mut self, path: impl Into<PathBuf>) {
        self.scene = Some(path.into());
    }
}

impl Camera for FileCamera {
    type Stream = FileFeed;

    async fn acquire(&self, facing: Facing) -> Result<FileFeed, CameraError> {
        let source = self
            .scene
            .clone()
            .ok_or_else(|| CameraError::Unavailable("撮影する画像が指定されていません".to_string()))?;

        let image = image::open(&source).map_err(|e| open_error(&source, e))?;
        let feed = FileFeed { source, image };
        let (width, height) = feed.dimensions();
        debug!(
            source = %feed.source.display(),
            width,
            height,
            facing = facing.as_str(),
            "file camera opened"
        );
        Ok(feed)
    }

    fn capture_frame(&self, feed: &FileFeed) -> Result<Photo, CameraError> {
        // JPEGはアルファを持てないのでRGBへ変換
        let rgb = feed.image.to_rgb8();
        let mut buffer = Vec::new();
        let encoder = JpegEncoder::new_with_quality(&mut buffer, self.jpeg_quality);
        rgb.write_with_encoder(encoder)
            .map_err(|e| CameraError::Frame(e.to_string()))?;

        Ok(Photo::from_base64("image/jpeg", &STANDARD.encode(&buffer)))
    }

    fn release(&self, feed: FileFeed) {
        debug!(source = %feed.source.display(), "file camera released");
    }
}

fn open_error(source: &Path, e: ImageError) -> CameraError {
    let detail = format!("{}: {}", source.display(), e);
    match e {
        ImageError::IoError(io) if io.kind() == std::io::ErrorKind::PermissionDenied => {
            CameraError::PermissionDenied(detail)
        }
        _ => CameraError::Unavailable(detail),
    }
}
