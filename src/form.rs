//! CLIからのフォーム操作
//!
//! 入力の適用・ファイルからの撮影・送信と完了表示の待機

use crate::camera::FileCamera;
use crate::error::Result;
use grocery_request_common::{CameraError, CategoryKey, FieldUpdate, FormController, Request};
use std::path::{Path, PathBuf};
use tracing::info;

pub type CliForm = FormController<FileCamera>;

/// まとめて適用する入力
#[derive(Debug, Default)]
pub struct Draft {
    pub updates: Vec<FieldUpdate>,
    pub photos: Vec<(CategoryKey, PathBuf)>,
}

/// 画像ファイルを1枚撮影してカテゴリに付ける
///
/// カメラ側の失敗はコントローラに通知が残り、フォームは変更されない。
pub async fn take_photo(
    form: &mut CliForm,
    category: CategoryKey,
    path: &Path,
) -> std::result::Result<(), CameraError> {
    form.camera_mut().aim(path);
    form.start_capture(category).await?;
    if let Err(e) = form.capture_photo(category) {
        form.cancel_capture();
        return Err(e);
    }
    Ok(())
}

/// Draftを適用する
///
/// 写真はすべて試し、失敗ごとに警告を出す。1枚でも失敗したら最初のカメラエラーを返す。
pub async fn apply_draft(form: &mut CliForm, draft: Draft) -> Result<()> {
    for update in draft.updates {
        form.update(update);
    }

    let mut first_failure = None;
    for (category, path) in draft.photos {
        match take_photo(form, category, &path).await {
            Ok(()) => eprintln!("✔ {} の写真を取り込みました: {}", category, path.display()),
            Err(e) => {
                if let Some(notice) = form.notice() {
                    eprintln!("⚠ {}", notice);
                }
                eprintln!("  {} ({})", e, category);
                form.dismiss_notice();
                first_failure.get_or_insert(e);
            }
        }
    }

    match first_failure {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}

/// 送信してJSONを標準出力へ書き、完了表示の時間だけ待つ
pub async fn submit(form: &mut CliForm, wait: bool) -> Result<Request> {
    let submission = form.submit();

    println!("{}", serde_json::to_string_pretty(&submission.request)?);
    eprintln!(
        "\n✅ Request Submitted! ({})",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );

    if wait {
        tokio::time::sleep(submission.ack_window).await;
        if form.clear_submitted(submission.generation) {
            info!(generation = submission.generation, "acknowledgment cleared");
        }
    }

    Ok(submission.request)
}

/// 入力済み内容の要約
pub fn summary(request: &Request) -> String {
    let mut lines = vec![
        format!("店舗: {}", request.store_preference),
        format!(
            "予算: {}",
            request
                .budget_cap
                .map(|b| format!("${}", b))
                .unwrap_or_else(|| "指定なし".to_string())
        ),
        format!("配達: {}", request.delivery_time),
    ];

    for (category, entry) in request.categories.iter() {
        if entry.items.is_empty() && entry.instructions.is_empty() && !entry.has_photo() {
            continue;
        }
        let photo = if entry.has_photo() { " 📷" } else { "" };
        lines.push(format!("{}{}: {}", category.label(), photo, entry.items));
    }

    lines.join("\n")
}
