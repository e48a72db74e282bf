use crate::error::{GroceryError, Result};
use grocery_request_common::{
    DeliveryTime, Facing, FormSettings, Request, Store, DEFAULT_ACK_WINDOW_MS,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 送信完了表示時間を上書きする環境変数
pub const ACK_WINDOW_ENV: &str = "GROCERY_ACK_MS";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub default_store: Store,
    pub default_delivery_time: DeliveryTime,
    pub ack_window_ms: u64,
    pub jpeg_quality: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_store: Store::default(),
            default_delivery_time: DeliveryTime::default(),
            ack_window_ms: DEFAULT_ACK_WINDOW_MS,
            jpeg_quality: 85,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// ファイルが無ければ既定値
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| GroceryError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("grocery-request").join("config.json"))
    }

    /// 送信完了表示時間（環境変数を優先）
    pub fn ack_window(&self) -> Result<Duration> {
        match std::env::var(ACK_WINDOW_ENV) {
            Ok(value) => parse_ack_ms(&value).map(Duration::from_millis),
            Err(_) => Ok(Duration::from_millis(self.ack_window_ms)),
        }
    }

    pub fn form_settings(&self) -> Result<FormSettings> {
        Ok(FormSettings {
            ack_window: self.ack_window()?,
            facing: Facing::Environment,
        })
    }

    /// 既定の店舗・時間帯を入れた空のRequest
    pub fn initial_request(&self) -> Request {
        Request {
            store_preference: self.default_store,
            delivery_time: self.default_delivery_time,
            ..Request::new()
        }
    }

    pub fn set_jpeg_quality(&mut self, quality: u8) -> Result<()> {
        if !(1..=100).contains(&quality) {
            return Err(GroceryError::Config(format!(
                "JPEG品質は1〜100で指定してください: {}",
                quality
            )));
        }
        self.jpeg_quality = quality;
        Ok(())
    }
}

fn parse_ack_ms(value: &str) -> Result<u64> {
    value
        .trim()
        .parse()
        .map_err(|_| GroceryError::Config(format!("{} が不正です: {}", ACK_WINDOW_ENV, value)))
}
