//! フォームデータの型定義
//!
//! WebとCLIで共有される型:
//! - Request: フォーム全体の状態
//! - CategoryEntry: カテゴリごとの品目・指示・写真
//! - Store / DeliveryTime / CategoryKey: 選択肢（固定）

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Index;
use std::str::FromStr;
use std::sync::Arc;

/// 店舗
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Store {
    #[default]
    Heb,
    Target,
    Costco,
    WholeFoods,
    TraderJoes,
    Walmart,
}

impl Store {
    pub const ALL: [Store; 6] = [
        Store::Heb,
        Store::Target,
        Store::Costco,
        Store::WholeFoods,
        Store::TraderJoes,
        Store::Walmart,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Store::Heb => "heb",
            Store::Target => "target",
            Store::Costco => "costco",
            Store::WholeFoods => "whole-foods",
            Store::TraderJoes => "trader-joes",
            Store::Walmart => "walmart",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Store::Heb => "H-E-B",
            Store::Target => "Target",
            Store::Costco => "Costco",
            Store::WholeFoods => "Whole Foods",
            Store::TraderJoes => "Trader Joe's",
            Store::Walmart => "Walmart",
        }
    }
}

impl FromStr for Store {
    type Err = Error;

    /// 機械値（"whole-foods"）と表示名（"Whole Foods"）の両方を受け付ける
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Store::ALL
            .into_iter()
            .find(|store| store.as_str().eq_ignore_ascii_case(s) || store.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownValue(format!("store '{}'", s)))
    }
}

impl fmt::Display for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 配達時間帯
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryTime {
    #[default]
    Flexible,
    Morning,
    Afternoon,
    Evening,
    Specific,
}

impl DeliveryTime {
    pub const ALL: [DeliveryTime; 5] = [
        DeliveryTime::Flexible,
        DeliveryTime::Morning,
        DeliveryTime::Afternoon,
        DeliveryTime::Evening,
        DeliveryTime::Specific,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryTime::Flexible => "flexible",
            DeliveryTime::Morning => "morning",
            DeliveryTime::Afternoon => "afternoon",
            DeliveryTime::Evening => "evening",
            DeliveryTime::Specific => "specific",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DeliveryTime::Flexible => "Flexible (ASAP)",
            DeliveryTime::Morning => "Morning (8am - 12pm)",
            DeliveryTime::Afternoon => "Afternoon (12pm - 5pm)",
            DeliveryTime::Evening => "Evening (5pm - 8pm)",
            DeliveryTime::Specific => "Specific Time",
        }
    }
}

impl FromStr for DeliveryTime {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        DeliveryTime::ALL
            .into_iter()
            .find(|slot| slot.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownValue(format!("delivery time '{}'", s)))
    }
}

impl fmt::Display for DeliveryTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 売り場カテゴリ（固定5種、実行時に増減しない）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKey {
    Produce,
    Meat,
    Pantry,
    Frozen,
    Household,
}

impl CategoryKey {
    /// 表示順
    pub const ALL: [CategoryKey; 5] = [
        CategoryKey::Produce,
        CategoryKey::Meat,
        CategoryKey::Pantry,
        CategoryKey::Frozen,
        CategoryKey::Household,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryKey::Produce => "produce",
            CategoryKey::Meat => "meat",
            CategoryKey::Pantry => "pantry",
            CategoryKey::Frozen => "frozen",
            CategoryKey::Household => "household",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CategoryKey::Produce => "🥕 Produce",
            CategoryKey::Meat => "🥩 Meat & Seafood",
            CategoryKey::Pantry => "🥫 Pantry",
            CategoryKey::Frozen => "❄️ Frozen",
            CategoryKey::Household => "🧼 Household",
        }
    }
}

impl FromStr for CategoryKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        CategoryKey::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownValue(format!("category '{}'", s)))
    }
}

impl fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 予算上限（有限かつ0以上）
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Budget(f64);

impl Budget {
    pub fn new(amount: f64) -> Option<Self> {
        (amount.is_finite() && amount >= 0.0).then_some(Self(amount))
    }

    /// 入力欄の文字列から変換
    ///
    /// 空文字・数値以外・負数は None（= 上限なし）
    pub fn parse(input: &str) -> Option<Self> {
        input.trim().parse::<f64>().ok().and_then(Self::new)
    }

    pub fn amount(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Budget {
    type Error = Error;

    fn try_from(amount: f64) -> Result<Self, Self::Error> {
        Budget::new(amount).ok_or_else(|| Error::InvalidBudget(amount.to_string()))
    }
}

impl From<Budget> for f64 {
    fn from(budget: Budget) -> Self {
        budget.0
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.fract() == 0.0 {
            write!(f, "{:.0}", self.0)
        } else {
            write!(f, "{:.2}", self.0)
        }
    }
}

/// 撮影済み写真（Data URL）
///
/// `Arc<str>` で保持するので、Requestを複製しても画像データはコピーされない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Photo(Arc<str>);

impl Photo {
    /// "data:image/jpeg;base64,/9j/..." 形式の文字列から作成
    ///
    /// `data:` で始まらない、またはデータ部分が空ならNone
    pub fn from_data_url(data_url: impl Into<String>) -> Option<Self> {
        let data_url = data_url.into();
        let valid = data_url.starts_with("data:")
            && data_url
                .split_once(',')
                .is_some_and(|(_, payload)| !payload.is_empty());
        valid.then(|| Self(data_url.into()))
    }

    /// Base64エンコード済みデータから作成
    pub fn from_base64(mime_type: &str, payload: &str) -> Self {
        Self(format!("data:{};base64,{}", mime_type, payload).into())
    }

    pub fn data_url(&self) -> &str {
        &self.0
    }

    /// MIMEタイプ（取得できなければ "image/jpeg"）
    pub fn mime_type(&self) -> &str {
        self.0
            .split(':')
            .nth(1)
            .and_then(|s| s.split(';').next())
            .unwrap_or("image/jpeg")
    }

    /// Base64データ部分
    pub fn base64_payload(&self) -> Option<&str> {
        self.0.split(',').nth(1)
    }

    /// 同じ画像バッファを共有しているか
    pub fn shares_buffer(&self, other: &Photo) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// カテゴリごとの入力内容
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CategoryEntry {
    pub items: String,
    pub instructions: String,
    pub photo: Option<Photo>,
}

impl CategoryEntry {
    pub fn has_photo(&self) -> bool {
        self.photo.is_some()
    }
}

/// 全カテゴリの入力内容
///
/// キーごとに1フィールドを持つので、エントリが欠けることはない。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Categories {
    produce: CategoryEntry,
    meat: CategoryEntry,
    pantry: CategoryEntry,
    frozen: CategoryEntry,
    household: CategoryEntry,
}

impl Categories {
    pub fn get(&self, key: CategoryKey) -> &CategoryEntry {
        match key {
            CategoryKey::Produce => &self.produce,
            CategoryKey::Meat => &self.meat,
            CategoryKey::Pantry => &self.pantry,
            CategoryKey::Frozen => &self.frozen,
            CategoryKey::Household => &self.household,
        }
    }

    fn get_mut(&mut self, key: CategoryKey) -> &mut CategoryEntry {
        match key {
            CategoryKey::Produce => &mut self.produce,
            CategoryKey::Meat => &mut self.meat,
            CategoryKey::Pantry => &mut self.pantry,
            CategoryKey::Frozen => &mut self.frozen,
            CategoryKey::Household => &mut self.household,
        }
    }

    /// 1カテゴリだけ差し替えた新しい値を返す
    pub fn with_entry(&self, key: CategoryKey, entry: CategoryEntry) -> Self {
        let mut next = self.clone();
        *next.get_mut(key) = entry;
        next
    }

    /// 表示順で列挙
    pub fn iter(&self) -> impl Iterator<Item = (CategoryKey, &CategoryEntry)> + '_ {
        CategoryKey::ALL.into_iter().map(move |key| (key, self.get(key)))
    }

    pub fn photo_count(&self) -> usize {
        self.iter().filter(|(_, entry)| entry.has_photo()).count()
    }
}

impl Index<CategoryKey> for Categories {
    type Output = CategoryEntry;

    fn index(&self, key: CategoryKey) -> &Self::Output {
        self.get(key)
    }
}

/// 買い物リクエスト（フォーム全体）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Request {
    pub store_preference: Store,
    pub budget_cap: Option<Budget>,
    pub delivery_time: DeliveryTime,
    pub categories: Categories,
    pub substitutions: String,
    pub notes: String,
}

impl Request {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_default_has_every_category() {
        let request = Request::new();
        assert_eq!(request.store_preference, Store::Heb);
        assert_eq!(request.delivery_time, DeliveryTime::Flexible);
        assert!(request.budget_cap.is_none());
        assert_eq!(request.categories.iter().count(), CategoryKey::ALL.len());
        for (_, entry) in request.categories.iter() {
            assert_eq!(entry, &CategoryEntry::default());
        }
    }

    #[test]
    fn test_request_serialize_camel_case() {
        let mut request = Request::new();
        request.store_preference = Store::WholeFoods;
        request.budget_cap = Budget::new(150.0);
        request.notes = "Ring the bell".to_string();

        let json = serde_json::to_string(&request).expect("シリアライズ失敗");
        assert!(json.contains("\"storePreference\":\"whole-foods\""));
        assert!(json.contains("\"budgetCap\":150.0"));
        assert!(json.contains("\"deliveryTime\":\"flexible\""));
        assert!(json.contains("\"produce\":{\"items\":\"\",\"instructions\":\"\",\"photo\":null}"));
        assert!(json.contains("\"notes\":\"Ring the bell\""));
    }

    #[test]
    fn test_request_deserialize_missing_categories() {
        // 欠けたカテゴリは空エントリで補われる
        let json = r#"{
            "storePreference": "costco",
            "categories": { "meat": { "items": "Chicken thighs" } }
        }"#;

        let request: Request = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert_eq!(request.store_preference, Store::Costco);
        assert_eq!(request.categories[CategoryKey::Meat].items, "Chicken thighs");
        assert_eq!(request.categories[CategoryKey::Produce], CategoryEntry::default());
        assert_eq!(request.categories.iter().count(), 5);
    }

    #[test]
    fn test_negative_budget_rejected_on_deserialize() {
        let json = r#"{ "budgetCap": -10 }"#;
        assert!(serde_json::from_str::<Request>(json).is_err());
    }

    #[test]
    fn test_budget_parse() {
        assert_eq!(Budget::parse("150").map(Budget::amount), Some(150.0));
        assert_eq!(Budget::parse(" 42.5 ").map(Budget::amount), Some(42.5));
        assert!(Budget::parse("").is_none());
        assert!(Budget::parse("abc").is_none());
        assert!(Budget::parse("-1").is_none());
        assert!(Budget::parse("NaN").is_none());
    }

    #[test]
    fn test_budget_display() {
        assert_eq!(Budget::new(150.0).map(|b| b.to_string()), Some("150".to_string()));
        assert_eq!(Budget::new(12.5).map(|b| b.to_string()), Some("12.50".to_string()));
    }

    #[test]
    fn test_store_from_str_accepts_label_and_value() {
        assert_eq!("trader-joes".parse::<Store>().ok(), Some(Store::TraderJoes));
        assert_eq!("Trader Joe's".parse::<Store>().ok(), Some(Store::TraderJoes));
        assert_eq!("H-E-B".parse::<Store>().ok(), Some(Store::Heb));
        assert!("Kroger".parse::<Store>().is_err());
    }

    #[test]
    fn test_enum_values_match_serde() {
        for store in Store::ALL {
            let json = serde_json::to_string(&store).expect("シリアライズ失敗");
            assert_eq!(json, format!("\"{}\"", store.as_str()));
        }
        for slot in DeliveryTime::ALL {
            let json = serde_json::to_string(&slot).expect("シリアライズ失敗");
            assert_eq!(json, format!("\"{}\"", slot.as_str()));
        }
        for key in CategoryKey::ALL {
            let json = serde_json::to_string(&key).expect("シリアライズ失敗");
            assert_eq!(json, format!("\"{}\"", key.as_str()));
        }
    }

    #[test]
    fn test_photo_data_url_parts() {
        let photo = Photo::from_data_url("data:image/png;base64,iVBORw0KGgo=").expect("Data URL");
        assert_eq!(photo.mime_type(), "image/png");
        assert_eq!(photo.base64_payload(), Some("iVBORw0KGgo="));

        let photo = Photo::from_base64("image/jpeg", "/9j/4AAQ");
        assert_eq!(photo.data_url(), "data:image/jpeg;base64,/9j/4AAQ");
    }

    #[test]
    fn test_photo_rejects_non_data_url() {
        assert!(Photo::from_data_url("https://example.com/a.jpg").is_none());
        assert!(Photo::from_data_url("data:,").is_none());
        assert!(Photo::from_data_url("data:image/jpeg;base64,").is_none());
    }

    #[test]
    fn test_photo_serializes_as_string() {
        let entry = CategoryEntry {
            photo: Some(Photo::from_base64("image/jpeg", "AAAA")),
            ..Default::default()
        };
        let json = serde_json::to_string(&entry).expect("シリアライズ失敗");
        assert!(json.contains("\"photo\":\"data:image/jpeg;base64,AAAA\""));
    }
}
