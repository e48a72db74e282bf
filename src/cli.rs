use crate::error::{GroceryError, Result};
use crate::form::Draft;
use clap::{Args, Parser, Subcommand};
use grocery_request_common::{Budget, CategoryKey, DeliveryTime, FieldUpdate, Store};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "grocery-request")]
#[command(about = "買い物リクエスト作成ツール（カテゴリ別の参考写真付き）", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// オプション指定でリクエストを作成して送信
    New(NewArgs),

    /// 対話形式で入力して送信
    Fill {
        /// 送信完了表示の時間を待たずに終了
        #[arg(long)]
        no_wait: bool,
    },

    /// 店舗・配達時間帯・カテゴリの一覧
    Options,

    /// 設定管理
    Config {
        /// 既定の店舗
        #[arg(long, value_parser = parse_store)]
        set_store: Option<Store>,

        /// 既定の配達時間帯
        #[arg(long, value_parser = parse_delivery_time)]
        set_time: Option<DeliveryTime>,

        /// 送信完了表示の時間（ミリ秒）
        #[arg(long)]
        set_ack_ms: Option<u64>,

        /// 写真のJPEG品質 (1-100)
        #[arg(long)]
        set_quality: Option<u8>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[derive(Args, Debug, Default)]
pub struct NewArgs {
    /// 店舗 (heb/target/costco/whole-foods/trader-joes/walmart)
    #[arg(long, value_parser = parse_store)]
    pub store: Option<Store>,

    /// 予算上限（ドル）
    #[arg(long, value_parser = parse_budget)]
    pub budget: Option<Budget>,

    /// 配達時間帯 (flexible/morning/afternoon/evening/specific)
    #[arg(long, value_parser = parse_delivery_time)]
    pub time: Option<DeliveryTime>,

    /// 購入品目（複数指定可）
    #[arg(long, value_name = "CATEGORY=TEXT", value_parser = parse_assignment)]
    pub items: Vec<(CategoryKey, String)>,

    /// カテゴリ別の指示（複数指定可）
    #[arg(long, value_name = "CATEGORY=TEXT", value_parser = parse_assignment)]
    pub instructions: Vec<(CategoryKey, String)>,

    /// 参考写真にする画像ファイル（複数指定可）
    #[arg(long = "photo", value_name = "CATEGORY=PATH", value_parser = parse_assignment)]
    pub photos: Vec<(CategoryKey, String)>,

    /// 代替品の希望
    #[arg(long)]
    pub substitutions: Option<String>,

    /// その他メモ
    #[arg(long)]
    pub notes: Option<String>,

    /// 送信完了表示の時間を待たずに終了
    #[arg(long)]
    pub no_wait: bool,
}

impl NewArgs {
    /// 入力順に並べた更新と撮影対象
    pub fn to_draft(&self) -> Draft {
        let mut updates = Vec::new();

        if let Some(store) = self.store {
            updates.push(FieldUpdate::Store(store));
        }
        if let Some(budget) = self.budget {
            updates.push(FieldUpdate::BudgetCap(Some(budget)));
        }
        if let Some(slot) = self.time {
            updates.push(FieldUpdate::DeliveryTime(slot));
        }
        for (category, text) in &self.items {
            updates.push(FieldUpdate::Items(*category, text.clone()));
        }
        for (category, text) in &self.instructions {
            updates.push(FieldUpdate::Instructions(*category, text.clone()));
        }
        if let Some(text) = &self.substitutions {
            updates.push(FieldUpdate::Substitutions(text.clone()));
        }
        if let Some(text) = &self.notes {
            updates.push(FieldUpdate::Notes(text.clone()));
        }

        let photos = self
            .photos
            .iter()
            .map(|(category, path)| (*category, PathBuf::from(path)))
            .collect();

        Draft { updates, photos }
    }
}

pub fn parse_store(s: &str) -> Result<Store> {
    s.parse().map_err(|_| GroceryError::UnknownStore(s.to_string()))
}

pub fn parse_delivery_time(s: &str) -> Result<DeliveryTime> {
    s.parse().map_err(|_| GroceryError::UnknownDeliveryTime(s.to_string()))
}

/// CLIでは空や不正値を黙って無視せずエラーにする
pub fn parse_budget(s: &str) -> Result<Budget> {
    Budget::parse(s).ok_or_else(|| GroceryError::InvalidBudget(s.to_string()))
}

/// "produce=Apples, bananas" → (Produce, "Apples, bananas")
pub fn parse_assignment(s: &str) -> Result<(CategoryKey, String)> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| GroceryError::InvalidAssignment(s.to_string()))?;
    let category = key
        .parse()
        .map_err(|_| GroceryError::UnknownCategory(key.trim().to_string()))?;
    Ok((category, value.to_string()))
}
