//! 対話式入力モジュール

use crate::error::Result;
use crate::form::{take_photo, CliForm};
use dialoguer::{Confirm, Input, Select};
use grocery_request_common::{Budget, CategoryKey, DeliveryTime, FieldUpdate, Store, CAMERA_NOTICE};
use std::path::PathBuf;

/// 全項目を順に入力する
pub async fn run_interactive_fill(form: &mut CliForm) -> Result<()> {
    println!("🛒 Grocery Request");
    println!("Fill out your shopping preferences and take photos for reference\n");

    let current = form.request().store_preference;
    let labels: Vec<&str> = Store::ALL.iter().map(Store::label).collect();
    let index = Select::new()
        .with_prompt("Store Preference")
        .items(&labels)
        .default(Store::ALL.iter().position(|s| *s == current).unwrap_or(0))
        .interact()?;
    form.update(FieldUpdate::Store(Store::ALL[index]));

    let budget: String = Input::new()
        .with_prompt("Budget Cap ($, 空欄で指定なし)")
        .allow_empty(true)
        .validate_with(|input: &String| -> std::result::Result<(), &str> {
            if input.trim().is_empty() || Budget::parse(input).is_some() {
                Ok(())
            } else {
                Err("0以上の数値を入力してください")
            }
        })
        .interact_text()?;
    form.update(FieldUpdate::BudgetCap(Budget::parse(&budget)));

    let current = form.request().delivery_time;
    let labels: Vec<&str> = DeliveryTime::ALL.iter().map(DeliveryTime::label).collect();
    let index = Select::new()
        .with_prompt("Preferred Delivery Time")
        .items(&labels)
        .default(DeliveryTime::ALL.iter().position(|s| *s == current).unwrap_or(0))
        .interact()?;
    form.update(FieldUpdate::DeliveryTime(DeliveryTime::ALL[index]));

    for category in CategoryKey::ALL {
        println!("\n{}", category.label());
        fill_category(form, category).await?;
    }

    let substitutions = prompt_text("Substitution Preferences")?;
    form.update(FieldUpdate::Substitutions(substitutions));

    let notes = prompt_text("Additional Notes")?;
    form.update(FieldUpdate::Notes(notes));

    Ok(())
}

async fn fill_category(form: &mut CliForm, category: CategoryKey) -> Result<()> {
    let items = prompt_text("  Items to Purchase")?;
    form.update(FieldUpdate::Items(category, items));

    let instructions = prompt_text("  Special Instructions")?;
    form.update(FieldUpdate::Instructions(category, instructions));

    if !Confirm::new()
        .with_prompt("  参考写真を付けますか？")
        .default(false)
        .interact()?
    {
        return Ok(());
    }

    loop {
        let path: String = Input::new().with_prompt("  画像ファイル").interact_text()?;
        match take_photo(form, category, &PathBuf::from(path.trim())).await {
            Ok(()) => {
                println!("  ✔ Photo captured");
                return Ok(());
            }
            Err(e) => {
                println!("  ⚠ {}", form.notice().unwrap_or(CAMERA_NOTICE));
                println!("    {}", e);
                form.dismiss_notice();
            }
        }

        if !Confirm::new()
            .with_prompt("  もう一度試しますか？")
            .default(true)
            .interact()?
        {
            return Ok(());
        }
    }
}

fn prompt_text(prompt: &str) -> Result<String> {
    let text = Input::<String>::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()?;
    Ok(text)
}
