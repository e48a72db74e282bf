//! フィールド更新（リデューサ）
//!
//! 入力イベント1つにつき `FieldUpdate` 1つ。`Request::apply` は元の値を変更せず、
//! 該当する葉だけを差し替えた新しい `Request` を返す。検証は行わない。

use crate::types::{Budget, CategoryKey, DeliveryTime, Photo, Request, Store};

/// Requestの葉1つへの更新
#[derive(Debug, Clone, PartialEq)]
pub enum FieldUpdate {
    Store(Store),
    BudgetCap(Option<Budget>),
    DeliveryTime(DeliveryTime),
    Items(CategoryKey, String),
    Instructions(CategoryKey, String),
    Substitutions(String),
    Notes(String),
}

impl Request {
    /// 更新を適用した新しいRequestを返す
    pub fn apply(&self, update: FieldUpdate) -> Request {
        match update {
            FieldUpdate::Store(store) => Request {
                store_preference: store,
                ..self.clone()
            },
            FieldUpdate::BudgetCap(budget) => Request {
                budget_cap: budget,
                ..self.clone()
            },
            FieldUpdate::DeliveryTime(slot) => Request {
                delivery_time: slot,
                ..self.clone()
            },
            FieldUpdate::Items(key, items) => {
                let mut entry = self.categories.get(key).clone();
                entry.items = items;
                Request {
                    categories: self.categories.with_entry(key, entry),
                    ..self.clone()
                }
            }
            FieldUpdate::Instructions(key, instructions) => {
                let mut entry = self.categories.get(key).clone();
                entry.instructions = instructions;
                Request {
                    categories: self.categories.with_entry(key, entry),
                    ..self.clone()
                }
            }
            FieldUpdate::Substitutions(text) => Request {
                substitutions: text,
                ..self.clone()
            },
            FieldUpdate::Notes(text) => Request {
                notes: text,
                ..self.clone()
            },
        }
    }

    /// 写真を差し替えた新しいRequestを返す（Noneで削除）
    pub fn with_photo(&self, key: CategoryKey, photo: Option<Photo>) -> Request {
        let mut entry = self.categories.get(key).clone();
        entry.photo = photo;
        Request {
            categories: self.categories.with_entry(key, entry),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CategoryEntry;

    fn sample_updates() -> Vec<FieldUpdate> {
        vec![
            FieldUpdate::Store(Store::Target),
            FieldUpdate::BudgetCap(Budget::new(80.0)),
            FieldUpdate::BudgetCap(None),
            FieldUpdate::DeliveryTime(DeliveryTime::Evening),
            FieldUpdate::Items(CategoryKey::Pantry, "Rice, lentils".to_string()),
            FieldUpdate::Instructions(CategoryKey::Frozen, "Pack with ice".to_string()),
            FieldUpdate::Substitutions("Skip if out".to_string()),
            FieldUpdate::Notes("Leave at door".to_string()),
        ]
    }

    #[test]
    fn test_every_update_keeps_all_categories() {
        let mut request = Request::new();
        for update in sample_updates() {
            request = request.apply(update);
            assert_eq!(request.categories.iter().count(), CategoryKey::ALL.len());
        }
    }

    #[test]
    fn test_apply_does_not_mutate_original() {
        let original = Request::new();
        let updated = original.apply(FieldUpdate::Notes("Call on arrival".to_string()));

        assert_eq!(original.notes, "");
        assert_eq!(updated.notes, "Call on arrival");
    }

    #[test]
    fn test_items_update_isolated_to_one_category() {
        let before = Request::new()
            .apply(FieldUpdate::Items(CategoryKey::Meat, "Salmon".to_string()))
            .with_photo(CategoryKey::Household, Some(Photo::from_base64("image/jpeg", "AAAA")));

        let after = before.apply(FieldUpdate::Items(CategoryKey::Produce, "Bananas".to_string()));

        assert_eq!(after.categories[CategoryKey::Produce].items, "Bananas");
        assert_eq!(before.categories[CategoryKey::Produce].items, "");
        for key in CategoryKey::ALL.into_iter().filter(|k| *k != CategoryKey::Produce) {
            assert_eq!(after.categories[key], before.categories[key], "{} changed", key);
        }
    }

    #[test]
    fn test_instructions_update_keeps_items_and_photo() {
        let photo = Photo::from_base64("image/jpeg", "AAAA");
        let before = Request::new()
            .apply(FieldUpdate::Items(CategoryKey::Produce, "Apples".to_string()))
            .with_photo(CategoryKey::Produce, Some(photo.clone()));

        let after = before.apply(FieldUpdate::Instructions(
            CategoryKey::Produce,
            "Ripe".to_string(),
        ));

        let entry = &after.categories[CategoryKey::Produce];
        assert_eq!(entry.items, "Apples");
        assert_eq!(entry.instructions, "Ripe");
        assert_eq!(entry.photo.as_ref(), Some(&photo));
    }

    #[test]
    fn test_clone_shares_photo_buffer() {
        let before = Request::new()
            .with_photo(CategoryKey::Frozen, Some(Photo::from_base64("image/jpeg", "AAAA")));
        let after = before.apply(FieldUpdate::Notes("x".to_string()));

        let (Some(a), Some(b)) = (
            before.categories[CategoryKey::Frozen].photo.as_ref(),
            after.categories[CategoryKey::Frozen].photo.as_ref(),
        ) else {
            panic!("photo missing");
        };
        assert!(a.shares_buffer(b));
    }

    #[test]
    fn test_scalar_updates() {
        let request = Request::new()
            .apply(FieldUpdate::Store(Store::Walmart))
            .apply(FieldUpdate::BudgetCap(Budget::new(150.0)))
            .apply(FieldUpdate::DeliveryTime(DeliveryTime::Morning));

        assert_eq!(request.store_preference, Store::Walmart);
        assert_eq!(request.budget_cap.map(Budget::amount), Some(150.0));
        assert_eq!(request.delivery_time, DeliveryTime::Morning);
        assert_eq!(request.categories[CategoryKey::Meat], CategoryEntry::default());
    }
}
