use anyhow::{Context, Result};
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};

use super::{new_id, now_timestamp};
use crate::entities::{assets, prelude::*};
use crate::models::asset::{AssetPatch, NewAsset, expires_within};

pub struct AssetRepository {
    conn: DatabaseConnection,
}

impl AssetRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&self, owner_id: &str) -> Result<Vec<assets::Model>> {
        Assets::find()
            .filter(assets::Column::UserId.eq(owner_id))
            .order_by_desc(assets::Column::CreatedAt)
            .all(&self.conn)
            .await
            .context("Failed to list assets")
    }

    pub async fn list_expiring(
        &self,
        owner_id: &str,
        today: NaiveDate,
        within_days: u32,
    ) -> Result<Vec<assets::Model>> {
        let rows = Assets::find()
            .filter(assets::Column::UserId.eq(owner_id))
            .filter(
                assets::Column::WarrantyEndDate
                    .is_not_null()
                    .or(assets::Column::InsuranceExpiryDate.is_not_null()),
            )
            .order_by_desc(assets::Column::CreatedAt)
            .all(&self.conn)
            .await
            .context("Failed to list expiring assets")?;

        Ok(rows
            .into_iter()
            .filter(|asset| expires_within(asset, today, within_days))
            .collect())
    }

    pub async fn get(&self, id: &str) -> Result<Option<assets::Model>> {
        Assets::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query asset")
    }

    pub async fn create(&self, input: NewAsset) -> Result<assets::Model> {
        let now = now_timestamp();
        let active = assets::ActiveModel {
            id: Set(new_id()),
            user_id: Set(input.user_id),
            name: Set(input.name),
            category: Set(input.category),
            description: Set(input.description),
            location: Set(input.location),
            serial_number: Set(input.serial_number),
            purchase_date: Set(input.purchase_date),
            purchase_price: Set(input.purchase_price),
            current_value: Set(input.current_value),
            warranty_end_date: Set(input.warranty_end_date),
            insurance_expiry_date: Set(input.insurance_expiry_date),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        };

        active
            .insert(&self.conn)
            .await
            .context("Failed to insert asset")
    }

    pub async fn update(&self, id: &str, patch: AssetPatch) -> Result<Option<assets::Model>> {
        let Some(existing) = self.get(id).await? else {
            return Ok(None);
        };

        let mut active = existing.into_active_model();
        if let Some(name) = patch.name {
            active.name = Set(name);
        }
        if let Some(category) = patch.category {
            active.category = Set(category);
        }
        if let Some(description) = patch.description {
            active.description = Set(description);
        }
        if let Some(location) = patch.location {
            active.location = Set(location);
        }
        if let Some(serial_number) = patch.serial_number {
            active.serial_number = Set(serial_number);
        }
        if let Some(purchase_date) = patch.purchase_date {
            active.purchase_date = Set(purchase_date);
        }
        if let Some(purchase_price) = patch.purchase_price {
            active.purchase_price = Set(purchase_price);
        }
        if let Some(current_value) = patch.current_value {
            active.current_value = Set(current_value);
        }
        if let Some(warranty_end_date) = patch.warranty_end_date {
            active.warranty_end_date = Set(warranty_end_date);
        }
        if let Some(insurance_expiry_date) = patch.insurance_expiry_date {
            active.insurance_expiry_date = Set(insurance_expiry_date);
        }
        active.updated_at = Set(now_timestamp());

        let updated = active
            .update(&self.conn)
            .await
            .context("Failed to update asset")?;
        Ok(Some(updated))
    }

    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = Assets::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete asset")?;
        Ok(result.rows_affected > 0)
    }
}
