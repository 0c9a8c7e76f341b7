use anyhow::{Context, Result};
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};

use super::{new_id, now_timestamp};
use crate::entities::{contacts, prelude::*, types::Tags};
use crate::models::contact::{ContactPatch, NewContact, is_due, next_contact_due};
use crate::schema::parse_date;

pub struct ContactRepository {
    conn: DatabaseConnection,
}

impl ContactRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&self, owner_id: &str) -> Result<Vec<contacts::Model>> {
        Contacts::find()
            .filter(contacts::Column::UserId.eq(owner_id))
            .order_by_desc(contacts::Column::CreatedAt)
            .all(&self.conn)
            .await
            .context("Failed to list contacts")
    }

    /// Contacts of `owner_id` whose next contact date is `today` or earlier,
    /// most overdue first.
    pub async fn list_due(&self, owner_id: &str, today: NaiveDate) -> Result<Vec<contacts::Model>> {
        let rows = Contacts::find()
            .filter(contacts::Column::UserId.eq(owner_id))
            .filter(contacts::Column::NextContactDue.is_not_null())
            .order_by_asc(contacts::Column::NextContactDue)
            .all(&self.conn)
            .await
            .context("Failed to list due contacts")?;

        Ok(rows.into_iter().filter(|c| is_due(c, today)).collect())
    }

    pub async fn get(&self, id: &str) -> Result<Option<contacts::Model>> {
        Contacts::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query contact")
    }

    pub async fn create(&self, input: NewContact) -> Result<contacts::Model> {
        let now = now_timestamp();
        let next_due = input.resolved_next_contact_due();

        let active = contacts::ActiveModel {
            id: Set(new_id()),
            user_id: Set(input.user_id),
            first_name: Set(input.first_name),
            last_name: Set(input.last_name),
            email: Set(input.email),
            phone: Set(input.phone),
            relationship_type: Set(input.relationship_type),
            relationship_level: Set(input.relationship_level),
            contact_frequency_days: Set(input.contact_frequency_days),
            last_contacted_at: Set(input.last_contacted_at),
            next_contact_due: Set(next_due),
            notes: Set(input.notes),
            tags: Set(Tags(input.tags)),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        };

        active
            .insert(&self.conn)
            .await
            .context("Failed to insert contact")
    }

    pub async fn update(&self, id: &str, patch: ContactPatch) -> Result<Option<contacts::Model>> {
        let Some(existing) = self.get(id).await? else {
            return Ok(None);
        };

        // Changing the last contact or the frequency moves the due date unless
        // the patch sets one itself.
        let reschedule = patch.next_contact_due.is_none()
            && (patch.last_contacted_at.is_some() || patch.contact_frequency_days.is_some());
        let last_contacted_at = patch
            .last_contacted_at
            .clone()
            .unwrap_or_else(|| existing.last_contacted_at.clone());
        let frequency = patch
            .contact_frequency_days
            .unwrap_or(existing.contact_frequency_days);

        let mut active = existing.into_active_model();
        if let Some(first_name) = patch.first_name {
            active.first_name = Set(first_name);
        }
        if let Some(last_name) = patch.last_name {
            active.last_name = Set(last_name);
        }
        if let Some(email) = patch.email {
            active.email = Set(email);
        }
        if let Some(phone) = patch.phone {
            active.phone = Set(phone);
        }
        if let Some(relationship_type) = patch.relationship_type {
            active.relationship_type = Set(relationship_type);
        }
        if let Some(relationship_level) = patch.relationship_level {
            active.relationship_level = Set(relationship_level);
        }
        if let Some(frequency) = patch.contact_frequency_days {
            active.contact_frequency_days = Set(frequency);
        }
        if let Some(last_contacted_at) = patch.last_contacted_at {
            active.last_contacted_at = Set(last_contacted_at);
        }
        if let Some(next_contact_due) = patch.next_contact_due {
            active.next_contact_due = Set(next_contact_due);
        } else if reschedule {
            let next_due = last_contacted_at
                .as_deref()
                .and_then(parse_date)
                .zip(frequency)
                .and_then(|(last, days)| next_contact_due(last, days));
            active.next_contact_due = Set(next_due);
        }
        if let Some(notes) = patch.notes {
            active.notes = Set(notes);
        }
        if let Some(tags) = patch.tags {
            active.tags = Set(Tags(tags));
        }
        active.updated_at = Set(now_timestamp());

        let updated = active
            .update(&self.conn)
            .await
            .context("Failed to update contact")?;
        Ok(Some(updated))
    }

    /// Records a contact made on `today` and schedules the next one from the
    /// contact's frequency. Without a frequency the next date is cleared.
    pub async fn mark_contacted(
        &self,
        id: &str,
        today: NaiveDate,
    ) -> Result<Option<contacts::Model>> {
        let Some(existing) = self.get(id).await? else {
            return Ok(None);
        };

        let next_due = existing
            .contact_frequency_days
            .and_then(|days| next_contact_due(today, days));

        let mut active = existing.into_active_model();
        active.last_contacted_at = Set(Some(today.format("%Y-%m-%d").to_string()));
        active.next_contact_due = Set(next_due);
        active.updated_at = Set(now_timestamp());

        let updated = active
            .update(&self.conn)
            .await
            .context("Failed to mark contact as contacted")?;
        Ok(Some(updated))
    }

    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = Contacts::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete contact")?;
        Ok(result.rows_affected > 0)
    }
}
