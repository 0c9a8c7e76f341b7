use chrono::{Days, NaiveDate};
use serde::Deserialize;

use crate::entities::assets;
use crate::schema::{FieldKind, FieldSpec, OWNER_FIELD, Schema, nullable, parse_date};

pub const ASSET_FIELDS: &[FieldSpec] = &[
    FieldSpec::required(OWNER_FIELD, FieldKind::ID),
    FieldSpec::required("name", FieldKind::text(200)),
    FieldSpec::optional("category", FieldKind::text(100)),
    FieldSpec::optional("description", FieldKind::TEXT),
    FieldSpec::optional("location", FieldKind::text(200)),
    FieldSpec::optional("serialNumber", FieldKind::text(100)),
    FieldSpec::optional("purchaseDate", FieldKind::Date),
    FieldSpec::optional("purchasePrice", FieldKind::Number { min: 0.0 }),
    FieldSpec::optional("currentValue", FieldKind::Number { min: 0.0 }),
    FieldSpec::optional("warrantyEndDate", FieldKind::Date),
    FieldSpec::optional("insuranceExpiryDate", FieldKind::Date),
];

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAsset {
    pub user_id: String,
    pub name: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub serial_number: Option<String>,
    pub purchase_date: Option<String>,
    pub purchase_price: Option<f64>,
    pub current_value: Option<f64>,
    pub warranty_end_date: Option<String>,
    pub insurance_expiry_date: Option<String>,
}

impl Schema for NewAsset {
    const FIELDS: &'static [FieldSpec] = ASSET_FIELDS;
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetPatch {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub category: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub location: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub serial_number: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub purchase_date: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub purchase_price: Option<Option<f64>>,
    #[serde(default, deserialize_with = "nullable")]
    pub current_value: Option<Option<f64>>,
    #[serde(default, deserialize_with = "nullable")]
    pub warranty_end_date: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub insurance_expiry_date: Option<Option<String>>,
}

impl Schema for AssetPatch {
    const FIELDS: &'static [FieldSpec] = ASSET_FIELDS;
}

/// True when the warranty or the insurance of `asset` ends between `today`
/// and `today + within_days`, both inclusive.
#[must_use]
pub fn expires_within(asset: &assets::Model, today: NaiveDate, within_days: u32) -> bool {
    let Some(horizon) = today.checked_add_days(Days::new(u64::from(within_days))) else {
        return false;
    };

    [&asset.warranty_end_date, &asset.insurance_expiry_date]
        .into_iter()
        .filter_map(|date| date.as_deref().and_then(parse_date))
        .any(|end| end >= today && end <= horizon)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(warranty: Option<&str>, insurance: Option<&str>) -> assets::Model {
        assets::Model {
            id: "a1".to_string(),
            user_id: "u1".to_string(),
            name: "Laptop".to_string(),
            category: None,
            description: None,
            location: None,
            serial_number: None,
            purchase_date: None,
            purchase_price: Some(1299.0),
            current_value: None,
            warranty_end_date: warranty.map(str::to_string),
            insurance_expiry_date: insurance.map(str::to_string),
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn test_expires_within_window() {
        let today = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();

        assert!(expires_within(&asset(Some("2026-06-01"), None), today, 30));
        assert!(expires_within(&asset(Some("2026-07-01"), None), today, 30));
        assert!(!expires_within(&asset(Some("2026-07-02"), None), today, 30));
        assert!(!expires_within(&asset(Some("2026-05-31"), None), today, 30));
        assert!(expires_within(&asset(Some("2025-01-01"), Some("2026-06-15")), today, 30));
        assert!(!expires_within(&asset(None, None), today, 30));
    }
}
