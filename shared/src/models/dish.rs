//! Dish Model (menu catalog)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

/// Menu section a dish belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DishType {
    Starter,
    #[serde(rename = "Main Course", alias = "MainCourse")]
    MainCourse,
    Dessert,
    Drinks,
}

/// Dish entity (stored in `dish_master`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dish {
    pub id: String,
    pub name: String,
    pub available: bool,
    #[serde(rename = "type")]
    pub dish_type: DishType,
    pub rate: f64,
    pub takeaway_rate: f64,
    #[serde(default)]
    pub image: Option<String>,
    pub date_added: DateTime<Utc>,
    pub added_by: String,
}

/// Create dish payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DishCreate {
    /// Generated when absent
    #[serde(default)]
    pub id: Option<String>,
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    #[serde(default = "default_available")]
    pub available: bool,
    #[serde(rename = "type")]
    pub dish_type: DishType,
    #[validate(range(min = 0.0))]
    pub rate: f64,
    #[validate(range(min = 0.0))]
    pub takeaway_rate: f64,
    #[serde(default)]
    pub image: Option<String>,
}

fn default_available() -> bool {
    true
}

/// Partial dish update; absent fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct DishUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 128))]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available: Option<bool>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub dish_type: Option<DishType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0))]
    pub rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0))]
    pub takeaway_rate: Option<f64>,
    /// Absent: unchanged, `null`: cleared
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub image: Option<Option<String>>,
}

/// Marks a field as present even when its value is `null`
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl DishUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.available.is_none()
            && self.dish_type.is_none()
            && self.rate.is_none()
            && self.takeaway_rate.is_none()
            && self.image.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dish_type_wire_names() {
        assert_eq!(
            serde_json::to_string(&DishType::MainCourse).unwrap(),
            "\"Main Course\""
        );
        let parsed: DishType = serde_json::from_str("\"MainCourse\"").unwrap();
        assert_eq!(parsed, DishType::MainCourse);
    }

    #[test]
    fn test_dish_update_serializes_only_present_fields() {
        let update = DishUpdate {
            rate: Some(12.5),
            ..Default::default()
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json, serde_json::json!({ "rate": 12.5 }));
        assert!(!update.is_empty());
        assert!(DishUpdate::default().is_empty());
    }

    #[test]
    fn test_dish_update_image_null_clears() {
        let absent: DishUpdate = serde_json::from_str(r#"{ "rate": 3.0 }"#).unwrap();
        assert_eq!(absent.image, None);

        let cleared: DishUpdate = serde_json::from_str(r#"{ "image": null }"#).unwrap();
        assert_eq!(cleared.image, Some(None));
        assert_eq!(
            serde_json::to_value(&cleared).unwrap(),
            serde_json::json!({ "image": null })
        );

        let set: DishUpdate = serde_json::from_str(r#"{ "image": "soup.png" }"#).unwrap();
        assert_eq!(set.image, Some(Some("soup.png".to_string())));
    }

    #[test]
    fn test_dish_create_rejects_negative_rate() {
        let create = DishCreate {
            id: None,
            name: "Pasta".to_string(),
            available: true,
            dish_type: DishType::MainCourse,
            rate: -1.0,
            takeaway_rate: 10.0,
            image: None,
        };
        assert!(create.validate().is_err());
    }
}
