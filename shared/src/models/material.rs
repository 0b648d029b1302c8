//! Material master data

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A purchasable/stockable item as delivered by the inventory API
///
/// Descriptive fields that are missing or `null` read as empty so that one
/// incomplete record never hides the rest of the month.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MaterialRecord {
    pub material_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub material_code: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub material_desc: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub unit: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub material_category: MaterialCategory,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Material categories used by the category filter
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum MaterialCategory {
    MeatMaterial,
    MeatAlternate,
    FoodIngredient,
    Packaging,
    Casing,
    TinCan,
    /// Also the landing spot for categories this client does not know
    #[default]
    #[serde(other)]
    Other,
}

impl MaterialCategory {
    pub const ALL: [MaterialCategory; 7] = [
        MaterialCategory::MeatMaterial,
        MaterialCategory::MeatAlternate,
        MaterialCategory::FoodIngredient,
        MaterialCategory::Packaging,
        MaterialCategory::Casing,
        MaterialCategory::TinCan,
        MaterialCategory::Other,
    ];

    /// Wire value, also used as the filter selector value
    pub fn as_str(&self) -> &'static str {
        match self {
            MaterialCategory::MeatMaterial => "meat_material",
            MaterialCategory::MeatAlternate => "meat_alternate",
            MaterialCategory::FoodIngredient => "food_ingredient",
            MaterialCategory::Packaging => "packaging",
            MaterialCategory::Casing => "casing",
            MaterialCategory::TinCan => "tin_can",
            MaterialCategory::Other => "other",
        }
    }

    /// Label shown in the category selector
    pub fn label(&self) -> &'static str {
        match self {
            MaterialCategory::MeatMaterial => "Meat Materials",
            MaterialCategory::MeatAlternate => "Meat Alternates",
            MaterialCategory::FoodIngredient => "Food Ingredients",
            MaterialCategory::Packaging => "Packaging Materials",
            MaterialCategory::Casing => "Casing",
            MaterialCategory::TinCan => "Tin Can",
            MaterialCategory::Other => "Other",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == value)
    }
}

impl fmt::Display for MaterialCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_wire_values() {
        for category in MaterialCategory::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.as_str()));
            assert_eq!(MaterialCategory::parse(category.as_str()), Some(category));
        }
    }

    #[test]
    fn test_unknown_category_is_other() {
        let category: MaterialCategory = serde_json::from_str("\"spices\"").unwrap();
        assert_eq!(category, MaterialCategory::Other);
        assert_eq!(MaterialCategory::parse("spices"), None);
    }

    #[test]
    fn test_missing_category_defaults_to_other() {
        let material: MaterialRecord = serde_json::from_str(
            r#"{"material_id":1,"material_code":"M-01","material_desc":"Beef","unit":"kg"}"#,
        )
        .unwrap();
        assert_eq!(material.material_category, MaterialCategory::Other);
    }

    #[test]
    fn test_null_fields_read_as_empty() {
        let material: MaterialRecord = serde_json::from_str(
            r#"{"material_id":7,"material_code":"C-07","material_desc":null,"unit":null,"material_category":null}"#,
        )
        .unwrap();
        assert_eq!(material.material_code, "C-07");
        assert_eq!(material.material_desc, "");
        assert_eq!(material.unit, "");
        assert_eq!(material.material_category, MaterialCategory::Other);
    }

    #[test]
    fn test_missing_fields_read_as_empty() {
        let material: MaterialRecord =
            serde_json::from_str(r#"{"material_id":7,"material_category":"casing"}"#).unwrap();
        assert_eq!(material.material_code, "");
        assert_eq!(material.material_desc, "");
        assert_eq!(material.unit, "");
        assert_eq!(material.material_category, MaterialCategory::Casing);
    }
}
