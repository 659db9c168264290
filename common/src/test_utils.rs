use chrono::{TimeZone, Utc};

use crate::domain::crafts::{Craft, CraftFields, CraftId, Engagement};
use crate::domain::{SlotName, Storage, StorageError};

/// Storage whose backend is always down.
///
/// Public so that other crates can reuse it for their own tests.
#[derive(Clone, Debug, Default)]
pub struct UnavailableStorage;

impl Storage for UnavailableStorage {
    async fn get(&self, _slot: &SlotName) -> Result<Option<String>, StorageError> {
        Err(StorageError::Backend("storage unavailable".to_string()))
    }

    async fn set(&self, _slot: &SlotName, _value: String) -> Result<(), StorageError> {
        Err(StorageError::Backend("storage unavailable".to_string()))
    }

    async fn delete(&self, _slot: &SlotName) -> Result<(), StorageError> {
        Err(StorageError::Backend("storage unavailable".to_string()))
    }
}

/// Helper for building upload form content.
pub fn make_fields(title: &str, region: &str, category: &str, artisan_name: &str) -> CraftFields {
    CraftFields {
        title: title.to_string(),
        region: region.to_string(),
        category: category.to_string(),
        artisan_name: artisan_name.to_string(),
        ..Default::default()
    }
}

/// Convenience for the upload most tests start from.
pub fn blue_pottery_bowl() -> CraftFields {
    make_fields("Blue Pottery Bowl", "Jaipur", "Pottery", "Raj")
}

/// Published crafts with non-zero engagement, the way the explore page sees them.
pub fn sample_catalog() -> Vec<Craft> {
    let entries = [
        (
            "Handwoven Silk Saree",
            "Traditional silk saree woven with golden threads",
            "Varanasi, Uttar Pradesh",
            "Textiles",
            "Kamala Devi",
            vec!["silk", "weaving", "traditional"],
            Engagement { views: 1247, likes: 89, shares: 23, comments: 15 },
            15,
        ),
        (
            "Madhubani Painting",
            "Colorful folk art depicting nature and mythology",
            "Madhubani, Bihar",
            "Painting",
            "Sunita Kumar",
            vec!["painting", "folk-art", "traditional"],
            Engagement { views: 892, likes: 67, shares: 18, comments: 12 },
            10,
        ),
        (
            "Blue Pottery Bowl",
            "Hand-painted ceramic bowl with Jaipur blue pottery designs",
            "Jaipur, Rajasthan",
            "Pottery",
            "Raj Kumar Sharma",
            vec!["pottery", "ceramic", "blue-pottery"],
            Engagement { views: 654, likes: 45, shares: 12, comments: 8 },
            5,
        ),
    ];

    entries
        .into_iter()
        .map(|(title, description, region, category, artisan, tags, engagement, day)| {
            let fields = CraftFields {
                description: description.to_string(),
                tags: tags.into_iter().map(String::from).collect(),
                ..make_fields(title, region, category, artisan)
            };
            let created_at = Utc
                .with_ymd_and_hms(2024, 1, day, 0, 0, 0)
                .single()
                .unwrap_or_else(Utc::now);
            Craft {
                engagement,
                ..Craft::new(CraftId::generate(), fields, created_at, false)
            }
        })
        .collect()
}
