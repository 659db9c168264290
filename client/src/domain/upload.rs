use artconnect_common::crafts::CraftFields;

use crate::domain::auth::FormError;

/// Picture used when the artisan uploads no image
pub const DEFAULT_IMAGE_URL: &str =
    "https://images.pexels.com/photos/8969287/pexels-photo-8969287.jpeg?auto=compress&cs=tinysrgb&w=800";

/// Artisan prefilled in a fresh upload form
pub const DEFAULT_ARTISAN_NAME: &str = "Kamala Devi";

/// Upload form as typed by the artisan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadForm {
    pub title: String,
    pub description: String,
    pub region: String,
    pub category: String,
    pub artisan_name: String,
    /// data URL of the picked picture, `None` until one is chosen
    pub image: Option<String>,
    pub tags: Vec<String>,
}

impl Default for UploadForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            region: String::new(),
            category: String::new(),
            artisan_name: DEFAULT_ARTISAN_NAME.to_string(),
            image: None,
            tags: Vec::new(),
        }
    }
}

impl UploadForm {
    /// Title, description, region and category are required.
    /// A missing or empty image falls back to [`DEFAULT_IMAGE_URL`].
    pub fn validate(self) -> Result<CraftFields, FormError> {
        let required = [&self.title, &self.description, &self.region, &self.category];
        if required.iter().any(|value| value.is_empty()) {
            return Err(FormError::MissingRequiredFields);
        }

        let image_url = self
            .image
            .filter(|image| !image.is_empty())
            .unwrap_or_else(|| DEFAULT_IMAGE_URL.to_string());

        Ok(CraftFields {
            title: self.title,
            description: self.description,
            image_url,
            region: self.region,
            category: self.category,
            artisan_name: self.artisan_name,
            story: None,
            audio_url: None,
            tags: self.tags,
        })
    }
}
