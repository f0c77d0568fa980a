//! Homepage slides and per-page banners managed from the back office.

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroSlide {
    pub id: i64,
    pub image_url: String,
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub button_text: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewSlide {
    #[validate(length(min = 1))]
    pub image_url: String,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub button_text: String,
}

impl NewSlide {
    pub fn into_slide(self, id: i64) -> HeroSlide {
        HeroSlide { id, image_url: self.image_url, title: self.title, subtitle: self.subtitle, button_text: self.button_text }
    }
}

/// Banner shown on top of a page; one per `page_id`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PageBanner {
    #[validate(length(min = 1, max = 50))]
    pub page_id: String,
    #[validate(length(min = 1))]
    pub image_url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
}
