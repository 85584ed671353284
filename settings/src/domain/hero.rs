//! Hero banner on the landing page.

use serde::{Deserialize, Serialize};

use super::{DomainKind, FieldReader, FieldValue, SettingsDomain};
use crate::codec::CodecError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroSettings {
    pub title: String,
    pub subtitle: String,
    pub cta_text: String,
    pub cta_link: String,
    /// Slideshow images, shown in this order.
    pub background_images: Vec<String>,
    pub badge_text: String,
    pub stats_projects: String,
    pub stats_countries: String,
    pub stats_years: String,
}

impl Default for HeroSettings {
    fn default() -> Self {
        Self {
            title: "ASTRO FORGE HOLDINGS".to_string(),
            subtitle: "Engineering and construction across five continents".to_string(),
            cta_text: "Explore Our Projects".to_string(),
            cta_link: "/projects".to_string(),
            background_images: vec![
                "/images/hero/hero-1.jpg".to_string(),
                "/images/hero/hero-2.jpg".to_string(),
                "/images/hero/hero-3.jpg".to_string(),
            ],
            badge_text: "Trusted since 1998".to_string(),
            stats_projects: "500+".to_string(),
            stats_countries: "25+".to_string(),
            stats_years: "25+".to_string(),
        }
    }
}

impl SettingsDomain for HeroSettings {
    const KIND: DomainKind = DomainKind::Hero;
    const FIELDS: &'static [&'static str] = &[
        "title",
        "subtitle",
        "cta_text",
        "cta_link",
        "background_images",
        "badge_text",
        "stats_projects",
        "stats_countries",
        "stats_years",
    ];

    fn project_fields(reader: &mut FieldReader<'_>) -> Self {
        let defaults = Self::default();
        Self {
            title: reader.text("title", defaults.title),
            subtitle: reader.text("subtitle", defaults.subtitle),
            cta_text: reader.text("cta_text", defaults.cta_text),
            cta_link: reader.text("cta_link", defaults.cta_link),
            background_images: reader.value("background_images", defaults.background_images),
            badge_text: reader.text("badge_text", defaults.badge_text),
            stats_projects: reader.text("stats_projects", defaults.stats_projects),
            stats_countries: reader.text("stats_countries", defaults.stats_countries),
            stats_years: reader.text("stats_years", defaults.stats_years),
        }
    }

    fn field_values(&self) -> Result<Vec<FieldValue>, CodecError> {
        Ok(vec![
            FieldValue::text("title", &self.title),
            FieldValue::text("subtitle", &self.subtitle),
            FieldValue::text("cta_text", &self.cta_text),
            FieldValue::text("cta_link", &self.cta_link),
            FieldValue::json("background_images", &self.background_images)?,
            FieldValue::text("badge_text", &self.badge_text),
            FieldValue::text("stats_projects", &self.stats_projects),
            FieldValue::text("stats_countries", &self.stats_countries),
            FieldValue::text("stats_years", &self.stats_years),
        ])
    }
}
