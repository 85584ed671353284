//! About page: copy, headline numbers and company timeline.

use serde::{Deserialize, Serialize};

use super::{DomainKind, FieldReader, FieldValue, SettingsDomain};
use crate::codec::CodecError;

/// A headline number such as "25+ / Years of experience".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatTile {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub year: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AboutSettings {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub mission: String,
    pub vision: String,
    pub image: String,
    pub stats: Vec<StatTile>,
    /// Rendered top to bottom in stored order.
    pub timeline: Vec<TimelineEntry>,
}

fn stat(value: &str, label: &str) -> StatTile {
    StatTile {
        value: value.to_string(),
        label: label.to_string(),
    }
}

fn milestone(year: &str, title: &str, description: &str) -> TimelineEntry {
    TimelineEntry {
        year: year.to_string(),
        title: title.to_string(),
        description: description.to_string(),
    }
}

impl Default for AboutSettings {
    fn default() -> Self {
        Self {
            title: "About Astro Forge".to_string(),
            subtitle: "Building what lasts".to_string(),
            description: "Astro Forge Holdings designs, finances and delivers infrastructure \
                          for public and private clients."
                .to_string(),
            mission: "Deliver durable infrastructure on time and on budget.".to_string(),
            vision: "Be the partner of choice for complex projects worldwide.".to_string(),
            image: "/images/about/headquarters.jpg".to_string(),
            stats: vec![
                stat("25+", "Years of experience"),
                stat("500+", "Projects delivered"),
                stat("25+", "Countries"),
            ],
            timeline: vec![
                milestone("1998", "Founded", "First office opens."),
                milestone("2008", "International expansion", "Projects outside the home market."),
                milestone("2020", "500th project", "Portfolio passes 500 completed projects."),
            ],
        }
    }
}

impl SettingsDomain for AboutSettings {
    const KIND: DomainKind = DomainKind::About;
    const FIELDS: &'static [&'static str] = &[
        "title",
        "subtitle",
        "description",
        "mission",
        "vision",
        "image",
        "stats",
        "timeline",
    ];

    fn project_fields(reader: &mut FieldReader<'_>) -> Self {
        let defaults = Self::default();
        Self {
            title: reader.text("title", defaults.title),
            subtitle: reader.text("subtitle", defaults.subtitle),
            description: reader.text("description", defaults.description),
            mission: reader.text("mission", defaults.mission),
            vision: reader.text("vision", defaults.vision),
            image: reader.text("image", defaults.image),
            stats: reader.value("stats", defaults.stats),
            timeline: reader.value("timeline", defaults.timeline),
        }
    }

    fn field_values(&self) -> Result<Vec<FieldValue>, CodecError> {
        Ok(vec![
            FieldValue::text("title", &self.title),
            FieldValue::text("subtitle", &self.subtitle),
            FieldValue::text("description", &self.description),
            FieldValue::text("mission", &self.mission),
            FieldValue::text("vision", &self.vision),
            FieldValue::text("image", &self.image),
            FieldValue::json("stats", &self.stats)?,
            FieldValue::json("timeline", &self.timeline)?,
        ])
    }
}
