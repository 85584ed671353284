//! Theme palette. Colours are CSS hex strings and are not validated here.

use serde::{Deserialize, Serialize};

use super::{DomainKind, FieldReader, FieldValue, SettingsDomain};
use crate::codec::CodecError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeSettings {
    pub astro_blue: String,
    pub astro_gold: String,
    pub astro_dark: String,
    pub astro_light: String,
    pub astro_accent: String,
    pub dark_mode: bool,
}

impl Default for ThemeSettings {
    fn default() -> Self {
        Self {
            astro_blue: "#1e3a8a".to_string(),
            astro_gold: "#d4a017".to_string(),
            astro_dark: "#0f172a".to_string(),
            astro_light: "#f8fafc".to_string(),
            astro_accent: "#38bdf8".to_string(),
            dark_mode: false,
        }
    }
}

impl SettingsDomain for ThemeSettings {
    const KIND: DomainKind = DomainKind::Theme;
    const FIELDS: &'static [&'static str] = &[
        "astro_blue",
        "astro_gold",
        "astro_dark",
        "astro_light",
        "astro_accent",
        "dark_mode",
    ];

    fn project_fields(reader: &mut FieldReader<'_>) -> Self {
        let defaults = Self::default();
        Self {
            astro_blue: reader.text("astro_blue", defaults.astro_blue),
            astro_gold: reader.text("astro_gold", defaults.astro_gold),
            astro_dark: reader.text("astro_dark", defaults.astro_dark),
            astro_light: reader.text("astro_light", defaults.astro_light),
            astro_accent: reader.text("astro_accent", defaults.astro_accent),
            dark_mode: reader.value("dark_mode", defaults.dark_mode),
        }
    }

    fn field_values(&self) -> Result<Vec<FieldValue>, CodecError> {
        Ok(vec![
            FieldValue::text("astro_blue", &self.astro_blue),
            FieldValue::text("astro_gold", &self.astro_gold),
            FieldValue::text("astro_dark", &self.astro_dark),
            FieldValue::text("astro_light", &self.astro_light),
            FieldValue::text("astro_accent", &self.astro_accent),
            FieldValue::flag("dark_mode", self.dark_mode),
        ])
    }
}
