//! Site header: logo, navigation and call-to-action button.

use serde::{Deserialize, Serialize};

use super::{DomainKind, FieldReader, FieldValue, SettingsDomain};
use crate::codec::CodecError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavLink {
    pub label: String,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderSettings {
    pub logo_text: String,
    pub logo_image: String,
    pub nav_links: Vec<NavLink>,
    pub cta_text: String,
    pub cta_link: String,
    pub show_cta: bool,
    pub sticky: bool,
}

fn link(label: &str, href: &str) -> NavLink {
    NavLink {
        label: label.to_string(),
        href: href.to_string(),
    }
}

impl Default for HeaderSettings {
    fn default() -> Self {
        Self {
            logo_text: "ASTRO FORGE".to_string(),
            logo_image: "/images/logo.svg".to_string(),
            nav_links: vec![
                link("Home", "/"),
                link("About", "/about"),
                link("Projects", "/projects"),
                link("Blog", "/blog"),
                link("Contact", "/contact"),
            ],
            cta_text: "Get in Touch".to_string(),
            cta_link: "/contact".to_string(),
            show_cta: true,
            sticky: true,
        }
    }
}

impl SettingsDomain for HeaderSettings {
    const KIND: DomainKind = DomainKind::Header;
    const FIELDS: &'static [&'static str] = &[
        "logo_text",
        "logo_image",
        "nav_links",
        "cta_text",
        "cta_link",
        "show_cta",
        "sticky",
    ];

    fn project_fields(reader: &mut FieldReader<'_>) -> Self {
        let defaults = Self::default();
        Self {
            logo_text: reader.text("logo_text", defaults.logo_text),
            logo_image: reader.text("logo_image", defaults.logo_image),
            nav_links: reader.value("nav_links", defaults.nav_links),
            cta_text: reader.text("cta_text", defaults.cta_text),
            cta_link: reader.text("cta_link", defaults.cta_link),
            show_cta: reader.value("show_cta", defaults.show_cta),
            sticky: reader.value("sticky", defaults.sticky),
        }
    }

    fn field_values(&self) -> Result<Vec<FieldValue>, CodecError> {
        Ok(vec![
            FieldValue::text("logo_text", &self.logo_text),
            FieldValue::text("logo_image", &self.logo_image),
            FieldValue::json("nav_links", &self.nav_links)?,
            FieldValue::text("cta_text", &self.cta_text),
            FieldValue::text("cta_link", &self.cta_link),
            FieldValue::flag("show_cta", self.show_cta),
            FieldValue::flag("sticky", self.sticky),
        ])
    }
}
