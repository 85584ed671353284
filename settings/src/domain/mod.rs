//! Projection of the flat settings table into per-panel records.
//!
//! ## Domains
//!
//! Each panel owns a key prefix and a fixed list of fields:
//!
//! | Domain | Prefix | Record |
//! |--------|--------|--------|
//! | hero | `hero_` | [`HeroSettings`] |
//! | about | `about_` | [`AboutSettings`] |
//! | header | `header_` | [`HeaderSettings`] |
//! | theme | `theme_` | [`ThemeSettings`] |
//!
//! The prefix is a naming convention only; the table itself is one flat
//! namespace and nothing stops two panels from claiming the same key.
//!
//! ## Loading
//!
//! [`project`] filters the rows by prefix and hands a [`FieldReader`] to the
//! domain. A field with no row takes its default silently. A field whose row
//! decodes to the wrong shape takes its default with a warning and is listed
//! in [`ProjectionReport::corrupt`]; the remaining fields load normally.
//!
//! ## Saving
//!
//! [`SettingsDomain::field_values`] decomposes a record back into one
//! [`FieldValue`] per field, in declaration order.

mod about;
mod header;
mod hero;
mod theme;

pub use about::{AboutSettings, StatTile, TimelineEntry};
pub use header::{HeaderSettings, NavLink};
pub use hero::HeroSettings;
pub use theme::ThemeSettings;

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::codec::{CodecError, DeclaredType};
use crate::record::{SettingRecord, SettingWrite};

/// The settings panels known to the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DomainKind {
    Hero,
    About,
    Header,
    Theme,
}

impl DomainKind {
    pub const ALL: [DomainKind; 4] = [Self::Hero, Self::About, Self::Header, Self::Theme];

    pub fn name(self) -> &'static str {
        match self {
            Self::Hero => "hero",
            Self::About => "about",
            Self::Header => "header",
            Self::Theme => "theme",
        }
    }

    pub fn prefix(self) -> &'static str {
        match self {
            Self::Hero => "hero_",
            Self::About => "about_",
            Self::Header => "header_",
            Self::Theme => "theme_",
        }
    }

    /// Field names of this domain in declaration order.
    pub fn fields(self) -> &'static [&'static str] {
        match self {
            Self::Hero => HeroSettings::FIELDS,
            Self::About => AboutSettings::FIELDS,
            Self::Header => HeaderSettings::FIELDS,
            Self::Theme => ThemeSettings::FIELDS,
        }
    }

    pub fn key_for(self, field: &str) -> String {
        format!("{}{}", self.prefix(), field)
    }
}

impl fmt::Display for DomainKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown settings domain '{0}' (expected one of: hero, about, header, theme)")]
pub struct UnknownDomain(pub String);

impl FromStr for DomainKind {
    type Err = UnknownDomain;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownDomain(s.to_string()))
    }
}

/// The domain whose prefix claims `key`, if any.
pub fn owner_of(key: &str) -> Option<DomainKind> {
    DomainKind::ALL
        .into_iter()
        .find(|kind| key.starts_with(kind.prefix()))
}

/// A strongly-shaped record assembled from the rows sharing one prefix.
pub trait SettingsDomain:
    Default + Serialize + DeserializeOwned + Send + Sync + 'static
{
    const KIND: DomainKind;

    /// Field names in declaration order. Keys are `prefix + field`.
    const FIELDS: &'static [&'static str];

    /// Build the record, reading every field through `reader`.
    fn project_fields(reader: &mut FieldReader<'_>) -> Self;

    /// Decompose the record into one value per field, in [`Self::FIELDS`] order.
    fn field_values(&self) -> Result<Vec<FieldValue>, CodecError>;
}

/// A single field of a domain record, ready to be encoded.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldValue {
    pub field: &'static str,
    pub declared_type: DeclaredType,
    pub value: Value,
}

impl FieldValue {
    pub fn text(field: &'static str, value: &str) -> Self {
        Self {
            field,
            declared_type: DeclaredType::String,
            value: Value::String(value.to_string()),
        }
    }

    pub fn flag(field: &'static str, value: bool) -> Self {
        Self {
            field,
            declared_type: DeclaredType::String,
            value: Value::Bool(value),
        }
    }

    pub fn json<T: Serialize + ?Sized>(field: &'static str, value: &T) -> Result<Self, CodecError> {
        Ok(Self {
            field,
            declared_type: DeclaredType::Json,
            value: serde_json::to_value(value)?,
        })
    }

    /// The encoded write for this field under `kind`'s prefix.
    pub fn to_write(&self, kind: DomainKind) -> SettingWrite {
        SettingWrite::encode(kind.key_for(self.field), self.declared_type, &self.value)
    }
}

/// Which fields of a projection did not come from a stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectionReport {
    /// Fields with no stored row.
    pub defaulted: Vec<&'static str>,
    /// Fields whose stored value had the wrong shape.
    pub corrupt: Vec<&'static str>,
    /// Keys under the prefix that no field claims, sorted.
    pub unknown: Vec<String>,
}

impl ProjectionReport {
    pub fn is_clean(&self) -> bool {
        self.defaulted.is_empty() && self.corrupt.is_empty()
    }
}

/// A projected record together with its [`ProjectionReport`].
#[derive(Debug, Clone, PartialEq)]
pub struct Projection<D> {
    pub record: D,
    pub report: ProjectionReport,
}

/// Field-by-field access to the rows of one domain.
pub struct FieldReader<'a> {
    kind: DomainKind,
    rows: HashMap<&'a str, &'a SettingRecord>,
    report: ProjectionReport,
}

impl<'a> FieldReader<'a> {
    pub fn new(kind: DomainKind, records: &'a [SettingRecord]) -> Self {
        let prefix = kind.prefix();
        let rows = records
            .iter()
            .filter_map(|record| record.key.strip_prefix(prefix).map(|field| (field, record)))
            .collect();
        Self {
            kind,
            rows,
            report: ProjectionReport::default(),
        }
    }

    /// Read a text field.
    ///
    /// Legacy writers stored some text bare, so a `string` row whose content
    /// happens to parse as a JSON scalar (e.g. `150`, `true` or `null`) is
    /// taken as its stored characters. Arrays and objects are a mismatch.
    pub fn text(&mut self, field: &'static str, default: String) -> String {
        let Some(record) = self.take(field) else {
            return default;
        };
        match self.parsed(field, record, "text") {
            Some(Value::String(text)) => text,
            Some(Value::Number(_) | Value::Bool(_) | Value::Null)
                if record.declared_type == DeclaredType::String =>
            {
                record.raw_value.trim().to_string()
            }
            Some(_) => {
                self.mismatch(field, record, "text");
                default
            }
            None => default,
        }
    }

    /// Read a field of any deserializable shape.
    pub fn value<T: DeserializeOwned>(&mut self, field: &'static str, default: T) -> T {
        let Some(record) = self.take(field) else {
            return default;
        };
        let expected = std::any::type_name::<T>();
        let Some(decoded) = self.parsed(field, record, expected) else {
            return default;
        };
        match serde_json::from_value(decoded) {
            Ok(value) => value,
            Err(_) => {
                self.mismatch(field, record, expected);
                default
            }
        }
    }

    /// The decoded value, or `None` (recorded as corrupt) when a `json` row
    /// does not parse. The codec would otherwise hand back the broken text.
    fn parsed(
        &mut self,
        field: &'static str,
        record: &SettingRecord,
        expected: &str,
    ) -> Option<Value> {
        if record.declared_type == DeclaredType::Json
            && serde_json::from_str::<Value>(&record.raw_value).is_err()
        {
            self.mismatch(field, record, expected);
            return None;
        }
        Some(record.decoded())
    }

    fn take(&mut self, field: &'static str) -> Option<&'a SettingRecord> {
        let record = self.rows.remove(field);
        if record.is_none() {
            self.report.defaulted.push(field);
        }
        record
    }

    fn mismatch(&mut self, field: &'static str, record: &SettingRecord, expected: &str) {
        tracing::warn!(
            domain = self.kind.name(),
            key = %record.key,
            declared_type = %record.declared_type,
            expected,
            "Stored setting has an unexpected shape, using default"
        );
        self.report.corrupt.push(field);
    }

    fn finish(self) -> ProjectionReport {
        let mut report = self.report;
        let mut unknown: Vec<String> = self.rows.values().map(|r| r.key.clone()).collect();
        unknown.sort();
        report.unknown = unknown;
        report
    }
}

/// Project the rows belonging to `D` into a record.
///
/// `records` is the full, unfiltered table; rows of other domains are ignored.
pub fn project<D: SettingsDomain>(records: &[SettingRecord]) -> Projection<D> {
    let mut reader = FieldReader::new(D::KIND, records);
    let record = D::project_fields(&mut reader);
    let report = reader.finish();

    if !report.unknown.is_empty() {
        tracing::debug!(
            domain = D::KIND.name(),
            keys = ?report.unknown,
            "Ignoring unrecognised keys under domain prefix"
        );
    }

    Projection { record, report }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes_are_disjoint() {
        for a in DomainKind::ALL {
            for b in DomainKind::ALL {
                if a != b {
                    assert!(
                        !a.prefix().starts_with(b.prefix()),
                        "{a} prefix overlaps {b}"
                    );
                }
            }
        }
    }

    #[test]
    fn every_key_has_one_owner() {
        let mut seen = std::collections::HashSet::new();
        for kind in DomainKind::ALL {
            for field in kind.fields() {
                let key = kind.key_for(field);
                assert!(seen.insert(key.clone()), "duplicate key {key}");
                assert_eq!(owner_of(&key), Some(kind));
            }
        }
        assert_eq!(owner_of("blog_title"), None);
    }

    #[test]
    fn parse_domain_names() {
        assert_eq!("hero".parse::<DomainKind>().unwrap(), DomainKind::Hero);
        assert_eq!("Theme".parse::<DomainKind>().unwrap(), DomainKind::Theme);
        assert!("footer".parse::<DomainKind>().is_err());
    }

    #[test]
    fn field_values_follow_declaration_order() {
        fn check<D: SettingsDomain>() {
            let names: Vec<&str> = D::default()
                .field_values()
                .unwrap()
                .iter()
                .map(|v| v.field)
                .collect();
            assert_eq!(names, D::FIELDS, "{}", D::KIND);
        }
        check::<HeroSettings>();
        check::<AboutSettings>();
        check::<HeaderSettings>();
        check::<ThemeSettings>();
    }

    #[test]
    fn serialized_record_uses_field_names() {
        fn check<D: SettingsDomain>() {
            let value = serde_json::to_value(D::default()).unwrap();
            let object = value.as_object().unwrap();
            assert_eq!(object.len(), D::FIELDS.len());
            for field in D::FIELDS {
                assert!(object.contains_key(*field), "{} missing {field}", D::KIND);
            }
        }
        check::<HeroSettings>();
        check::<AboutSettings>();
        check::<HeaderSettings>();
        check::<ThemeSettings>();
    }
}
