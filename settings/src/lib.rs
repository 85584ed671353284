//! Typed settings panels over a flat key/value table.
//!
//! Every panel of the site (hero banner, about page, header, theme palette) is
//! persisted as individual `(key, declared type, serialized value)` rows. This
//! crate owns the pure half of that contract: the value codec, the row type,
//! and the projection of rows into strongly-shaped domain records and back.
//! Persistence lives in the server crate.

pub mod codec;
pub mod domain;
pub mod record;

pub use codec::{decode, encode, encode_typed, CodecError, DeclaredType};
pub use domain::{
    owner_of, project, AboutSettings, DomainKind, FieldReader, FieldValue, HeaderSettings,
    HeroSettings, NavLink, Projection, ProjectionReport, SettingsDomain, StatTile, ThemeSettings,
    TimelineEntry, UnknownDomain,
};
pub use record::{SettingRecord, SettingWrite};
