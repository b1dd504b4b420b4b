//! Open-ended extension fields attached to symbols and relationships.
//!
//! On the wire every mixin is a top-level key of the owning record. Keys with a
//! registered decoder become typed [`Mixin`] variants; everything else is kept
//! as [`Mixin::Opaque`] and written back verbatim.

use crate::error::{ModelError, Result};
use crate::fragment::Fragment;
use crate::symbol::Position;
use crate::version::SemanticVersion;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Wire keys of the registered mixins
pub mod keys {
    pub const DECLARATION_FRAGMENTS: &str = "declarationFragments";
    pub const AVAILABILITY: &str = "availability";
    pub const LOCATION: &str = "location";
    pub const OVERLOAD_DATA: &str = "overloadData";
    pub const SWIFT_EXTENSION: &str = "swiftExtension";
    pub const SPI: &str = "spi";
    pub const IS_READ_ONLY: &str = "isReadOnly";
}

/// One availability record for a platform domain
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub introduced: Option<SemanticVersion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<SemanticVersion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub obsoleted: Option<SemanticVersion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub renamed: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_unconditionally_deprecated: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_unconditionally_unavailable: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub will_eventually_be_deprecated: bool,
}

impl AvailabilityItem {
    pub fn is_deprecated(&self) -> bool {
        self.is_unconditionally_deprecated || self.deprecated.is_some()
    }
}

/// Source location of a declaration; `position` is optional and dropped
/// on its own when it cannot be decoded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

/// Membership of a symbol in a synthesized overload group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverloadData {
    pub overload_group_identifier: String,
    pub overload_group_index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenericConstraint {
    pub kind: String,
    pub lhs: String,
    pub rhs: String,
}

/// Information about the type an extension member was declared on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwiftExtension {
    pub extended_module: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_kind: Option<String>,
    #[serde(default)]
    pub constraints: Vec<GenericConstraint>,
}

/// A typed extension field
#[derive(Debug, Clone, PartialEq)]
pub enum Mixin {
    DeclarationFragments(Vec<Fragment>),
    Availability(Vec<AvailabilityItem>),
    Location(Location),
    OverloadData(OverloadData),
    SwiftExtension(SwiftExtension),
    Spi(bool),
    IsReadOnly(bool),
    /// Unregistered key; the value is carried through untouched
    Opaque(Value),
}

impl Mixin {
    /// Encode back to the wire value
    pub fn to_value(&self) -> Result<Value> {
        let value = match self {
            Self::DeclarationFragments(fragments) => serde_json::to_value(fragments)?,
            Self::Availability(items) => serde_json::to_value(items)?,
            Self::Location(location) => serde_json::to_value(location)?,
            Self::OverloadData(data) => serde_json::to_value(data)?,
            Self::SwiftExtension(ext) => serde_json::to_value(ext)?,
            Self::Spi(flag) | Self::IsReadOnly(flag) => Value::Bool(*flag),
            Self::Opaque(value) => value.clone(),
        };
        Ok(value)
    }
}

/// Capability object that turns a wire value into a typed mixin
pub type MixinDecoder = fn(Value) -> Result<Mixin>;

/// Registry mapping wire keys to mixin decoders
#[derive(Clone)]
pub struct MixinRegistry {
    decoders: BTreeMap<String, MixinDecoder>,
}

impl MixinRegistry {
    /// A registry with no decoders: every mixin stays opaque
    pub fn empty() -> Self {
        Self {
            decoders: BTreeMap::new(),
        }
    }

    /// A registry with all mixins this crate knows about
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.register(keys::DECLARATION_FRAGMENTS, |v| {
            Ok(Mixin::DeclarationFragments(serde_json::from_value(v)?))
        });
        registry.register(keys::AVAILABILITY, |v| {
            Ok(Mixin::Availability(serde_json::from_value(v)?))
        });
        registry.register(keys::LOCATION, decode_location);
        registry.register(keys::OVERLOAD_DATA, |v| {
            Ok(Mixin::OverloadData(serde_json::from_value(v)?))
        });
        registry.register(keys::SWIFT_EXTENSION, |v| {
            Ok(Mixin::SwiftExtension(serde_json::from_value(v)?))
        });
        registry.register(keys::SPI, |v| Ok(Mixin::Spi(serde_json::from_value(v)?)));
        registry.register(keys::IS_READ_ONLY, |v| {
            Ok(Mixin::IsReadOnly(serde_json::from_value(v)?))
        });
        registry
    }

    pub fn register(&mut self, key: impl Into<String>, decoder: MixinDecoder) {
        self.decoders.insert(key.into(), decoder);
    }

    pub fn is_registered(&self, key: &str) -> bool {
        self.decoders.contains_key(key)
    }

    /// Decode one mixin value.
    ///
    /// Returns `None` when a registered decoder rejects the value; the caller
    /// drops that mixin and keeps the owning record.
    pub fn decode(&self, key: &str, value: Value) -> Option<Mixin> {
        let Some(decoder) = self.decoders.get(key) else {
            return Some(Mixin::Opaque(value));
        };
        match decoder(value) {
            Ok(mixin) => Some(mixin),
            Err(err) => {
                log::warn!("Dropping undecodable mixin `{key}`: {err}");
                None
            }
        }
    }
}

impl Default for MixinRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl std::fmt::Debug for MixinRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MixinRegistry")
            .field("keys", &self.decoders.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn decode_location(value: Value) -> Result<Mixin> {
    let uri = value
        .get("uri")
        .and_then(Value::as_str)
        .ok_or_else(|| ModelError::invalid_mixin(keys::LOCATION, "missing `uri`"))?
        .to_string();
    let position = value
        .get("position")
        .cloned()
        .and_then(|raw| serde_json::from_value::<Position>(raw).ok());
    Ok(Mixin::Location(Location { uri, position }))
}

/// Mixins of one record, keyed by wire key
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mixins(BTreeMap<String, Mixin>);

impl Mixins {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Mixin> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, mixin: Mixin) -> Option<Mixin> {
        self.0.insert(key.into(), mixin)
    }

    pub fn remove(&mut self, key: &str) -> Option<Mixin> {
        self.0.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Mixin)> {
        self.0.iter()
    }

    pub fn declaration_fragments(&self) -> Option<&[Fragment]> {
        match self.0.get(keys::DECLARATION_FRAGMENTS) {
            Some(Mixin::DeclarationFragments(fragments)) => Some(fragments),
            _ => None,
        }
    }

    pub fn availability(&self) -> Option<&[AvailabilityItem]> {
        match self.0.get(keys::AVAILABILITY) {
            Some(Mixin::Availability(items)) => Some(items),
            _ => None,
        }
    }

    pub fn overload_data(&self) -> Option<&OverloadData> {
        match self.0.get(keys::OVERLOAD_DATA) {
            Some(Mixin::OverloadData(data)) => Some(data),
            _ => None,
        }
    }

    pub fn location(&self) -> Option<&Location> {
        match self.0.get(keys::LOCATION) {
            Some(Mixin::Location(location)) => Some(location),
            _ => None,
        }
    }

    /// Deprecated unconditionally or with a version on any domain
    pub fn is_deprecated(&self) -> bool {
        self.availability()
            .is_some_and(|items| items.iter().any(AvailabilityItem::is_deprecated))
    }

    /// Decode every entry of a flattened wire map through `registry`
    pub fn decode(raw: BTreeMap<String, Value>, registry: &MixinRegistry) -> Self {
        let decoded = raw
            .into_iter()
            .filter_map(|(key, value)| registry.decode(&key, value).map(|mixin| (key, mixin)))
            .collect();
        Self(decoded)
    }

    /// Encode every entry back to wire values
    pub fn encode(&self) -> Result<BTreeMap<String, Value>> {
        self.0
            .iter()
            .map(|(key, mixin)| Ok((key.clone(), mixin.to_value()?)))
            .collect()
    }
}

impl FromIterator<(String, Mixin)> for Mixins {
    fn from_iter<I: IntoIterator<Item = (String, Mixin)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Mixins {
    type Item = (String, Mixin);
    type IntoIter = std::collections::btree_map::IntoIter<String, Mixin>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
