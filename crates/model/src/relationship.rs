use crate::error::Result;
use crate::mixin::Mixins;
use crate::DecodeContext;
use serde::ser::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Type of relationship between two symbols
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RelationshipKind {
    /// A is a member of type B
    MemberOf,
    ConformsTo,
    InheritsFrom,
    /// A provides the default body of protocol requirement B
    DefaultImplementationOf,
    Overrides,
    RequirementOf,
    OptionalRequirementOf,
    ExtensionTo,
    References,
    /// A is one overload of the synthesized group B
    OverloadOf,
    Other(String),
}

impl RelationshipKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::MemberOf => "memberOf",
            Self::ConformsTo => "conformsTo",
            Self::InheritsFrom => "inheritsFrom",
            Self::DefaultImplementationOf => "defaultImplementationOf",
            Self::Overrides => "overrides",
            Self::RequirementOf => "requirementOf",
            Self::OptionalRequirementOf => "optionalRequirementOf",
            Self::ExtensionTo => "extensionTo",
            Self::References => "references",
            Self::OverloadOf => "overloadOf",
            Self::Other(raw) => raw,
        }
    }

    pub fn parse(raw: &str) -> Self {
        match raw {
            "memberOf" => Self::MemberOf,
            "conformsTo" => Self::ConformsTo,
            "inheritsFrom" => Self::InheritsFrom,
            "defaultImplementationOf" => Self::DefaultImplementationOf,
            "overrides" => Self::Overrides,
            "requirementOf" => Self::RequirementOf,
            "optionalRequirementOf" => Self::OptionalRequirementOf,
            "extensionTo" => Self::ExtensionTo,
            "references" => Self::References,
            "overloadOf" => Self::OverloadOf,
            other => Self::Other(other.to_string()),
        }
    }

    /// Kinds that place a symbol inside its parent; overload groups inherit these
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::MemberOf | Self::RequirementOf | Self::OptionalRequirementOf | Self::ExtensionTo
        )
    }
}

impl fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for RelationshipKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RelationshipKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

/// Identity of a relationship, independent of its mixins
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelationshipKey {
    pub source: String,
    pub target: String,
    pub kind: RelationshipKind,
    pub target_fallback: Option<String>,
}

/// Directed edge between two symbols
#[derive(Debug, Clone, PartialEq)]
pub struct Relationship {
    pub source: String,
    pub target: String,
    pub kind: RelationshipKind,
    /// Display text for a target that lives outside the graph
    pub target_fallback: Option<String>,
    pub mixins: Mixins,
}

impl Relationship {
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        kind: RelationshipKind,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            kind,
            target_fallback: None,
            mixins: Mixins::new(),
        }
    }

    pub fn with_target_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.target_fallback = Some(fallback.into());
        self
    }

    pub fn key(&self) -> RelationshipKey {
        RelationshipKey {
            source: self.source.clone(),
            target: self.target.clone(),
            kind: self.kind.clone(),
            target_fallback: self.target_fallback.clone(),
        }
    }

    pub(crate) fn decode(raw: RawRelationship, ctx: &DecodeContext) -> Self {
        Self {
            source: raw.source,
            target: raw.target,
            kind: raw.kind,
            target_fallback: raw.target_fallback,
            mixins: Mixins::decode(raw.mixins, &ctx.mixins),
        }
    }

    fn to_raw(&self) -> Result<RawRelationship> {
        Ok(RawRelationship {
            source: self.source.clone(),
            target: self.target.clone(),
            kind: self.kind.clone(),
            target_fallback: self.target_fallback.clone(),
            mixins: self.mixins.encode()?,
        })
    }
}

impl Serialize for Relationship {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_raw().map_err(S::Error::custom)?.serialize(serializer)
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawRelationship {
    pub source: String,
    pub target: String,
    pub kind: RelationshipKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_fallback: Option<String>,
    #[serde(flatten)]
    pub mixins: BTreeMap<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structural_kinds() {
        assert!(RelationshipKind::MemberOf.is_structural());
        assert!(RelationshipKind::RequirementOf.is_structural());
        assert!(!RelationshipKind::OverloadOf.is_structural());
        assert!(!RelationshipKind::DefaultImplementationOf.is_structural());
    }

    #[test]
    fn unknown_kind_round_trips() {
        let kind: RelationshipKind = serde_json::from_str(r#""wraps""#).unwrap();
        assert_eq!(kind, RelationshipKind::Other("wraps".into()));
        assert_eq!(serde_json::to_string(&kind).unwrap(), r#""wraps""#);
    }
}
