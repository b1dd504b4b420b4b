use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;

/// Language-independent identifier of a symbol kind
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KindIdentifier {
    AssociatedType,
    Class,
    Deinit,
    Enum,
    Case,
    Func,
    Operator,
    Init,
    Ivar,
    Macro,
    Method,
    Property,
    Protocol,
    Snippet,
    SnippetGroup,
    Struct,
    Subscript,
    TypeMethod,
    TypeProperty,
    TypeSubscript,
    Typealias,
    Var,
    Module,
    Extension,
    Namespace,
    Union,
    Dictionary,
    HttpRequest,
    /// A kind registered on the [`KindRegistry`] of the decode session
    Custom(String),
    /// A kind neither well-known nor registered; the raw string is kept
    Unknown(String),
}

impl KindIdentifier {
    pub fn as_str(&self) -> &str {
        match self {
            Self::AssociatedType => "associatedtype",
            Self::Class => "class",
            Self::Deinit => "deinit",
            Self::Enum => "enum",
            Self::Case => "enum.case",
            Self::Func => "func",
            Self::Operator => "func.op",
            Self::Init => "init",
            Self::Ivar => "ivar",
            Self::Macro => "macro",
            Self::Method => "method",
            Self::Property => "property",
            Self::Protocol => "protocol",
            Self::Snippet => "snippet",
            Self::SnippetGroup => "snippetGroup",
            Self::Struct => "struct",
            Self::Subscript => "subscript",
            Self::TypeMethod => "type.method",
            Self::TypeProperty => "type.property",
            Self::TypeSubscript => "type.subscript",
            Self::Typealias => "typealias",
            Self::Var => "var",
            Self::Module => "module",
            Self::Extension => "extension",
            Self::Namespace => "namespace",
            Self::Union => "union",
            Self::Dictionary => "dictionary",
            Self::HttpRequest => "httpRequest",
            Self::Custom(raw) | Self::Unknown(raw) => raw,
        }
    }

    fn well_known(raw: &str) -> Option<Self> {
        let id = match raw {
            "associatedtype" => Self::AssociatedType,
            "class" => Self::Class,
            "deinit" => Self::Deinit,
            "enum" => Self::Enum,
            "enum.case" => Self::Case,
            "func" => Self::Func,
            "func.op" => Self::Operator,
            "init" => Self::Init,
            "ivar" => Self::Ivar,
            "macro" => Self::Macro,
            "method" => Self::Method,
            "property" => Self::Property,
            "protocol" => Self::Protocol,
            "snippet" => Self::Snippet,
            "snippetGroup" => Self::SnippetGroup,
            "struct" => Self::Struct,
            "subscript" => Self::Subscript,
            "type.method" => Self::TypeMethod,
            "type.property" => Self::TypeProperty,
            "type.subscript" => Self::TypeSubscript,
            "typealias" => Self::Typealias,
            "var" => Self::Var,
            "module" => Self::Module,
            "extension" => Self::Extension,
            "namespace" => Self::Namespace,
            "union" => Self::Union,
            "dictionary" => Self::Dictionary,
            "httpRequest" => Self::HttpRequest,
            _ => return None,
        };
        Some(id)
    }
}

impl fmt::Display for KindIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registry of symbol kind identifiers known to one decode session.
///
/// Well-known kinds are always recognized. Producers that emit their own kinds
/// register them here before decoding; the registry is owned by the session so
/// independent sessions never see each other's registrations.
#[derive(Debug, Clone, Default)]
pub struct KindRegistry {
    custom: BTreeSet<String>,
}

impl KindRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a custom kind identifier (e.g. `"myapi.endpoint"`)
    pub fn register(&mut self, identifier: impl Into<String>) {
        self.custom.insert(identifier.into());
    }

    pub fn is_registered(&self, identifier: &str) -> bool {
        self.custom.contains(identifier)
    }

    /// Resolve a raw kind string, as found on the wire, to an identifier.
    ///
    /// An exact custom registration wins. Otherwise a leading `<language>.`
    /// prefix is stripped and the rest is looked up.
    pub fn parse(&self, raw: &str) -> KindIdentifier {
        if self.custom.contains(raw) {
            return KindIdentifier::Custom(raw.to_string());
        }
        if let Some(id) = KindIdentifier::well_known(raw) {
            return id;
        }
        if let Some((_, rest)) = raw.split_once('.') {
            if let Some(id) = KindIdentifier::well_known(rest) {
                return id;
            }
            if self.custom.contains(rest) {
                return KindIdentifier::Custom(rest.to_string());
            }
        }
        KindIdentifier::Unknown(raw.to_string())
    }
}

/// Kind of a symbol: the parsed identifier plus its display name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Kind {
    pub identifier: KindIdentifier,
    pub display_name: String,
    /// Identifier string as it was decoded, written back on encode
    pub raw: String,
}

impl Kind {
    /// Build a kind from its wire representation
    pub fn parse(raw: &str, display_name: impl Into<String>, registry: &KindRegistry) -> Self {
        Self {
            identifier: registry.parse(raw),
            display_name: display_name.into(),
            raw: raw.to_string(),
        }
    }

    /// Build a kind for `language`, e.g. `("swift", Method)` → `swift.method`
    pub fn new(
        language: &str,
        identifier: KindIdentifier,
        display_name: impl Into<String>,
    ) -> Self {
        let raw = format!("{language}.{}", identifier.as_str());
        Self {
            identifier,
            display_name: display_name.into(),
            raw,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawKind {
    pub identifier: String,
    pub display_name: String,
}

impl Serialize for Kind {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        RawKind {
            identifier: self.raw.clone(),
            display_name: self.display_name.clone(),
        }
        .serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_language_prefix() {
        let registry = KindRegistry::new();
        assert_eq!(registry.parse("swift.method"), KindIdentifier::Method);
        assert_eq!(registry.parse("objc.type.method"), KindIdentifier::TypeMethod);
        assert_eq!(registry.parse("swift.enum.case"), KindIdentifier::Case);
        assert_eq!(registry.parse("func"), KindIdentifier::Func);
    }

    #[test]
    fn unregistered_kinds_stay_unknown() {
        let registry = KindRegistry::new();
        assert_eq!(
            registry.parse("myapi.endpoint"),
            KindIdentifier::Unknown("myapi.endpoint".into())
        );
    }

    #[test]
    fn registrations_are_per_registry() {
        let mut registry = KindRegistry::new();
        registry.register("myapi.endpoint");
        assert_eq!(
            registry.parse("myapi.endpoint"),
            KindIdentifier::Custom("myapi.endpoint".into())
        );

        let other = KindRegistry::new();
        assert!(!other.is_registered("myapi.endpoint"));
    }

    #[test]
    fn kind_encodes_raw_identifier() {
        let kind = Kind::new("swift", KindIdentifier::TypeMethod, "Type Method");
        let json = serde_json::to_string(&kind).unwrap();
        assert_eq!(
            json,
            r#"{"identifier":"swift.type.method","displayName":"Type Method"}"#
        );
    }
}
