use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Kind of a declaration fragment
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FragmentKind {
    Keyword,
    Attribute,
    Number,
    String,
    Identifier,
    TypeIdentifier,
    GenericParameter,
    /// Local parameter name, only visible inside the body
    InternalParam,
    /// Argument label used at call sites
    ExternalParam,
    Text,
    /// Any fragment kind this crate does not know about, kept verbatim
    Other(std::string::String),
}

impl FragmentKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Keyword => "keyword",
            Self::Attribute => "attribute",
            Self::Number => "number",
            Self::String => "string",
            Self::Identifier => "identifier",
            Self::TypeIdentifier => "typeIdentifier",
            Self::GenericParameter => "genericParameter",
            Self::InternalParam => "internalParam",
            Self::ExternalParam => "externalParam",
            Self::Text => "text",
            Self::Other(raw) => raw,
        }
    }

    pub fn parse(raw: &str) -> Self {
        match raw {
            "keyword" => Self::Keyword,
            "attribute" => Self::Attribute,
            "number" => Self::Number,
            "string" => Self::String,
            "identifier" => Self::Identifier,
            "typeIdentifier" => Self::TypeIdentifier,
            "genericParameter" => Self::GenericParameter,
            "internalParam" => Self::InternalParam,
            "externalParam" => Self::ExternalParam,
            "text" => Self::Text,
            other => Self::Other(other.to_string()),
        }
    }
}

impl Serialize for FragmentKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FragmentKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = std::string::String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

/// One token of a rendered declaration (e.g. `func`, ` `, `foo`, `(`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fragment {
    pub kind: FragmentKind,
    pub spelling: String,
    /// Identifier of the symbol this fragment refers to, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precise_identifier: Option<String>,
}

impl Fragment {
    pub fn new(kind: FragmentKind, spelling: impl Into<String>) -> Self {
        Self {
            kind,
            spelling: spelling.into(),
            precise_identifier: None,
        }
    }

    pub fn keyword(spelling: impl Into<String>) -> Self {
        Self::new(FragmentKind::Keyword, spelling)
    }

    pub fn text(spelling: impl Into<String>) -> Self {
        Self::new(FragmentKind::Text, spelling)
    }

    pub fn identifier(spelling: impl Into<String>) -> Self {
        Self::new(FragmentKind::Identifier, spelling)
    }

    pub fn external_param(spelling: impl Into<String>) -> Self {
        Self::new(FragmentKind::ExternalParam, spelling)
    }

    pub fn internal_param(spelling: impl Into<String>) -> Self {
        Self::new(FragmentKind::InternalParam, spelling)
    }

    /// Attach the referenced symbol's identifier
    pub fn with_precise_identifier(mut self, id: impl Into<String>) -> Self {
        self.precise_identifier = Some(id.into());
        self
    }
}

/// Concatenate the spellings of a fragment sequence into display text
pub fn fragments_text(fragments: &[Fragment]) -> String {
    fragments.iter().map(|f| f.spelling.as_str()).collect()
}
