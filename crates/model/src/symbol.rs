use crate::error::{ModelError, Result};
use crate::fragment::Fragment;
use crate::kind::{Kind, RawKind};
use crate::mixin::Mixins;
use crate::DecodeContext;
use serde::ser::Error as _;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;

/// Stable identity of a symbol plus the language view it was emitted for
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identifier {
    /// Unique identifier, identical across platforms and languages
    pub precise: String,
    pub interface_language: String,
}

/// Zero-based line/character position in a source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceRange {
    pub start: Position,
    pub end: Position,
}

/// Display names of a symbol
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Names {
    pub title: String,
    /// Short form used in navigation trees
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub navigator: Option<Vec<Fragment>>,
    /// Form used in headings and listings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_heading: Option<Vec<Fragment>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prose: Option<String>,
}

impl Names {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineText {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<SourceRange>,
}

/// Documentation comment attached to a symbol
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocComment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    pub lines: Vec<LineText>,
}

impl DocComment {
    /// Comment made of plain lines without source ranges
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            url: None,
            module: None,
            lines: lines
                .into_iter()
                .map(|text| LineText {
                    text: text.into(),
                    range: None,
                })
                .collect(),
        }
    }

    /// Textual content only; ranges and provenance are ignored
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|line| line.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// One symbol of a single graph
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub identifier: Identifier,
    pub kind: Kind,
    pub path_components: Vec<String>,
    pub names: Names,
    pub doc_comment: Option<DocComment>,
    pub access_level: String,
    pub mixins: Mixins,
}

impl Symbol {
    pub fn precise(&self) -> &str {
        &self.identifier.precise
    }

    pub fn language(&self) -> &str {
        &self.identifier.interface_language
    }

    pub(crate) fn decode(raw: RawSymbol, ctx: &DecodeContext) -> Result<Self> {
        if raw.identifier.precise.is_empty() {
            return Err(ModelError::invalid_symbol(format!(
                "symbol `{}` has an empty identifier",
                raw.names.title
            )));
        }
        Ok(Self {
            kind: Kind::parse(&raw.kind.identifier, raw.kind.display_name, &ctx.kinds),
            identifier: raw.identifier,
            path_components: raw.path_components,
            names: raw.names,
            doc_comment: raw.doc_comment,
            access_level: raw.access_level,
            mixins: Mixins::decode(raw.mixins, &ctx.mixins),
        })
    }

    fn to_raw(&self) -> Result<RawSymbol> {
        Ok(RawSymbol {
            identifier: self.identifier.clone(),
            kind: RawKind {
                identifier: self.kind.raw.clone(),
                display_name: self.kind.display_name.clone(),
            },
            path_components: self.path_components.clone(),
            names: self.names.clone(),
            doc_comment: self.doc_comment.clone(),
            access_level: self.access_level.clone(),
            mixins: self.mixins.encode()?,
        })
    }
}

impl Serialize for Symbol {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_raw().map_err(S::Error::custom)?.serialize(serializer)
    }
}

/// Wire shape of a symbol; unknown top-level keys are mixins
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawSymbol {
    pub identifier: Identifier,
    pub kind: RawKind,
    #[serde(default)]
    pub path_components: Vec<String>,
    pub names: Names,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_comment: Option<DocComment>,
    #[serde(default)]
    pub access_level: String,
    #[serde(flatten)]
    pub mixins: BTreeMap<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::KindIdentifier;
    use crate::mixin::Mixin;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn decodes_flattened_mixins() {
        let raw: RawSymbol = serde_json::from_value(json!({
            "identifier": {"precise": "s:4Demo3runyyF", "interfaceLanguage": "swift"},
            "kind": {"identifier": "swift.func", "displayName": "Function"},
            "pathComponents": ["run()"],
            "names": {"title": "run()"},
            "accessLevel": "public",
            "spi": false,
            "location": {"uri": "file:///Demo.swift", "position": {"line": 3, "character": 4}}
        }))
        .unwrap();

        let symbol = Symbol::decode(raw, &DecodeContext::default()).unwrap();
        assert_eq!(symbol.kind.identifier, KindIdentifier::Func);
        assert_eq!(symbol.mixins.get("spi"), Some(&Mixin::Spi(false)));
        assert_eq!(
            symbol.mixins.location().and_then(|l| l.position),
            Some(Position {
                line: 3,
                character: 4
            })
        );
    }

    #[test]
    fn empty_identifier_is_rejected() {
        let raw: RawSymbol = serde_json::from_value(json!({
            "identifier": {"precise": "", "interfaceLanguage": "swift"},
            "kind": {"identifier": "swift.func", "displayName": "Function"},
            "names": {"title": "broken"}
        }))
        .unwrap();
        assert!(Symbol::decode(raw, &DecodeContext::default()).is_err());
    }

    #[test]
    fn doc_comment_text_ignores_ranges() {
        let mut comment = DocComment::from_lines(["Runs.", "Twice."]);
        comment.lines[0].range = Some(SourceRange {
            start: Position {
                line: 1,
                character: 0,
            },
            end: Position {
                line: 1,
                character: 5,
            },
        });
        assert_eq!(comment.text(), "Runs.\nTwice.");
    }
}
