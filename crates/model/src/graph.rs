use crate::error::Result;
use crate::relationship::{RawRelationship, Relationship};
use crate::symbol::{RawSymbol, Symbol};
use crate::version::SemanticVersion;
use crate::DecodeContext;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;

/// Information about the tool that produced a graph
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub format_version: SemanticVersion,
    pub generator: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatingSystem {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_version: Option<SemanticVersion>,
}

/// Target platform a graph was produced for
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Platform {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub architecture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operating_system: Option<OperatingSystem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
}

impl Platform {
    /// Platform with only an operating system set
    pub fn for_os(name: impl Into<String>) -> Self {
        Self {
            operating_system: Some(OperatingSystem {
                name: name.into(),
                minimum_version: None,
            }),
            ..Default::default()
        }
    }

    /// Canonical platform name, e.g. `macosx` → `macOS`.
    ///
    /// An iOS target built for the `macabi` environment is `macCatalyst`; any
    /// OS built for the `appextension` environment gets an `AppExtension`
    /// suffix (`iOSAppExtension`).
    pub fn name(&self) -> Option<String> {
        let os = self.operating_system.as_ref()?;
        let environment = self.environment.as_deref();
        let name = match os.name.as_str() {
            "macosx" | "macos" => "macOS",
            "ios" if environment == Some("macabi") => return Some("macCatalyst".to_string()),
            "ios" => "iOS",
            "watchos" => "watchOS",
            "tvos" => "tvOS",
            "xros" | "visionos" => "visionOS",
            "linux" => "Linux",
            other => other,
        };
        match environment {
            Some("appextension") => Some(format!("{name}AppExtension")),
            _ => Some(name.to_string()),
        }
    }
}

/// The module a graph describes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    pub name: String,
    #[serde(default)]
    pub platform: Platform,
    /// Other modules whose presence the graph's contents depend on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bystanders: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_virtual: bool,
}

impl Module {
    pub fn new(name: impl Into<String>, platform: Platform) -> Self {
        Self {
            name: name.into(),
            platform,
            bystanders: None,
            is_virtual: false,
        }
    }
}

/// One symbol graph: a module, its symbols, and their relationships
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolGraph {
    pub metadata: Metadata,
    pub module: Module,
    /// Symbols keyed by precise identifier
    pub symbols: BTreeMap<String, Symbol>,
    pub relationships: Vec<Relationship>,
}

impl SymbolGraph {
    pub fn new(module: Module) -> Self {
        Self {
            metadata: Metadata::default(),
            module,
            symbols: BTreeMap::new(),
            relationships: Vec::new(),
        }
    }

    /// Insert a symbol, replacing any previous one with the same identifier
    pub fn add_symbol(&mut self, symbol: Symbol) {
        self.symbols.insert(symbol.identifier.precise.clone(), symbol);
    }

    pub fn add_relationship(&mut self, relationship: Relationship) {
        self.relationships.push(relationship);
    }

    /// Decode a graph from its JSON form
    pub fn from_json(json: &str, ctx: &DecodeContext) -> Result<Self> {
        let raw: RawSymbolGraph = serde_json::from_str(json)?;
        Self::from_raw(raw, ctx)
    }

    pub fn from_slice(bytes: &[u8], ctx: &DecodeContext) -> Result<Self> {
        let raw: RawSymbolGraph = serde_json::from_slice(bytes)?;
        Self::from_raw(raw, ctx)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_raw())?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_raw())?)
    }

    fn from_raw(raw: RawSymbolGraph, ctx: &DecodeContext) -> Result<Self> {
        let mut graph = Self::new(raw.module);
        graph.metadata = raw.metadata;
        for raw_symbol in raw.symbols {
            let symbol = Symbol::decode(raw_symbol, ctx)?;
            if graph.symbols.contains_key(symbol.precise()) {
                log::warn!(
                    "Duplicate symbol `{}` in graph for module `{}`; keeping the last one",
                    symbol.precise(),
                    graph.module.name
                );
            }
            graph.add_symbol(symbol);
        }
        graph.relationships = raw
            .relationships
            .into_iter()
            .map(|r| Relationship::decode(r, ctx))
            .collect();
        Ok(graph)
    }

    fn to_raw(&self) -> RawGraphOut<'_> {
        RawGraphOut {
            metadata: &self.metadata,
            module: &self.module,
            symbols: self.symbols.values().collect(),
            relationships: self.relationships.iter().collect(),
        }
    }
}

impl Serialize for SymbolGraph {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_raw().serialize(serializer)
    }
}

#[derive(Deserialize)]
struct RawSymbolGraph {
    #[serde(default)]
    metadata: Metadata,
    module: Module,
    #[serde(default)]
    symbols: Vec<RawSymbol>,
    #[serde(default)]
    relationships: Vec<RawRelationship>,
}

#[derive(Serialize)]
struct RawGraphOut<'a> {
    metadata: &'a Metadata,
    module: &'a Module,
    symbols: Vec<&'a Symbol>,
    relationships: Vec<&'a Relationship>,
}
