use serde::{Deserialize, Serialize};
use std::fmt;
use symgraph_model::{Module, Symbol};

/// One view of a module: an interface language plus an optional platform.
///
/// Ordered by language, then platform (`None` first), so every table keyed by
/// selectors iterates deterministically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Selector {
    pub language: String,
    pub platform: Option<String>,
}

impl Selector {
    pub fn new(language: impl Into<String>, platform: Option<&str>) -> Self {
        Self {
            language: language.into(),
            platform: platform.map(str::to_string),
        }
    }

    /// Selector of a symbol as it appears in a graph for `module`
    pub fn for_symbol(symbol: &Symbol, module: &Module) -> Self {
        Self {
            language: symbol.language().to_string(),
            platform: module.platform.name(),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.platform {
            Some(platform) => write!(f, "{}@{}", self.language, platform),
            None => f.write_str(&self.language),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_needs_both_fields() {
        let swift_mac = Selector::new("swift", Some("macOS"));
        assert_eq!(swift_mac, Selector::new("swift", Some("macOS")));
        assert_ne!(swift_mac, Selector::new("swift", Some("iOS")));
        assert_ne!(swift_mac, Selector::new("occ", Some("macOS")));
        assert_ne!(swift_mac, Selector::new("swift", None));
    }

    #[test]
    fn orders_language_then_platform() {
        let mut selectors = vec![
            Selector::new("swift", Some("macOS")),
            Selector::new("occ", Some("macOS")),
            Selector::new("swift", None),
            Selector::new("swift", Some("iOS")),
        ];
        selectors.sort();
        let rendered: Vec<String> = selectors.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["occ@macOS", "swift", "swift@iOS", "swift@macOS"]);
    }
}
