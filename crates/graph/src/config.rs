use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Configuration of one collection session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    /// Which unified graph receives the symbols of an extension graph
    pub extension_graph_association_strategy: ExtensionGraphAssociation,

    /// Build overload groups when loading finishes
    pub create_overload_groups: bool,

    /// Only group symbols of these interface languages (None = all)
    pub restrict_overload_group_languages: Option<BTreeSet<String>>,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            extension_graph_association_strategy: ExtensionGraphAssociation::ExtendedGraph,
            create_overload_groups: false,
            restrict_overload_group_languages: None,
        }
    }
}

impl CollectorConfig {
    /// Overload groups for every language
    pub fn with_overload_groups() -> Self {
        Self {
            create_overload_groups: true,
            ..Default::default()
        }
    }

    /// Overload groups for the given languages only
    pub fn for_languages<I, S>(languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            create_overload_groups: true,
            restrict_overload_group_languages: Some(
                languages.into_iter().map(Into::into).collect(),
            ),
            ..Default::default()
        }
    }

    /// Keep extension symbols with the module that contributed them
    pub fn extending() -> Self {
        Self {
            extension_graph_association_strategy: ExtensionGraphAssociation::ExtendingGraph,
            ..Default::default()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if let Some(languages) = &self.restrict_overload_group_languages {
            if languages.is_empty() {
                return Err(
                    "restrict_overload_group_languages must name at least one language".to_string(),
                );
            }
            if languages.iter().any(|l| l.trim().is_empty()) {
                return Err("restrict_overload_group_languages contains an empty name".to_string());
            }
        }
        Ok(())
    }
}

/// Where the symbols of an extension graph `X@Y` end up
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtensionGraphAssociation {
    /// In the graph of the extended module `Y`
    #[default]
    ExtendedGraph,

    /// In the graph of the contributing module `X`
    ExtendingGraph,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = CollectorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(
            config.extension_graph_association_strategy,
            ExtensionGraphAssociation::ExtendedGraph
        );
        assert!(!config.create_overload_groups);
    }

    #[test]
    fn test_preset_configs_valid() {
        assert!(CollectorConfig::with_overload_groups().validate().is_ok());
        assert!(CollectorConfig::for_languages(["swift"]).validate().is_ok());
        assert!(CollectorConfig::extending().validate().is_ok());
    }

    #[test]
    fn test_empty_restriction_rejected() {
        let mut config = CollectorConfig::for_languages(Vec::<String>::new());
        assert!(config.validate().is_err());

        config.restrict_overload_group_languages = Some(BTreeSet::from([" ".to_string()]));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: CollectorConfig =
            serde_json::from_str(r#"{"extension_graph_association_strategy":"extending_graph"}"#)
                .unwrap();
        assert_eq!(
            config.extension_graph_association_strategy,
            ExtensionGraphAssociation::ExtendingGraph
        );
        assert!(!config.create_overload_groups);
        assert_eq!(config.restrict_overload_group_languages, None);
    }
}
