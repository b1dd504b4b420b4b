//! Collection session: routes incoming graphs to the unified graph of the
//! module they belong to and finalizes everything in one step.

use crate::config::{CollectorConfig, ExtensionGraphAssociation};
use crate::error::{GraphError, Result};
use crate::graph::UnifiedGraph;
use crate::overloads;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;
use symgraph_model::SymbolGraph;

/// How a graph relates to the module it describes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphRole {
    /// The module's own symbols
    Main,
    /// Members added by the graph's module to types of `extended_module`
    Extension { extended_module: String },
}

impl GraphRole {
    pub fn is_main(&self) -> bool {
        matches!(self, GraphRole::Main)
    }

    /// Derive the role of `graph` from the name of the file it was read from.
    ///
    /// `Kit.symbols.json` is a main graph; `Kit@Foundation.symbols.json` is an
    /// extension of `Foundation` contributed by `Kit`. Names with several `@`
    /// and graphs that declare bystanders extend their own module. Returns the
    /// contributing module name along with the role.
    pub fn from_file_name(file_name: &str, graph: &SymbolGraph) -> (String, GraphRole) {
        let module_name = graph.module.name.clone();
        let base = Path::new(file_name)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(file_name);
        let stem = base
            .strip_suffix(".symbols.json")
            .or_else(|| base.strip_suffix(".json"))
            .unwrap_or(base);

        let has_bystanders = graph
            .module
            .bystanders
            .as_ref()
            .is_some_and(|bystanders| !bystanders.is_empty());
        let parts: Vec<&str> = stem.split('@').collect();
        let role = match parts.as_slice() {
            [_] => GraphRole::Main,
            [_, extended] if !has_bystanders => GraphRole::Extension {
                extended_module: (*extended).to_string(),
            },
            _ => GraphRole::Extension {
                extended_module: module_name.clone(),
            },
        };
        (module_name, role)
    }
}

/// Advisory findings of a collection session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A symbol's graph key disagreed with its identifier; the symbol was skipped
    IdentifierMismatch {
        module: String,
        source: String,
        expected: String,
        found: String,
    },
    /// Relationships whose endpoints never resolved
    OrphanRelationships { module: String, count: usize },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::IdentifierMismatch {
                module,
                source,
                expected,
                found,
            } => write!(
                f,
                "{module}: symbol keyed `{expected}` in `{source}` has identifier `{found}`"
            ),
            Diagnostic::OrphanRelationships { module, count } => {
                write!(f, "{module}: {count} orphan relationship(s)")
            }
        }
    }
}

/// Result of [`GraphCollector::finish_loading`]
#[derive(Debug, Clone, PartialEq)]
pub struct LoadingOutput {
    /// Unified graphs keyed by module name
    pub graphs: BTreeMap<String, UnifiedGraph>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Accumulates symbol graphs into one [`UnifiedGraph`] per module.
///
/// Graphs may arrive in any order; the finished graphs do not depend on it.
#[derive(Debug, Default)]
pub struct GraphCollector {
    config: CollectorConfig,
    graphs: BTreeMap<String, UnifiedGraph>,
    diagnostics: Vec<Diagnostic>,
}

impl GraphCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CollectorConfig) -> Result<Self> {
        config.validate().map_err(GraphError::InvalidConfig)?;
        Ok(Self {
            config,
            ..Default::default()
        })
    }

    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }

    /// Module whose unified graph receives a graph in `role`
    fn target_module<'a>(&self, graph: &'a SymbolGraph, role: &'a GraphRole) -> &'a str {
        match (role, self.config.extension_graph_association_strategy) {
            (GraphRole::Main, _) => graph.module.name.as_str(),
            (
                GraphRole::Extension { extended_module },
                ExtensionGraphAssociation::ExtendedGraph,
            ) => extended_module.as_str(),
            (GraphRole::Extension { .. }, ExtensionGraphAssociation::ExtendingGraph) => {
                graph.module.name.as_str()
            }
        }
    }

    /// Merge one graph. `source` tags the graph's module and metadata records,
    /// normally the file it was read from.
    pub fn merge_graph(&mut self, graph: &SymbolGraph, source: &str, role: &GraphRole) {
        let module = self.target_module(graph, role).to_string();
        log::debug!(
            "Merging `{source}` ({}) into `{module}`",
            if role.is_main() { "main" } else { "extension" }
        );

        let unified = self
            .graphs
            .entry(module.clone())
            .or_insert_with(|| UnifiedGraph::new(module.clone()));
        for err in unified.merge_graph(graph, source, role.is_main()) {
            match err {
                GraphError::IdentifierMismatch { expected, found } => {
                    self.diagnostics.push(Diagnostic::IdentifierMismatch {
                        module: module.clone(),
                        source: source.to_string(),
                        expected,
                        found,
                    })
                }
                other => log::warn!("Merging `{source}` into `{module}`: {other}"),
            }
        }
    }

    /// Merge a graph read from `file_name`, deriving its role from the name
    pub fn merge_file_graph(&mut self, graph: &SymbolGraph, file_name: &str) {
        let (_, role) = GraphRole::from_file_name(file_name, graph);
        self.merge_graph(graph, file_name, &role);
    }

    /// Graph accumulated so far for `module`
    pub fn unified_graph(&self, module: &str) -> Option<&UnifiedGraph> {
        self.graphs.get(module)
    }

    /// Finalize every unified graph: build overload groups if asked, then
    /// collect orphan relationships.
    pub fn finish_loading(
        mut self,
        create_overload_groups: bool,
        restrict_overload_group_languages: Option<&BTreeSet<String>>,
    ) -> LoadingOutput {
        let mut group_count = 0;
        for (module, graph) in self.graphs.iter_mut() {
            if create_overload_groups {
                let created =
                    overloads::create_overload_groups(graph, restrict_overload_group_languages);
                log::debug!("`{module}`: {created} overload group(s)");
                group_count += created;
            }
            graph.collect_orphans();
            let orphans = graph.orphan_relationships().len();
            if orphans > 0 {
                self.diagnostics.push(Diagnostic::OrphanRelationships {
                    module: module.clone(),
                    count: orphans,
                });
            }
        }

        log::info!(
            "Loaded {} module(s), {} symbol(s), {} overload group(s), {} diagnostic(s)",
            self.graphs.len(),
            self.graphs.values().map(|g| g.symbols.len()).sum::<usize>(),
            group_count,
            self.diagnostics.len()
        );

        LoadingOutput {
            graphs: self.graphs,
            diagnostics: self.diagnostics,
        }
    }

    /// [`GraphCollector::finish_loading`] with the session's configuration
    pub fn finish(self) -> LoadingOutput {
        let create = self.config.create_overload_groups;
        let languages = self.config.restrict_overload_group_languages.clone();
        self.finish_loading(create, languages.as_ref())
    }
}
