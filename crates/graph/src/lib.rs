//! # Symgraph Graph
//!
//! Unification of many symbol graphs into one graph per module.
//!
//! ## Features
//!
//! - **Selector-indexed symbols** - one symbol, many language/platform views
//! - **Extension routing** - `X@Y` graphs land in `Y` or `X` as configured
//! - **Orphan tracking** - relationships with no known endpoint are set aside
//! - **Overload groups** - sibling overloads collapse under one synthetic symbol
//!
//! ## Architecture
//!
//! ```text
//! SymbolGraph (per module / platform / language)
//!     │
//!     ├──> GraphCollector
//!     │      ├─ GraphRole (main or X@Y extension)
//!     │      └─ route to the target module's UnifiedGraph
//!     │
//!     ├──> UnifiedGraph
//!     │      ├─ UnifiedSymbol: fields keyed by Selector
//!     │      └─ relationships keyed by Selector, deduplicated
//!     │
//!     └──> finish_loading
//!            ├─ overload groups (prune + rebuild over all views)
//!            ├─ orphan relationships
//!            └─ LoadingOutput { graphs, diagnostics }
//! ```
//!
//! ## Example
//!
//! ```
//! use symgraph_graph::{GraphCollector, GraphRole};
//! use symgraph_model::{Module, Platform, SymbolGraph};
//!
//! let graph = SymbolGraph::new(Module::new("Kit", Platform::for_os("macosx")));
//! let mut collector = GraphCollector::new();
//! collector.merge_graph(&graph, "Kit.symbols.json", &GraphRole::Main);
//!
//! let output = collector.finish_loading(true, None);
//! assert!(output.graphs.contains_key("Kit"));
//! ```

mod collector;
mod config;
mod declaration;
mod error;
mod graph;
mod overloads;
mod selector;
mod symbol;

pub use collector::{Diagnostic, GraphCollector, GraphRole, LoadingOutput};
pub use config::{CollectorConfig, ExtensionGraphAssociation};
pub use declaration::simplify_declaration;
pub use error::{GraphError, Result};
pub use graph::{RelationshipGroup, UnifiedGraph, OVERLOAD_GROUP_SUFFIX};
pub use overloads::{
    create_overload_groups, create_single_graph_overload_groups, is_overload_group_identifier,
    overload_group_identifier,
};
pub use selector::Selector;
pub use symbol::UnifiedSymbol;
