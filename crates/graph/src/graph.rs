use crate::error::{GraphError, Result};
use crate::selector::Selector;
use crate::symbol::UnifiedSymbol;
use std::collections::{BTreeMap, BTreeSet};
use symgraph_model::{Metadata, Module, Relationship, RelationshipKey, SymbolGraph};

/// Suffix of synthesized overload group identifiers
pub const OVERLOAD_GROUP_SUFFIX: &str = "::OverloadGroup";

type RelationshipTable = BTreeMap<Selector, BTreeMap<RelationshipKey, Relationship>>;

/// Relationships declared by exactly the same set of views
#[derive(Debug, Clone, PartialEq)]
pub struct RelationshipGroup {
    pub selectors: BTreeSet<Selector>,
    pub relationships: Vec<Relationship>,
}

/// All views of one module merged together
#[derive(Debug, Clone, PartialEq)]
pub struct UnifiedGraph {
    pub module_name: String,

    /// Module record of every merged source, keyed by source tag
    pub module_data: BTreeMap<String, Module>,

    pub metadata: BTreeMap<String, Metadata>,

    /// Symbols keyed by unique identifier
    pub symbols: BTreeMap<String, UnifiedSymbol>,

    relationships: RelationshipTable,
    orphans: RelationshipTable,
    overload_groups: BTreeSet<String>,
}

impl UnifiedGraph {
    pub fn new(module_name: impl Into<String>) -> Self {
        Self {
            module_name: module_name.into(),
            module_data: BTreeMap::new(),
            metadata: BTreeMap::new(),
            symbols: BTreeMap::new(),
            relationships: BTreeMap::new(),
            orphans: BTreeMap::new(),
            overload_groups: BTreeSet::new(),
        }
    }

    /// Fold one graph into this one.
    ///
    /// Symbols whose identifier disagrees with their graph key are skipped and
    /// reported; the rest of the graph is still merged.
    pub fn merge_graph(
        &mut self,
        graph: &SymbolGraph,
        source: &str,
        is_main_graph: bool,
    ) -> Vec<GraphError> {
        let mut errors = Vec::new();
        self.module_data
            .insert(source.to_string(), graph.module.clone());
        self.metadata
            .insert(source.to_string(), graph.metadata.clone());

        let mut symbol_selectors: BTreeMap<&str, Selector> = BTreeMap::new();
        for (id, symbol) in &graph.symbols {
            let selector = Selector::for_symbol(symbol, &graph.module);
            let unified = self
                .symbols
                .entry(id.clone())
                .or_insert_with(|| UnifiedSymbol::new(id.clone()));
            match unified.merge_symbol(symbol, selector.clone(), &graph.module, is_main_graph) {
                Ok(()) => {
                    symbol_selectors.insert(id.as_str(), selector);
                    if id.ends_with(OVERLOAD_GROUP_SUFFIX) {
                        self.overload_groups.insert(id.clone());
                    }
                }
                Err(err) => {
                    log::warn!("Skipping symbol `{id}` from `{source}`: {err}");
                    if unified.is_empty() {
                        self.symbols.remove(id);
                    }
                    errors.push(err);
                }
            }
        }

        let graph_selectors: BTreeSet<Selector> = symbol_selectors.values().cloned().collect();
        for relationship in &graph.relationships {
            let selectors: Vec<Selector> = match symbol_selectors
                .get(relationship.source.as_str())
                .or_else(|| symbol_selectors.get(relationship.target.as_str()))
            {
                Some(selector) => vec![selector.clone()],
                None => graph_selectors.iter().cloned().collect(),
            };
            if selectors.is_empty() {
                log::debug!(
                    "Dropping relationship {} -> {} from `{source}`: graph has no symbols",
                    relationship.source,
                    relationship.target
                );
            }
            for selector in selectors {
                self.insert_relationship(selector, relationship.clone());
            }
        }

        log::debug!(
            "Merged `{source}` into `{}`: {} symbols, {} relationships",
            self.module_name,
            graph.symbols.len(),
            graph.relationships.len()
        );
        errors
    }

    /// Add a relationship under `selector`; an existing one with the same
    /// endpoints and kind takes over the new mixins
    pub fn insert_relationship(&mut self, selector: Selector, relationship: Relationship) {
        let table = self.relationships.entry(selector).or_default();
        match table.get_mut(&relationship.key()) {
            Some(existing) => {
                for (key, mixin) in relationship.mixins {
                    existing.mixins.insert(key, mixin);
                }
            }
            None => {
                table.insert(relationship.key(), relationship);
            }
        }
    }

    /// Remove every relationship matching `predicate`, in all views
    pub fn remove_relationships(
        &mut self,
        mut predicate: impl FnMut(&Selector, &Relationship) -> bool,
    ) {
        for (selector, table) in self.relationships.iter_mut() {
            table.retain(|_, relationship| !predicate(selector, relationship));
        }
        self.relationships.retain(|_, table| !table.is_empty());
    }

    /// Move relationships with no known endpoint into the orphan set.
    ///
    /// Safe to call repeatedly: earlier orphans are reconsidered first.
    pub fn collect_orphans(&mut self) {
        for (selector, table) in std::mem::take(&mut self.orphans) {
            for (_, relationship) in table {
                self.insert_relationship(selector.clone(), relationship);
            }
        }

        let symbols = &self.symbols;
        let mut orphans: RelationshipTable = BTreeMap::new();
        for (selector, table) in self.relationships.iter_mut() {
            let keys: Vec<RelationshipKey> = table
                .iter()
                .filter(|(_, r)| {
                    !symbols.contains_key(&r.source) && !symbols.contains_key(&r.target)
                })
                .map(|(key, _)| key.clone())
                .collect();
            for key in keys {
                if let Some(relationship) = table.remove(&key) {
                    orphans
                        .entry(selector.clone())
                        .or_default()
                        .insert(key, relationship);
                }
            }
        }
        self.relationships.retain(|_, table| !table.is_empty());
        self.orphans = orphans;
    }

    /// Relationships recorded under each view
    pub fn relationships_by_selector(
        &self,
    ) -> impl Iterator<Item = (&Selector, Vec<&Relationship>)> {
        self.relationships
            .iter()
            .map(|(selector, table)| (selector, table.values().collect()))
    }

    pub fn relationships_for(&self, selector: &Selector) -> Vec<&Relationship> {
        self.relationships
            .get(selector)
            .map(|table| table.values().collect())
            .unwrap_or_default()
    }

    /// Every distinct relationship, regardless of view
    pub fn all_relationships(&self) -> Vec<&Relationship> {
        let mut seen: BTreeMap<RelationshipKey, &Relationship> = BTreeMap::new();
        for table in self.relationships.values() {
            for (key, relationship) in table {
                seen.entry(key.clone()).or_insert(relationship);
            }
        }
        seen.into_values().collect()
    }

    /// Relationships partitioned by the exact set of views that declared them
    pub fn relationship_groups(&self) -> Vec<RelationshipGroup> {
        let mut declared: BTreeMap<&RelationshipKey, Vec<(&Relationship, BTreeSet<Selector>)>> =
            BTreeMap::new();
        for (selector, table) in &self.relationships {
            for (key, relationship) in table {
                let variants = declared.entry(key).or_default();
                match variants.iter_mut().find(|(r, _)| *r == relationship) {
                    Some((_, selectors)) => {
                        selectors.insert(selector.clone());
                    }
                    None => variants.push((relationship, BTreeSet::from([selector.clone()]))),
                }
            }
        }

        let mut groups: BTreeMap<BTreeSet<Selector>, Vec<Relationship>> = BTreeMap::new();
        for variants in declared.into_values() {
            for (relationship, selectors) in variants {
                groups
                    .entry(selectors)
                    .or_default()
                    .push(relationship.clone());
            }
        }
        groups
            .into_iter()
            .map(|(selectors, relationships)| RelationshipGroup {
                selectors,
                relationships,
            })
            .collect()
    }

    /// Relationships whose endpoints both failed to resolve, deduplicated
    pub fn orphan_relationships(&self) -> Vec<&Relationship> {
        let mut seen: BTreeMap<&RelationshipKey, &Relationship> = BTreeMap::new();
        for table in self.orphans.values() {
            for (key, relationship) in table {
                seen.entry(key).or_insert(relationship);
            }
        }
        seen.into_values().collect()
    }

    /// Identifiers of synthesized overload group symbols
    pub fn overload_group_symbols(&self) -> &BTreeSet<String> {
        &self.overload_groups
    }

    pub(crate) fn overload_groups_mut(&mut self) -> &mut BTreeSet<String> {
        &mut self.overload_groups
    }

    pub fn symbol(&self, id: &str) -> Option<&UnifiedSymbol> {
        self.symbols.get(id)
    }

    /// Every selector any symbol appears under
    pub fn selectors(&self) -> BTreeSet<Selector> {
        self.symbols
            .values()
            .flat_map(|symbol| symbol.selectors().cloned())
            .collect()
    }
}

/// Merge a single graph into a fresh unified graph named after its module
impl TryFrom<&SymbolGraph> for UnifiedGraph {
    type Error = GraphError;

    fn try_from(graph: &SymbolGraph) -> Result<Self> {
        let mut unified = Self::new(graph.module.name.clone());
        let mut errors = unified.merge_graph(graph, &graph.module.name, true);
        match errors.pop() {
            Some(err) => Err(err),
            None => Ok(unified),
        }
    }
}
