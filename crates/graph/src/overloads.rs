//! Overload group synthesis.
//!
//! Siblings with the same kind and the same path are overloads. Each family of
//! two or more gets a synthetic group symbol named after its representative,
//! and every member records its position in the family.
//!
//! ```text
//! Widget/draw(in:) ─┐ overloadOf
//! Widget/draw(at:) ─┼────────> <rep>::OverloadGroup ──memberOf──> Widget
//! Widget/draw()    ─┘
//! ```

use crate::declaration::simplify_declaration;
use crate::graph::{UnifiedGraph, OVERLOAD_GROUP_SUFFIX};
use crate::selector::Selector;
use crate::symbol::UnifiedSymbol;
use std::collections::{BTreeMap, BTreeSet};
use symgraph_model::mixin::keys;
use symgraph_model::{
    fragments_text, Fragment, KindIdentifier, Mixin, Mixins, OverloadData, Relationship,
    RelationshipKind, SymbolGraph,
};

/// (language, kind, path components)
type FamilyKey = (String, KindIdentifier, Vec<String>);

/// Identifier of the group anchored on `representative`
pub fn overload_group_identifier(representative: &str) -> String {
    format!("{representative}{OVERLOAD_GROUP_SUFFIX}")
}

pub fn is_overload_group_identifier(id: &str) -> bool {
    id.ends_with(OVERLOAD_GROUP_SUFFIX)
}

/// Ordering key of one family member. Field order is the tie-break order:
/// not deprecated first, then simplified declaration text, then identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Candidate {
    deprecated: bool,
    declaration: String,
    identifier: String,
}

impl Candidate {
    fn new(identifier: &str, deprecated: bool, declaration: Option<&[Fragment]>) -> Self {
        let declaration = declaration
            .map(|fragments| fragments_text(&simplify_declaration(fragments)))
            .unwrap_or_default();
        Self {
            deprecated,
            declaration,
            identifier: identifier.to_string(),
        }
    }
}

fn rank(mut candidates: Vec<Candidate>) -> Vec<Candidate> {
    candidates.sort();
    candidates
}

/// Sources of `defaultImplementationOf` mapped to their targets
fn default_implementations<'a>(
    relationships: impl Iterator<Item = &'a Relationship>,
) -> BTreeMap<String, BTreeSet<String>> {
    let mut map: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for relationship in relationships {
        if relationship.kind == RelationshipKind::DefaultImplementationOf {
            map.entry(relationship.source.clone())
                .or_default()
                .insert(relationship.target.clone());
        }
    }
    map
}

/// Drop members that are the default implementation of another member
fn eligible_members(
    family: &BTreeSet<String>,
    default_impls: &BTreeMap<String, BTreeSet<String>>,
) -> Vec<String> {
    family
        .iter()
        .filter(|member| {
            !default_impls
                .get(*member)
                .is_some_and(|targets| targets.iter().any(|t| family.contains(t)))
        })
        .cloned()
        .collect()
}

fn with_simplified_names(names: &mut symgraph_model::Names, declaration: Option<&[Fragment]>) {
    if let Some(fragments) = declaration {
        let simplified = simplify_declaration(fragments);
        names.navigator = Some(simplified.clone());
        names.sub_heading = Some(simplified);
    }
}

fn overload_data(group: &str, index: usize) -> Mixin {
    Mixin::OverloadData(OverloadData {
        overload_group_identifier: group.to_string(),
        overload_group_index: index,
    })
}

/// Build overload groups for a unified graph.
///
/// Previously synthesized groups in scope (including ones produced per graph
/// before unification) are removed first, then families are recomputed over
/// the union of every view of each language. `languages` restricts the pass to
/// selectors with those interface languages. Returns the number of groups.
pub fn create_overload_groups(
    graph: &mut UnifiedGraph,
    languages: Option<&BTreeSet<String>>,
) -> usize {
    let in_scope = |language: &str| languages.map_or(true, |set| set.contains(language));

    prune_overload_groups(graph, &in_scope);

    let default_impls = default_implementations(graph.all_relationships().into_iter());

    let mut families: BTreeMap<FamilyKey, BTreeSet<String>> = BTreeMap::new();
    for (id, symbol) in &graph.symbols {
        if graph.overload_group_symbols().contains(id) {
            continue;
        }
        let mut claimed = BTreeSet::new();
        for selector in &symbol.main_graph_selectors {
            if !in_scope(&selector.language) || !claimed.insert(selector.language.as_str()) {
                continue;
            }
            let (Some(kind), Some(path)) = (
                symbol.kind.get(selector),
                symbol.path_components.get(selector),
            ) else {
                continue;
            };
            families
                .entry((selector.language.clone(), kind.identifier.clone(), path.clone()))
                .or_default()
                .insert(id.clone());
        }
    }

    let mut created = 0;
    for ((language, _, path), family) in families {
        let members = eligible_members(&family, &default_impls);
        if members.len() < 2 {
            continue;
        }
        let ranked = rank(
            members
                .iter()
                .filter_map(|id| graph.symbols.get(id))
                .map(|symbol| unified_candidate(symbol, &language))
                .collect(),
        );
        let group_id = apply_unified_group(graph, &language, &ranked);
        log::debug!(
            "Overload group `{group_id}` for {} ({} members)",
            path.join("/"),
            ranked.len()
        );
        created += 1;
    }
    created
}

fn unified_candidate(symbol: &UnifiedSymbol, language: &str) -> Candidate {
    let main: Vec<&Selector> = symbol
        .main_graph_selectors
        .iter()
        .filter(|s| s.language == language)
        .collect();
    let deprecated = main
        .iter()
        .any(|s| symbol.mixins.get(*s).is_some_and(Mixins::is_deprecated));
    let declaration = main
        .iter()
        .find_map(|s| symbol.mixins.get(*s)?.declaration_fragments());
    Candidate::new(&symbol.unique_identifier, deprecated, declaration)
}

fn prune_overload_groups(graph: &mut UnifiedGraph, in_scope: &impl Fn(&str) -> bool) {
    let groups: BTreeSet<String> = graph.overload_group_symbols().clone();
    for id in &groups {
        let Some(symbol) = graph.symbols.get_mut(id) else {
            graph.overload_groups_mut().remove(id);
            continue;
        };
        let stale: Vec<Selector> = symbol
            .selectors()
            .filter(|s| in_scope(&s.language))
            .cloned()
            .collect();
        for selector in &stale {
            symbol.remove_selector(selector);
        }
        if symbol.is_empty() {
            graph.symbols.remove(id);
            graph.overload_groups_mut().remove(id);
        }
    }

    graph.remove_relationships(|selector, relationship| {
        in_scope(&selector.language)
            && (relationship.kind == RelationshipKind::OverloadOf
                || groups.contains(&relationship.source)
                || groups.contains(&relationship.target))
    });

    for symbol in graph.symbols.values_mut() {
        for (selector, mixins) in symbol.mixins.iter_mut() {
            if in_scope(&selector.language) {
                mixins.remove(keys::OVERLOAD_DATA);
            }
        }
    }
}

fn apply_unified_group(graph: &mut UnifiedGraph, language: &str, ranked: &[Candidate]) -> String {
    let representative = ranked[0].identifier.clone();
    let group_id = overload_group_identifier(&representative);

    let mut group = UnifiedSymbol::new(group_id.clone());
    if let Some(rep) = graph.symbols.get(&representative) {
        for selector in rep.selectors().filter(|s| s.language == language) {
            let declaration = rep
                .mixins
                .get(selector)
                .and_then(|m| m.declaration_fragments());
            if let Some(module) = rep.modules.get(selector) {
                group.modules.insert(selector.clone(), module.clone());
            }
            if let Some(kind) = rep.kind.get(selector) {
                group.kind.insert(selector.clone(), kind.clone());
            }
            if let Some(path) = rep.path_components.get(selector) {
                group.path_components.insert(selector.clone(), path.clone());
            }
            if let Some(names) = rep.names.get(selector) {
                let mut names = names.clone();
                with_simplified_names(&mut names, declaration);
                group.names.insert(selector.clone(), names);
            }
            if let Some(access) = rep.access_level.get(selector) {
                group.access_level.insert(selector.clone(), access.clone());
            }
            if let Some(comment) = rep.doc_comment.get(selector) {
                group.doc_comment.insert(selector.clone(), comment.clone());
            }
            let mut mixins = rep.mixins.get(selector).cloned().unwrap_or_default();
            mixins.remove(keys::OVERLOAD_DATA);
            group.mixins.insert(selector.clone(), mixins);
        }
        group.main_graph_selectors = rep
            .main_graph_selectors
            .iter()
            .filter(|s| s.language == language)
            .cloned()
            .collect();
    }

    let structural: Vec<(Selector, Relationship)> = graph
        .relationships_by_selector()
        .filter(|(selector, _)| selector.language == language)
        .flat_map(|(selector, relationships)| {
            relationships
                .into_iter()
                .filter(|r| r.source == representative && r.kind.is_structural())
                .map(|r| {
                    let mut copy = r.clone();
                    copy.source = group_id.clone();
                    (selector.clone(), copy)
                })
                .collect::<Vec<_>>()
        })
        .collect();

    match graph.symbols.get_mut(&group_id) {
        Some(existing) => existing.absorb(group),
        None => {
            graph.symbols.insert(group_id.clone(), group);
        }
    }
    graph.overload_groups_mut().insert(group_id.clone());

    for (index, candidate) in ranked.iter().enumerate() {
        let Some(member) = graph.symbols.get_mut(&candidate.identifier) else {
            continue;
        };
        let selectors: Vec<Selector> = member
            .selectors()
            .filter(|s| s.language == language)
            .cloned()
            .collect();
        for selector in &selectors {
            member
                .mixins
                .entry(selector.clone())
                .or_default()
                .insert(keys::OVERLOAD_DATA, overload_data(&group_id, index));
        }
        for selector in selectors {
            graph.insert_relationship(
                selector,
                Relationship::new(&candidate.identifier, &group_id, RelationshipKind::OverloadOf),
            );
        }
    }

    for (selector, relationship) in structural {
        graph.insert_relationship(selector, relationship);
    }
    group_id
}

/// Build overload groups inside one graph, before unification.
///
/// Existing groups in the graph are replaced. Returns the number of groups.
pub fn create_single_graph_overload_groups(graph: &mut SymbolGraph) -> usize {
    let stale: BTreeSet<String> = graph
        .symbols
        .keys()
        .filter(|id| is_overload_group_identifier(id))
        .cloned()
        .collect();
    graph.symbols.retain(|id, _| !stale.contains(id));
    graph.relationships.retain(|r| {
        r.kind != RelationshipKind::OverloadOf
            && !stale.contains(&r.source)
            && !stale.contains(&r.target)
    });
    for symbol in graph.symbols.values_mut() {
        symbol.mixins.remove(keys::OVERLOAD_DATA);
    }

    let default_impls = default_implementations(graph.relationships.iter());

    let mut families: BTreeMap<FamilyKey, BTreeSet<String>> = BTreeMap::new();
    for (id, symbol) in &graph.symbols {
        families
            .entry((
                symbol.language().to_string(),
                symbol.kind.identifier.clone(),
                symbol.path_components.clone(),
            ))
            .or_default()
            .insert(id.clone());
    }

    let mut created = 0;
    for family in families.values() {
        let members = eligible_members(family, &default_impls);
        if members.len() < 2 {
            continue;
        }
        let ranked = rank(
            members
                .iter()
                .filter_map(|id| graph.symbols.get(id))
                .map(|s| {
                    Candidate::new(
                        s.precise(),
                        s.mixins.is_deprecated(),
                        s.mixins.declaration_fragments(),
                    )
                })
                .collect(),
        );

        let representative = &ranked[0].identifier;
        let group_id = overload_group_identifier(representative);
        let Some(mut group) = graph.symbols.get(representative).cloned() else {
            continue;
        };
        group.identifier.precise = group_id.clone();
        let declaration = group.mixins.declaration_fragments().map(<[Fragment]>::to_vec);
        with_simplified_names(&mut group.names, declaration.as_deref());

        let structural: Vec<Relationship> = graph
            .relationships
            .iter()
            .filter(|r| &r.source == representative && r.kind.is_structural())
            .map(|r| {
                let mut copy = r.clone();
                copy.source = group_id.clone();
                copy
            })
            .collect();
        graph.relationships.extend(structural);

        for (index, candidate) in ranked.iter().enumerate() {
            if let Some(member) = graph.symbols.get_mut(&candidate.identifier) {
                member
                    .mixins
                    .insert(keys::OVERLOAD_DATA, overload_data(&group_id, index));
            }
            graph.relationships.push(Relationship::new(
                &candidate.identifier,
                &group_id,
                RelationshipKind::OverloadOf,
            ));
        }
        graph.add_symbol(group);
        created += 1;
    }
    created
}
