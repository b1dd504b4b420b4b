use crate::error::{GraphError, Result};
use crate::selector::Selector;
use std::collections::{BTreeMap, BTreeSet};
use symgraph_model::{DocComment, Kind, Mixins, Module, Names, Symbol};

/// A symbol merged from every graph that mentions its identifier.
///
/// Fields that may differ between views are tables keyed by [`Selector`]; a
/// missing selector means the symbol does not appear in that view.
#[derive(Debug, Clone, PartialEq)]
pub struct UnifiedSymbol {
    pub unique_identifier: String,

    /// Views in which the symbol came from a main graph of its module
    pub main_graph_selectors: BTreeSet<Selector>,

    pub modules: BTreeMap<Selector, Module>,
    pub kind: BTreeMap<Selector, Kind>,
    pub path_components: BTreeMap<Selector, Vec<String>>,
    pub names: BTreeMap<Selector, Names>,
    pub access_level: BTreeMap<Selector, String>,
    pub doc_comment: BTreeMap<Selector, DocComment>,
    pub mixins: BTreeMap<Selector, Mixins>,
}

impl UnifiedSymbol {
    /// Empty symbol; populated by [`UnifiedSymbol::merge_symbol`]
    pub fn new(unique_identifier: impl Into<String>) -> Self {
        Self {
            unique_identifier: unique_identifier.into(),
            main_graph_selectors: BTreeSet::new(),
            modules: BTreeMap::new(),
            kind: BTreeMap::new(),
            path_components: BTreeMap::new(),
            names: BTreeMap::new(),
            access_level: BTreeMap::new(),
            doc_comment: BTreeMap::new(),
            mixins: BTreeMap::new(),
        }
    }

    /// Build a symbol from its first sighting
    pub fn from_symbol(
        symbol: &Symbol,
        selector: Selector,
        module: &Module,
        is_main_graph: bool,
    ) -> Self {
        let mut unified = Self::new(symbol.precise());
        unified.write(symbol, selector, module, is_main_graph, false);
        unified
    }

    /// Record `symbol` under `selector`.
    ///
    /// Only the slots of `selector` change. Data from a main graph replaces
    /// what is there; data from an extension graph only fills slots a main
    /// graph has not written for the same selector.
    pub fn merge_symbol(
        &mut self,
        symbol: &Symbol,
        selector: Selector,
        module: &Module,
        is_main_graph: bool,
    ) -> Result<()> {
        if symbol.precise() != self.unique_identifier {
            return Err(GraphError::identifier_mismatch(
                &self.unique_identifier,
                symbol.precise(),
            ));
        }
        let fill_only = !is_main_graph && self.main_graph_selectors.contains(&selector);
        self.write(symbol, selector, module, is_main_graph, fill_only);
        Ok(())
    }

    fn write(
        &mut self,
        symbol: &Symbol,
        selector: Selector,
        module: &Module,
        is_main_graph: bool,
        fill_only: bool,
    ) {
        if is_main_graph {
            self.main_graph_selectors.insert(selector.clone());
        }

        let mixins = self.mixins.entry(selector.clone()).or_default();
        for (key, mixin) in symbol.mixins.iter() {
            if !fill_only || !mixins.contains_key(key) {
                mixins.insert(key.clone(), mixin.clone());
            }
        }

        if let Some(comment) = &symbol.doc_comment {
            if !fill_only || !self.doc_comment.contains_key(&selector) {
                self.doc_comment.insert(selector.clone(), comment.clone());
            }
        }

        if fill_only {
            self.modules
                .entry(selector.clone())
                .or_insert_with(|| module.clone());
            self.kind
                .entry(selector.clone())
                .or_insert_with(|| symbol.kind.clone());
            self.path_components
                .entry(selector.clone())
                .or_insert_with(|| symbol.path_components.clone());
            self.names
                .entry(selector.clone())
                .or_insert_with(|| symbol.names.clone());
            self.access_level
                .entry(selector)
                .or_insert_with(|| symbol.access_level.clone());
        } else {
            self.modules.insert(selector.clone(), module.clone());
            self.kind.insert(selector.clone(), symbol.kind.clone());
            self.path_components
                .insert(selector.clone(), symbol.path_components.clone());
            self.names.insert(selector.clone(), symbol.names.clone());
            self.access_level
                .insert(selector, symbol.access_level.clone());
        }
    }

    /// Every selector the symbol appears under
    pub fn selectors(&self) -> impl Iterator<Item = &Selector> {
        self.kind.keys()
    }

    pub fn is_in_main_graph(&self) -> bool {
        !self.main_graph_selectors.is_empty()
    }

    /// Selector used when a caller asks for "the" value of a field:
    /// the first main-graph selector, else the first selector at all
    pub fn default_selector(&self) -> Option<&Selector> {
        self.main_graph_selectors
            .iter()
            .next()
            .or_else(|| self.kind.keys().next())
    }

    pub fn default_names(&self) -> Option<&Names> {
        self.default_selector().and_then(|s| self.names.get(s))
    }

    /// Distinct doc comments with the selectors that carry each one.
    ///
    /// A comment shared by several views is listed once, with all of them.
    pub fn doc_comment_groups(&self) -> Vec<(&DocComment, Vec<&Selector>)> {
        let mut groups: Vec<(&DocComment, Vec<&Selector>)> = Vec::new();
        for (selector, comment) in &self.doc_comment {
            match groups.iter_mut().find(|(existing, _)| *existing == comment) {
                Some((_, selectors)) => selectors.push(selector),
                None => groups.push((comment, vec![selector])),
            }
        }
        groups
    }

    /// Drop every slot recorded under `selector`
    pub fn remove_selector(&mut self, selector: &Selector) {
        self.main_graph_selectors.remove(selector);
        self.modules.remove(selector);
        self.kind.remove(selector);
        self.path_components.remove(selector);
        self.names.remove(selector);
        self.access_level.remove(selector);
        self.doc_comment.remove(selector);
        self.mixins.remove(selector);
    }

    pub fn is_empty(&self) -> bool {
        self.kind.is_empty()
    }

    /// Take over every slot of `other`; its values win on shared selectors
    pub(crate) fn absorb(&mut self, other: UnifiedSymbol) {
        self.main_graph_selectors.extend(other.main_graph_selectors);
        self.modules.extend(other.modules);
        self.kind.extend(other.kind);
        self.path_components.extend(other.path_components);
        self.names.extend(other.names);
        self.access_level.extend(other.access_level);
        self.doc_comment.extend(other.doc_comment);
        self.mixins.extend(other.mixins);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use symgraph_model::{Identifier, KindIdentifier, Mixin, Platform};

    fn symbol(id: &str, title: &str) -> Symbol {
        Symbol {
            identifier: Identifier {
                precise: id.into(),
                interface_language: "swift".into(),
            },
            kind: Kind::new("swift", KindIdentifier::Method, "Instance Method"),
            path_components: vec!["Widget".into(), title.into()],
            names: Names::titled(title),
            doc_comment: None,
            access_level: "public".into(),
            mixins: Mixins::new(),
        }
    }

    fn module(os: &str) -> Module {
        Module::new("Widgets", Platform::for_os(os))
    }

    fn mac() -> Selector {
        Selector::new("swift", Some("macOS"))
    }

    fn ios() -> Selector {
        Selector::new("swift", Some("iOS"))
    }

    #[test]
    fn merge_only_touches_its_selector() {
        let mut unified =
            UnifiedSymbol::from_symbol(&symbol("s:w", "draw()"), mac(), &module("macosx"), true);
        unified
            .merge_symbol(&symbol("s:w", "draw(in:)"), ios(), &module("ios"), true)
            .unwrap();

        assert_eq!(unified.names[&mac()].title, "draw()");
        assert_eq!(unified.names[&ios()].title, "draw(in:)");
        assert_eq!(unified.main_graph_selectors.len(), 2);
    }

    #[test]
    fn mismatched_identifier_is_an_error() {
        let mut unified =
            UnifiedSymbol::from_symbol(&symbol("s:w", "draw()"), mac(), &module("macosx"), true);
        let err = unified
            .merge_symbol(&symbol("s:other", "draw()"), ios(), &module("ios"), true)
            .unwrap_err();
        assert!(matches!(err, GraphError::IdentifierMismatch { .. }));
        assert!(!unified.kind.contains_key(&ios()));
    }

    #[test]
    fn mixins_merge_by_key() {
        let mut first = symbol("s:w", "draw()");
        first.mixins.insert("spi", Mixin::Spi(true));
        let mut second = symbol("s:w", "draw()");
        second.mixins.insert("isReadOnly", Mixin::IsReadOnly(false));

        let mut unified = UnifiedSymbol::from_symbol(&first, mac(), &module("macosx"), true);
        unified.merge_symbol(&second, mac(), &module("macosx"), true).unwrap();

        let mixins = &unified.mixins[&mac()];
        assert_eq!(mixins.get("spi"), Some(&Mixin::Spi(true)));
        assert_eq!(mixins.get("isReadOnly"), Some(&Mixin::IsReadOnly(false)));
    }

    #[test]
    fn extension_data_does_not_replace_main_data() {
        let main = symbol("s:w", "draw()");
        let mut ext = symbol("s:w", "draw(extension)");
        ext.doc_comment = Some(DocComment::from_lines(["From an extension."]));

        let mut main_first = UnifiedSymbol::from_symbol(&main, mac(), &module("macosx"), true);
        main_first.merge_symbol(&ext, mac(), &module("macosx"), false).unwrap();

        let mut ext_first = UnifiedSymbol::from_symbol(&ext, mac(), &module("macosx"), false);
        ext_first.merge_symbol(&main, mac(), &module("macosx"), true).unwrap();

        assert_eq!(main_first.names[&mac()].title, "draw()");
        assert_eq!(main_first, ext_first);
    }

    #[test]
    fn identical_doc_comments_are_shared() {
        let mut a = symbol("s:w", "draw()");
        a.doc_comment = Some(DocComment::from_lines(["Draws."]));
        let b = a.clone();

        let mut unified = UnifiedSymbol::from_symbol(&a, mac(), &module("macosx"), true);
        unified.merge_symbol(&b, ios(), &module("ios"), true).unwrap();

        assert_eq!(unified.doc_comment[&mac()], unified.doc_comment[&ios()]);
        let groups = unified.doc_comment_groups();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].1, vec![&ios(), &mac()]);
    }

    #[test]
    fn differing_doc_comments_stay_per_selector() {
        let mut a = symbol("s:w", "draw()");
        a.doc_comment = Some(DocComment::from_lines(["Draws."]));
        let mut b = a.clone();
        b.doc_comment = Some(DocComment::from_lines(["Draws on iOS."]));

        let mut unified = UnifiedSymbol::from_symbol(&a, mac(), &module("macosx"), true);
        unified.merge_symbol(&b, ios(), &module("ios"), true).unwrap();

        assert_ne!(unified.doc_comment[&mac()], unified.doc_comment[&ios()]);
        assert_eq!(unified.doc_comment_groups().len(), 2);
    }
}
