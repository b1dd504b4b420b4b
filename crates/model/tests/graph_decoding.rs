//! Tests for decoding and encoding whole symbol graphs

use pretty_assertions::assert_eq;
use symgraph_model::{
    DecodeContext, KindIdentifier, KindRegistry, Mixin, MixinRegistry, RelationshipKind,
    SymbolGraph,
};

const GRAPH: &str = r#"{
  "metadata": {
    "formatVersion": {"major": 0, "minor": 6, "patch": 0},
    "generator": "swift-symbolgraph-extract"
  },
  "module": {
    "name": "Shapes",
    "platform": {
      "architecture": "arm64",
      "vendor": "apple",
      "operatingSystem": {"name": "macosx", "minimumVersion": {"major": 13}}
    }
  },
  "symbols": [
    {
      "identifier": {"precise": "s:6Shapes6CircleV", "interfaceLanguage": "swift"},
      "kind": {"identifier": "swift.struct", "displayName": "Structure"},
      "pathComponents": ["Circle"],
      "names": {"title": "Circle", "navigator": [{"kind": "identifier", "spelling": "Circle"}]},
      "docComment": {"lines": [{"text": "A round shape."}]},
      "accessLevel": "public",
      "declarationFragments": [
        {"kind": "keyword", "spelling": "struct"},
        {"kind": "text", "spelling": " "},
        {"kind": "identifier", "spelling": "Circle"}
      ],
      "swiftGenerics": {"parameters": [{"name": "T", "index": 0, "depth": 0}]}
    },
    {
      "identifier": {"precise": "s:6Shapes6CircleV4areaSdvp", "interfaceLanguage": "swift"},
      "kind": {"identifier": "swift.property", "displayName": "Instance Property"},
      "pathComponents": ["Circle", "area"],
      "names": {"title": "area"},
      "accessLevel": "public",
      "isReadOnly": true,
      "availability": [
        {"domain": "macOS", "introduced": {"major": 13, "minor": 0}, "deprecated": {"major": 14}}
      ]
    },
    {
      "identifier": {"precise": "s:6Shapes6CircleV5scaleyySdF", "interfaceLanguage": "swift"},
      "kind": {"identifier": "shapes.transform", "displayName": "Transform"},
      "pathComponents": ["Circle", "scale(_:)"],
      "names": {"title": "scale(_:)"},
      "accessLevel": "public"
    }
  ],
  "relationships": [
    {"source": "s:6Shapes6CircleV4areaSdvp", "target": "s:6Shapes6CircleV", "kind": "memberOf"},
    {"source": "s:6Shapes6CircleV", "target": "s:SQ", "kind": "conformsTo",
     "targetFallback": "Swift.Equatable",
     "swiftConstraints": [{"kind": "conformance", "lhs": "T", "rhs": "Equatable"}]}
  ]
}"#;

fn decode(ctx: &DecodeContext) -> SymbolGraph {
    SymbolGraph::from_json(GRAPH, ctx).expect("graph decodes")
}

#[test]
fn decodes_module_symbols_and_relationships() {
    let graph = decode(&DecodeContext::default());

    assert_eq!(graph.module.name, "Shapes");
    assert_eq!(graph.module.platform.name().as_deref(), Some("macOS"));
    assert_eq!(graph.metadata.generator, "swift-symbolgraph-extract");
    assert_eq!(graph.symbols.len(), 3);
    assert_eq!(graph.relationships.len(), 2);

    let area = &graph.symbols["s:6Shapes6CircleV4areaSdvp"];
    assert_eq!(area.kind.identifier, KindIdentifier::Property);
    assert_eq!(area.mixins.get("isReadOnly"), Some(&Mixin::IsReadOnly(true)));
    assert!(area.mixins.is_deprecated());

    let conformance = &graph.relationships[1];
    assert_eq!(conformance.kind, RelationshipKind::ConformsTo);
    assert_eq!(conformance.target_fallback.as_deref(), Some("Swift.Equatable"));
    assert!(matches!(
        conformance.mixins.get("swiftConstraints"),
        Some(Mixin::Opaque(_))
    ));
}

#[test]
fn custom_kinds_need_registration() {
    let plain = decode(&DecodeContext::default());
    assert_eq!(
        plain.symbols["s:6Shapes6CircleV5scaleyySdF"].kind.identifier,
        KindIdentifier::Unknown("shapes.transform".into())
    );

    let mut kinds = KindRegistry::new();
    kinds.register("shapes.transform");
    let registered = decode(&DecodeContext::new(kinds, MixinRegistry::with_defaults()));
    assert_eq!(
        registered.symbols["s:6Shapes6CircleV5scaleyySdF"].kind.identifier,
        KindIdentifier::Custom("shapes.transform".into())
    );
}

#[test]
fn encoding_preserves_unregistered_mixins() {
    let ctx = DecodeContext::default();
    let graph = decode(&ctx);

    let encoded = graph.to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&encoded).unwrap();
    let circle = value["symbols"]
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["identifier"]["precise"] == "s:6Shapes6CircleV")
        .unwrap();
    assert_eq!(circle["swiftGenerics"]["parameters"][0]["name"], "T");
    assert_eq!(circle["kind"]["identifier"], "swift.struct");

    let reparsed = SymbolGraph::from_json(&encoded, &ctx).unwrap();
    assert_eq!(reparsed, graph);
}

#[test]
fn empty_mixin_registry_keeps_everything_opaque() {
    let ctx = DecodeContext::new(KindRegistry::new(), MixinRegistry::empty());
    let graph = decode(&ctx);
    let circle = &graph.symbols["s:6Shapes6CircleV"];
    assert!(circle.mixins.declaration_fragments().is_none());
    assert!(matches!(
        circle.mixins.get("declarationFragments"),
        Some(Mixin::Opaque(_))
    ));
}
