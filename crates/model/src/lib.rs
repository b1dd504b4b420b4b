//! # Symbol Graph Model
//!
//! Records of a single symbol graph: the public API surface of one module as
//! seen by one platform and one interface language.
//!
//! ## Architecture
//!
//! ```text
//! *.symbols.json
//!     │
//!     ├──> DecodeContext
//!     │      ├─ KindRegistry   (kind strings → KindIdentifier)
//!     │      └─ MixinRegistry  (extension keys → typed Mixin)
//!     │
//!     └──> SymbolGraph
//!            ├─ Module (name, platform)
//!            ├─ Symbols (identifier, kind, path, names, docs, mixins)
//!            └─ Relationships (source → target, kind)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use symgraph_model::{DecodeContext, KindIdentifier, SymbolGraph};
//!
//! let json = r#"{
//!   "module": {"name": "Demo", "platform": {"operatingSystem": {"name": "macosx"}}},
//!   "symbols": [{
//!     "identifier": {"precise": "s:4Demo3runyyF", "interfaceLanguage": "swift"},
//!     "kind": {"identifier": "swift.func", "displayName": "Function"},
//!     "pathComponents": ["run()"],
//!     "names": {"title": "run()"},
//!     "accessLevel": "public"
//!   }],
//!   "relationships": []
//! }"#;
//!
//! let graph = SymbolGraph::from_json(json, &DecodeContext::default()).unwrap();
//! assert_eq!(graph.module.platform.name().as_deref(), Some("macOS"));
//! assert_eq!(graph.symbols["s:4Demo3runyyF"].kind.identifier, KindIdentifier::Func);
//! ```

mod error;
mod fragment;
mod graph;
mod kind;
pub mod mixin;
mod relationship;
mod symbol;
mod version;

pub use error::{ModelError, Result};
pub use fragment::{fragments_text, Fragment, FragmentKind};
pub use graph::{Metadata, Module, OperatingSystem, Platform, SymbolGraph};
pub use kind::{Kind, KindIdentifier, KindRegistry};
pub use mixin::{
    AvailabilityItem, GenericConstraint, Location, Mixin, MixinDecoder, MixinRegistry, Mixins,
    OverloadData, SwiftExtension,
};
pub use relationship::{Relationship, RelationshipKey, RelationshipKind};
pub use symbol::{DocComment, Identifier, LineText, Names, Position, SourceRange, Symbol};
pub use version::SemanticVersion;

/// Registries used while decoding graphs in one session
#[derive(Debug, Clone, Default)]
pub struct DecodeContext {
    pub kinds: KindRegistry,
    pub mixins: MixinRegistry,
}

impl DecodeContext {
    pub fn new(kinds: KindRegistry, mixins: MixinRegistry) -> Self {
        Self { kinds, mixins }
    }
}
