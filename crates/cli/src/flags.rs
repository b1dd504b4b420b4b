use clap::ValueEnum;
use symgraph_graph::ExtensionGraphAssociation;

#[derive(Copy, Clone, Debug, ValueEnum)]
pub(crate) enum ExtensionAssociationFlag {
    /// Merge `X@Y` graphs into module `Y`
    Extended,
    /// Merge `X@Y` graphs into module `X`
    Extending,
}

impl ExtensionAssociationFlag {
    pub(crate) const fn as_domain(self) -> ExtensionGraphAssociation {
        match self {
            ExtensionAssociationFlag::Extended => ExtensionGraphAssociation::ExtendedGraph,
            ExtensionAssociationFlag::Extending => ExtensionGraphAssociation::ExtendingGraph,
        }
    }
}
