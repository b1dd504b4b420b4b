use serde::Serialize;
use symgraph_graph::{Diagnostic, LoadingOutput, UnifiedGraph};

#[derive(Debug, Serialize)]
pub struct Report {
    pub modules: Vec<ModuleReport>,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Serialize)]
pub struct ModuleReport {
    pub name: String,
    pub symbols: usize,
    pub selectors: Vec<String>,
    pub relationship_groups: Vec<RelationshipGroupSummary>,
    pub orphans: usize,
    pub overload_groups: Vec<String>,
    pub sources: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct RelationshipGroupSummary {
    pub selectors: Vec<String>,
    pub relationships: usize,
}

impl Report {
    pub fn from_output(output: &LoadingOutput) -> Self {
        Self {
            modules: output.graphs.values().map(ModuleReport::from_graph).collect(),
            diagnostics: output.diagnostics.clone(),
        }
    }
}

impl ModuleReport {
    fn from_graph(graph: &UnifiedGraph) -> Self {
        Self {
            name: graph.module_name.clone(),
            symbols: graph.symbols.len(),
            selectors: graph.selectors().iter().map(ToString::to_string).collect(),
            relationship_groups: graph
                .relationship_groups()
                .into_iter()
                .map(|group| RelationshipGroupSummary {
                    selectors: group.selectors.iter().map(ToString::to_string).collect(),
                    relationships: group.relationships.len(),
                })
                .collect(),
            orphans: graph.orphan_relationships().len(),
            overload_groups: graph.overload_group_symbols().iter().cloned().collect(),
            sources: graph.module_data.keys().cloned().collect(),
        }
    }
}

pub fn render_markdown(report: &Report) -> String {
    let mut md = String::new();
    md.push_str("# Symbol graph report\n\n");
    md.push_str(&format!("- Modules: `{}`\n", report.modules.len()));
    md.push_str(&format!("- Diagnostics: `{}`\n\n", report.diagnostics.len()));

    for module in &report.modules {
        md.push_str(&format!("## {}\n\n", module.name));
        md.push_str(&format!("- Symbols: `{}`\n", module.symbols));
        md.push_str(&format!("- Views: `{}`\n", module.selectors.join("`, `")));
        md.push_str(&format!("- Orphan relationships: `{}`\n", module.orphans));
        md.push_str(&format!("- Overload groups: `{}`\n", module.overload_groups.len()));
        md.push_str(&format!("- Sources: `{}`\n\n", module.sources.len()));

        if !module.relationship_groups.is_empty() {
            md.push_str("| views | relationships |\n");
            md.push_str("|---|---:|\n");
            for group in &module.relationship_groups {
                md.push_str(&format!(
                    "| `{}` | `{}` |\n",
                    group.selectors.join("`, `"),
                    group.relationships
                ));
            }
            md.push('\n');
        }
    }

    if !report.diagnostics.is_empty() {
        md.push_str("## Diagnostics\n\n");
        for diagnostic in &report.diagnostics {
            md.push_str(&format!("- {diagnostic}\n"));
        }
        md.push('\n');
    }

    md
}
