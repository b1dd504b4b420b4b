use anyhow::{anyhow, Result};
use clap::Parser;
use flags::ExtensionAssociationFlag;
use report::{render_markdown, Report};
use std::path::PathBuf;
use symgraph_graph::{create_single_graph_overload_groups, CollectorConfig, GraphCollector};
use symgraph_model::DecodeContext;

mod flags;
mod input;
mod report;

#[derive(Parser)]
#[command(name = "symgraph")]
#[command(about = "Unify symbol graphs into one graph per module", long_about = None)]
#[command(version)]
struct Cli {
    /// Symbol graph files, or directories scanned for `*.symbols.json`
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Collector configuration (JSON, or TOML with a `.toml` extension)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Module that receives the symbols of `X@Y` extension graphs
    #[arg(long, value_enum)]
    extension_association: Option<ExtensionAssociationFlag>,

    /// Build overload groups after merging
    #[arg(long)]
    overload_groups: bool,

    /// Only build overload groups for this interface language (repeatable)
    #[arg(long = "restrict-language", value_name = "LANG")]
    restrict_languages: Vec<String>,

    /// Also group overloads inside each graph before merging
    #[arg(long)]
    per_graph_overloads: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for JSON)
    #[arg(long)]
    quiet: bool,
}

impl Cli {
    /// Configuration file values with command-line flags applied on top
    fn collector_config(&self) -> Result<CollectorConfig> {
        let mut config = match &self.config {
            Some(path) => input::load_config(path)?,
            None => CollectorConfig::default(),
        };
        if let Some(flag) = self.extension_association {
            config.extension_graph_association_strategy = flag.as_domain();
        }
        if self.overload_groups {
            config.create_overload_groups = true;
        }
        if !self.restrict_languages.is_empty() {
            config.restrict_overload_group_languages =
                Some(self.restrict_languages.iter().cloned().collect());
        }
        config
            .validate()
            .map_err(|err| anyhow!("Invalid configuration: {err}"))?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    let mut cli = Cli::parse();
    if cli.json {
        cli.quiet = true;
    }

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let config = cli.collector_config()?;
    let files = input::discover_graph_files(&cli.inputs)?;
    log::info!("Loading {} symbol graph(s)", files.len());

    let ctx = DecodeContext::default();
    let mut collector = GraphCollector::with_config(config)?;
    for path in &files {
        let mut graph = input::load_graph(path, &ctx)?;
        if cli.per_graph_overloads {
            let groups = create_single_graph_overload_groups(&mut graph);
            log::debug!("{}: {groups} overload group(s)", path.display());
        }
        collector.merge_file_graph(&graph, &path.display().to_string());
    }
    let output = collector.finish();

    let report = Report::from_output(&output);
    if cli.json {
        if cli.pretty {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            println!("{}", serde_json::to_string(&report)?);
        }
    } else {
        print!("{}", render_markdown(&report));
    }

    Ok(())
}
