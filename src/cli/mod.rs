use std::collections::HashSet;
use std::env;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use crate::config::resolve::load_settings_with_override;
use crate::config::Settings;
use crate::core::unit::SourceTarget;
use crate::error::{AptdepsError, Result};
use crate::fetch::{source_spec, AptSourceFetcher, DryRunFetcher, Fetcher};
use crate::graph::builder::GraphBuilder;
use crate::graph::traverse::{dependency_names, Traversal, TreeEntry};
use crate::graph::viz;
use crate::metadata::{provider_for, MetadataProvider, ProviderKind};
use crate::util::interrupt::Interrupt;
use crate::util::{logging, output};

#[derive(Parser, Debug)]
#[command(name = "aptdeps")]
#[command(about = "Explore package dependency graphs and fetch their sources", long_about = None)]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
    /// Read metadata from a Packages index instead of apt-cache.
    #[arg(long, global = true)]
    pub packages_file: Option<PathBuf>,
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
    #[arg(long, global = true)]
    pub debug: bool,
    #[arg(short, long, global = true)]
    pub quiet: bool,
    #[arg(long, global = true)]
    pub no_color: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Depends(DependsArgs),
    Source(SourceArgs),
}

#[derive(Args, Debug)]
pub struct DependsArgs {
    #[arg(required = true)]
    pub packages: Vec<String>,
    #[arg(short = 't', long, conflicts_with = "format")]
    pub tree: bool,
    #[arg(long, default_value = "flat")]
    pub format: String,
    /// Only show direct dependencies.
    #[arg(long)]
    pub no_deps: bool,
}

#[derive(Args, Debug)]
pub struct SourceArgs {
    #[arg(required = true)]
    pub packages: Vec<String>,
    /// Only fetch the packages' own source groups.
    #[arg(long)]
    pub no_deps: bool,
    #[arg(long)]
    pub dry_run: bool,
    #[arg(short = 'y', long)]
    pub yes: bool,
    #[arg(long)]
    pub pin_versions: bool,
    #[arg(short = 'd', long)]
    pub dest: Option<PathBuf>,
}

pub fn run() {
    let cli = Cli::parse();
    if cli.no_color {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }
    logging::init(cli.verbose, cli.debug, cli.quiet, !cli.no_color);
    output::set_quiet(cli.quiet);

    let interrupt = match Interrupt::install() {
        Ok(interrupt) => interrupt,
        Err(err) => {
            tracing::warn!("failed to install Ctrl-C handler: {err}");
            Interrupt::new()
        }
    };

    if let Err(err) = dispatch(cli, &interrupt) {
        output::error(&err.to_string());
        std::process::exit(err.exit_code());
    }
}

fn dispatch(cli: Cli, interrupt: &Interrupt) -> Result<()> {
    let mut settings = load_settings_with_override(env::current_dir()?, cli.config)?;
    if let Some(path) = cli.packages_file {
        settings.metadata.packages_file = Some(path);
    }

    match cli.command {
        Commands::Depends(args) => handle_depends(args, &settings, interrupt),
        Commands::Source(args) => handle_source(args, settings, interrupt),
    }
}

fn load_builder(settings: &Settings) -> Result<GraphBuilder<Box<dyn MetadataProvider>>> {
    let kind = ProviderKind::from_config(&settings.metadata);
    let provider = provider_for(&kind)?;
    tracing::debug!(provider = provider.id(), "metadata provider ready");
    Ok(GraphBuilder::with_fields(
        provider,
        settings.metadata.fields.clone(),
    ))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Flat,
    Tree,
    Dot,
    Json,
}

fn parse_output_format(input: &str) -> Result<OutputFormat> {
    match input.to_ascii_lowercase().as_str() {
        "flat" => Ok(OutputFormat::Flat),
        "tree" => Ok(OutputFormat::Tree),
        "dot" => Ok(OutputFormat::Dot),
        "json" => Ok(OutputFormat::Json),
        _ => Err(AptdepsError::InvalidArguments(format!(
            "unknown output format '{}'",
            input
        ))),
    }
}

#[derive(Serialize)]
struct DependsJson {
    package: String,
    found: bool,
    dependencies: Vec<String>,
    tree: Vec<TreeEntry>,
}

fn handle_depends(args: DependsArgs, settings: &Settings, interrupt: &Interrupt) -> Result<()> {
    let format = if args.tree {
        OutputFormat::Tree
    } else {
        parse_output_format(&args.format)?
    };
    let mut builder = load_builder(settings)?;
    let total = args.packages.len();
    let mut reports = Vec::new();

    for (idx, package) in args.packages.iter().enumerate() {
        interrupt.check()?;
        let mut traversal = Traversal::new(&mut builder);
        match format {
            OutputFormat::Flat => {
                println!("Package: {}", package);
                let deps = if args.no_deps {
                    traversal.direct_dependencies(package)
                } else {
                    traversal.list_dependencies(package)
                };
                print!("{}", viz::render_flat(&deps, &settings.render));
            }
            OutputFormat::Tree => {
                println!("Package: {}", package);
                let entries = tree_entries(&mut traversal, package, args.no_deps);
                print!("{}", viz::render_tree(&entries, &settings.render));
            }
            OutputFormat::Dot => {
                builder.resolve_node(package);
                print!("{}", viz::render_dot(builder.graph(), package, !args.no_deps));
            }
            OutputFormat::Json => {
                let walk = traversal.walk(package);
                let found = walk.is_some();
                let mut tree = walk.unwrap_or_default();
                let dependencies = dependency_names(&tree, args.no_deps);
                if args.no_deps {
                    tree.retain(|entry| entry.depth == 1);
                }
                reports.push(DependsJson {
                    package: package.clone(),
                    found,
                    dependencies,
                    tree,
                });
            }
        }
        output::progress(idx + 1, total);
    }
    tracing::debug!(units = builder.graph().len(), "dependency graph size");

    if format == OutputFormat::Json {
        println!(
            "{}",
            serde_json::to_string_pretty(&reports)
                .map_err(|err| AptdepsError::Other(anyhow::Error::new(err)))?
        );
    }
    Ok(())
}

fn tree_entries<P: MetadataProvider>(
    traversal: &mut Traversal<'_, P>,
    package: &str,
    direct_only: bool,
) -> Vec<TreeEntry> {
    let entries = traversal.walk(package).unwrap_or_default();
    if direct_only {
        entries.into_iter().filter(|entry| entry.depth == 1).collect()
    } else {
        entries
    }
}

fn handle_source(args: SourceArgs, mut settings: Settings, interrupt: &Interrupt) -> Result<()> {
    if let Some(dest) = args.dest {
        settings.fetch.dest = dest;
    }
    let pin_versions = args.pin_versions || settings.fetch.pin_versions;
    let fetcher: Box<dyn Fetcher> = if args.dry_run {
        Box::new(DryRunFetcher::new())
    } else {
        Box::new(AptSourceFetcher::new(
            settings.fetch.command.clone(),
            settings.fetch.dest.clone(),
        ))
    };

    let mut builder = load_builder(&settings)?;
    let total = args.packages.len();
    let mut fetched: HashSet<String> = HashSet::new();

    for (idx, package) in args.packages.iter().enumerate() {
        interrupt.check()?;
        println!("Package: {}", package);
        let mut traversal = Traversal::new(&mut builder);
        let mut targets: Vec<SourceTarget> = if args.no_deps {
            traversal.own_source_target(package).into_iter().collect()
        } else {
            traversal.resolve_source_targets(package)
        };
        targets.sort_by(|a, b| a.name.cmp(&b.name));
        targets.retain(|target| {
            let fresh = !fetched.contains(&target.name);
            if !fresh {
                tracing::info!("source package '{}' already fetched", target.name);
            }
            fresh
        });

        if targets.is_empty() {
            output::progress(idx + 1, total);
            continue;
        }

        for target in &targets {
            println!("  {}", target.name);
        }

        let prompt = format!(
            "Download {} source package(s) for {}?",
            targets.len(),
            package
        );
        let proceed = output::confirm(&prompt, args.yes || args.dry_run)
            .map_err(|err| AptdepsError::Other(anyhow::Error::new(err)))?;
        if !proceed {
            output::warn(&format!("skipping sources for {}", package));
            output::progress(idx + 1, total);
            continue;
        }

        for target in targets {
            let version = if pin_versions {
                target.version.as_deref()
            } else {
                None
            };
            output::fetch_op(&source_spec(&target.name, version), args.dry_run);
            fetcher
                .materialize(&target.name, version)
                .map_err(|source| {
                    // Ctrl-C from a terminal also reaches the fetch command.
                    if interrupt.is_triggered() {
                        AptdepsError::Interrupted
                    } else {
                        AptdepsError::Fetch {
                            group: target.name.clone(),
                            source,
                        }
                    }
                })?;
            fetched.insert(target.name);
        }
        output::progress(idx + 1, total);
    }

    Ok(())
}
