//! codemap CLI - analyze a Java project and emit results as JSON.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use codemap::{CodeMapEngine, CodemapConfig, RuleEngine, Severity};

#[derive(Parser)]
#[command(name = "codemap")]
#[command(version, about = "Structural code-graph analysis for Java projects", long_about = None)]
struct Cli {
    /// Project root to analyze
    #[arg(short, long, default_value = ".")]
    project: PathBuf,

    /// Configuration file
    #[arg(long, default_value = "codemap.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Outgoing call graph of a method
    Callgraph {
        /// Method name, e.g. `OrderService.process` or a full signature
        target: String,

        /// Traversal depth (-1 for unlimited; defaults from config)
        #[arg(short, long)]
        depth: Option<i32>,
    },

    /// Methods that transitively call the given method
    IncomingCalls {
        /// Method name
        target: String,
    },

    /// Direct dependencies of a class
    Dependencies {
        /// Class name, simple or qualified
        target: String,
    },

    /// Dependency cycles between types
    CircularDeps,

    /// Everything affected by changing a class
    Impact {
        /// Class name, simple or qualified
        target: String,
    },

    /// The whole graph, optionally filtered by package prefix
    Fullgraph {
        /// Keep only this package prefix
        #[arg(long)]
        package: Option<String>,

        /// Drop this package prefix
        #[arg(long)]
        exclude_package: Option<String>,
    },

    /// Evaluate architecture rules against the graph
    Check,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<i32> {
    let config = CodemapConfig::load(&cli.config);

    let mut engine = CodeMapEngine::new();
    engine
        .analyze(&cli.project)
        .with_context(|| format!("failed to analyze {}", cli.project.display()))?;

    let result = match cli.command {
        Commands::Callgraph { target, depth } => {
            let depth = depth.unwrap_or(config.analysis.default_depth);
            engine.call_graph(&target, depth)?
        }
        Commands::IncomingCalls { target } => engine.incoming_calls(&target)?,
        Commands::Dependencies { target } => engine.class_dependencies(&target)?,
        Commands::CircularDeps => engine.circular_dependencies()?,
        Commands::Impact { target } => engine.impact(&target)?,
        Commands::Fullgraph {
            package,
            exclude_package,
        } => engine.full_graph(package.as_deref(), exclude_package.as_deref())?,
        Commands::Check => {
            let rules = RuleEngine::from_config(&config);
            let violations = rules.evaluate(engine.graph()?);
            println!("{}", serde_json::to_string_pretty(&violations)?);

            let errors = violations
                .iter()
                .filter(|v| v.severity == Severity::Error)
                .count();
            return Ok(if errors > 0 { 1 } else { 0 });
        }
    };

    println!("{}", result.to_json()?);
    Ok(0)
}
