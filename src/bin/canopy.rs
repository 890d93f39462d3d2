//! Canopy CLI: HTTP server plus local commands over the same database.
//!
//! Usage:
//!   canopy serve [--host H] [--port P] [--db path]
//!   canopy add <label> [--parent id] [--db path]
//!   canopy list [--json] [--db path]
//!   canopy seed [--db path]
//!   canopy stats [--db path]

use canopy::{ForestStats, Node, NodeId, OpenStore, ServerConfig, SqliteStore, StoreConfig, TreeApi};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "canopy",
    version,
    about = "Build and inspect forests of labeled nodes"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        #[command(flatten)]
        config: ServerConfig,
    },
    /// Create a node
    Add {
        /// Label for the new node
        label: String,
        /// Id of an existing parent node
        #[arg(long)]
        parent: Option<i64>,
        #[command(flatten)]
        store: StoreConfig,
    },
    /// Print the forest
    List {
        /// Print JSON instead of an indented tree
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        store: StoreConfig,
    },
    /// Insert the bundled sample hierarchies
    Seed {
        #[command(flatten)]
        store: StoreConfig,
    },
    /// Print per-tree statistics
    Stats {
        #[command(flatten)]
        store: StoreConfig,
    },
}

fn open_api(store: &StoreConfig) -> Result<TreeApi, String> {
    let db_path = store.resolve();
    let store = SqliteStore::open(&db_path)
        .map_err(|e| format!("Failed to open database {}: {}", db_path.display(), e))?;
    Ok(TreeApi::new(Arc::new(store)))
}

fn print_tree(node: &Node) {
    let mut stack = vec![(node, 0usize)];
    while let Some((node, depth)) = stack.pop() {
        println!("{}{} [{}]", "  ".repeat(depth), node.label, node.id);
        stack.extend(node.children.iter().rev().map(|c| (c, depth + 1)));
    }
}

fn print_stats(stats: &ForestStats) {
    println!("{:>6}  {:<40}  {:>6}  {:>5}  {:>8}", "ID", "ROOT", "NODES", "DEPTH", "CHILDREN");
    println!("{}", "-".repeat(73));
    for tree in &stats.trees {
        println!(
            "{:>6}  {:<40}  {:>6}  {:>5}  {:>8}",
            tree.root_id, tree.root_label, tree.node_count, tree.max_depth, tree.direct_children
        );
    }
    println!();
    println!("Trees:      {}", stats.tree_count());
    println!("Nodes:      {}", stats.total_nodes);
    println!("Max depth:  {}", stats.max_depth);
}

fn cmd_add(api: &TreeApi, label: &str, parent: Option<i64>) -> i32 {
    match api.create_node(label, parent.map(NodeId::new)) {
        Ok(node) => {
            println!("Created node {} '{}'", node.id, node.label);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn cmd_list(api: &TreeApi, json: bool) -> i32 {
    let forest = match api.list_forest() {
        Ok(forest) => forest,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    if json {
        let mut out = std::io::BufWriter::new(std::io::stdout().lock());
        let written = canopy::forest::json::write_forest_pretty(&mut out, &forest)
            .and_then(|()| writeln!(out));
        return match written {
            Ok(()) => 0,
            Err(e) => {
                eprintln!("Error: {}", e);
                1
            }
        };
    }

    if forest.is_empty() {
        println!("No nodes yet.");
        return 0;
    }
    for root in &forest {
        print_tree(root);
    }
    0
}

fn cmd_seed(api: &TreeApi) -> i32 {
    let roots = match canopy::sample::seed(api) {
        Ok(roots) => roots,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    for root in &roots {
        println!("Seeded '{}' ({})", root.label, root.id);
    }
    println!();
    cmd_stats(api)
}

fn cmd_stats(api: &TreeApi) -> i32 {
    match api.list_forest() {
        Ok(forest) => {
            print_stats(&ForestStats::collect(&forest));
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let code = match cli.command {
        Commands::Serve { config } => canopy::http::run_server(&config),
        Commands::Add { label, parent, store } => match open_api(&store) {
            Ok(api) => cmd_add(&api, &label, parent),
            Err(e) => {
                eprintln!("Error: {}", e);
                1
            }
        },
        Commands::List { json, store } => match open_api(&store) {
            Ok(api) => cmd_list(&api, json),
            Err(e) => {
                eprintln!("Error: {}", e);
                1
            }
        },
        Commands::Seed { store } => match open_api(&store) {
            Ok(api) => cmd_seed(&api),
            Err(e) => {
                eprintln!("Error: {}", e);
                1
            }
        },
        Commands::Stats { store } => match open_api(&store) {
            Ok(api) => cmd_stats(&api),
            Err(e) => {
                eprintln!("Error: {}", e);
                1
            }
        },
    };
    std::process::exit(code);
}
