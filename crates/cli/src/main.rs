use clap::{Parser, Subcommand};
use anyhow::{Context, Result};

use std::path::Path;

use pedigree_graph_core as core;
use core::family::{
    is_monogamous, non_monogamous_samples, order_families_and_set_mates, FamilyUnit,
};
use core::graph::{founder_filter, IsPrimary, RelationshipGraph};
use core::viz::render_dot;

#[derive(Parser)]
#[command(name = "pedgraph")]
#[command(version)]
#[command(about = "Pedigree relationship graphs: family inference, ordering and reports")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Infer nuclear families from a pedigree file
    Families {
        /// Path to the pedigree file
        #[arg(short, long)]
        input: String,

        /// Input format: "rel", "vcf" or "auto" (by file extension)
        #[arg(long, default_value = "auto")]
        format: String,

        /// Keep families whose parent sexes are unrecorded
        #[arg(long)]
        lenient: bool,
    },

    /// Order families so every parent is processed before its children
    Order {
        /// Path to the pedigree file
        #[arg(short, long)]
        input: String,

        /// Input format: "rel", "vcf" or "auto" (by file extension)
        #[arg(long, default_value = "auto")]
        format: String,

        /// Keep families whose parent sexes are unrecorded
        #[arg(long)]
        lenient: bool,
    },

    /// Summarize the genomes and relationships of a pedigree file
    Stats {
        /// Path to the pedigree file
        #[arg(short, long)]
        input: String,

        /// Input format: "rel", "vcf" or "auto" (by file extension)
        #[arg(long, default_value = "auto")]
        format: String,
    },

    /// Render the pedigree as a Graphviz DOT graph
    Dot {
        /// Path to the pedigree file
        #[arg(short, long)]
        input: String,

        /// Input format: "rel", "vcf" or "auto" (by file extension)
        #[arg(long, default_value = "auto")]
        format: String,

        /// Write the DOT text to this file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Families {
            input,
            format,
            lenient,
        } => cmd_families(&input, &format, lenient),
        Commands::Order {
            input,
            format,
            lenient,
        } => cmd_order(&input, &format, lenient),
        Commands::Stats { input, format } => cmd_stats(&input, &format),
        Commands::Dot {
            input,
            format,
            output,
        } => cmd_dot(&input, &format, output.as_deref()),
    }
}

/// Load a graph in the requested format, sniffing the file extension when
/// the format is "auto".
fn load_graph(input: &str, format: &str) -> Result<RelationshipGraph> {
    let format = match format.to_lowercase().as_str() {
        "auto" => {
            let ext = Path::new(input)
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("");
            if ext.eq_ignore_ascii_case("vcf") {
                "vcf".to_string()
            } else {
                "rel".to_string()
            }
        }
        other => other.to_string(),
    };

    let graph = match format.as_str() {
        "rel" => RelationshipGraph::from_rel_file(input)
            .with_context(|| format!("Failed to load relationships from '{}'", input))?,
        "vcf" => RelationshipGraph::from_vcf_header(input)
            .with_context(|| format!("Failed to load VCF header from '{}'", input))?,
        other => {
            anyhow::bail!("Unknown format '{}'. Use 'rel', 'vcf' or 'auto'.", other);
        }
    };

    eprintln!(
        "Loaded {} genomes, {} relationships from '{}'",
        graph.n_genomes(),
        graph.n_relationships(),
        input
    );
    Ok(graph)
}

fn cmd_families(input: &str, format: &str, lenient: bool) -> Result<()> {
    let graph = load_graph(input, format)?;
    let families = FamilyUnit::infer_all_families(&graph, lenient, None);

    if families.is_empty() {
        println!("No complete families found.");
        if !lenient {
            eprintln!("Hint: pass --lenient to keep families with unrecorded parent sexes.");
        }
        return Ok(());
    }

    println!("Found {} families:", families.len());
    for family in &families {
        println!("  {}", family);
        println!("    father: {}", family.father());
        println!("    mother: {}", family.mother());
        for child in family.children() {
            println!("    child:  {}", child);
        }
        if family.is_one_parent_diseased(&graph) {
            println!("    note:   exactly one parent is marked diseased");
        }
    }

    Ok(())
}

fn cmd_order(input: &str, format: &str, lenient: bool) -> Result<()> {
    let graph = load_graph(input, format)?;
    let families = FamilyUnit::infer_all_families(&graph, lenient, None);

    if families.is_empty() {
        println!("No complete families found.");
        if !lenient {
            eprintln!("Hint: pass --lenient to keep families with unrecorded parent sexes.");
        }
        return Ok(());
    }

    if !is_monogamous(&families) {
        eprintln!(
            "Non-monogamous parents: {}",
            non_monogamous_samples(&families).join(", ")
        );
    }

    let ordered = order_families_and_set_mates(families).context("Failed to order families")?;

    println!("Processing order ({} families):", ordered.len());
    for (i, family) in ordered.iter().enumerate() {
        println!(
            "  {:>3}. {} [father family {} of {}, mother family {} of {}]",
            i + 1,
            family,
            family.father_family_id() + 1,
            family.father_distinct_mates(),
            family.mother_family_id() + 1,
            family.mother_distinct_mates()
        );
    }

    Ok(())
}

fn cmd_stats(input: &str, format: &str) -> Result<()> {
    let graph = load_graph(input, format)?;

    let founders = founder_filter();
    let founder_names = graph.genomes_matching(&[&founders]);
    let primary = graph.genomes_matching(&[&IsPrimary]);
    let everyone: Vec<&str> = graph.genome_names().collect();
    let groups = graph
        .count_disconnected_groups(&everyone)
        .context("Failed to count disconnected groups")?;

    println!("Genomes:             {}", graph.n_genomes());
    println!("Relationships:       {}", graph.n_relationships());
    println!("Primary samples:     {}", primary.len());
    println!("Founders:            {}", founder_names.len());
    println!("Disconnected groups: {}", groups);

    if !founder_names.is_empty() {
        println!("\nFounders:");
        for name in founder_names {
            println!("  {}", name);
        }
    }

    Ok(())
}

fn cmd_dot(input: &str, format: &str, output: Option<&str>) -> Result<()> {
    let graph = load_graph(input, format)?;
    let dot = render_dot(&graph);

    match output {
        Some(path) => {
            std::fs::write(path, &dot)
                .with_context(|| format!("Failed to write DOT graph to '{}'", path))?;
            eprintln!("Wrote DOT graph to '{}'", path);
        }
        None => print!("{}", dot),
    }

    Ok(())
}
