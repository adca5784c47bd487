use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use eulerseq_lib::builder::parse::{
    is_fastx_path, parse_adjacency_list, parse_kmer_list, parse_read_pairs, parse_reads,
};
use eulerseq_lib::{
    universal_circular_string, Alphabet, Assembler, AssemblyConfig, Kmer, OverlapPolicy, Selection,
};
use std::fs;
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "eulerseq")]
#[command(version = "0.1.0")]
#[command(about = "eulerseq: sequence reconstruction over de Bruijn graphs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Flags shared by every traversal-based subcommand
#[derive(Args)]
struct TrailArgs {
    /// Seed for random edge and start selection (default: always take the first candidate)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Start node for the trail (paired nodes as LEFT|RIGHT)
    #[arg(long)]
    start: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<String>,

    /// Log the full trail once it is found
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconstruct a sequence from a k-mer list or FASTA/FASTQ reads
    Reconstruct {
        /// Input file: k-mer list, or FASTA/FASTQ (optionally gzipped)
        #[arg(short, long)]
        input: String,

        /// K-mer length (default: header line of the k-mer list, else the first k-mer)
        #[arg(short, long)]
        k: Option<usize>,

        /// Fragment alphabet: dna, binary or any
        #[arg(short, long, default_value = "dna")]
        alphabet: Alphabet,

        /// Drop malformed fragments instead of rejecting the input
        #[arg(long, default_value = "false")]
        permissive: bool,

        #[command(flatten)]
        trail: TrailArgs,
    },

    /// Reconstruct a sequence from a read-pair dataset
    Pairs {
        /// Input file: `k d` header, then LEFT|RIGHT per line
        #[arg(short, long)]
        input: String,

        /// Fragment alphabet: dna, binary or any
        #[arg(short, long, default_value = "dna")]
        alphabet: Alphabet,

        /// Drop malformed pairs instead of rejecting the input
        #[arg(long, default_value = "false")]
        permissive: bool,

        #[command(flatten)]
        trail: TrailArgs,
    },

    /// Print the maximal non-branching paths of a k-mer graph
    Contigs {
        /// Input file: k-mer list, or FASTA/FASTQ (optionally gzipped)
        #[arg(short, long)]
        input: String,

        /// K-mer length (default: header line of the k-mer list, else the first k-mer)
        #[arg(short, long)]
        k: Option<usize>,

        /// Fragment alphabet: dna, binary or any
        #[arg(short, long, default_value = "dna")]
        alphabet: Alphabet,

        /// Drop malformed fragments instead of rejecting the input
        #[arg(long, default_value = "false")]
        permissive: bool,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<String>,

        /// Log every contig with its length
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print a circular binary string containing every binary k-mer once
    Universal {
        /// K-mer length
        #[arg(short, long)]
        k: usize,

        /// Seed for random edge and start selection
        #[arg(short, long)]
        seed: Option<u64>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Print an Eulerian trail through an adjacency list
    Cycle {
        /// Input file: `node -> a,b,c` per line
        #[arg(short, long)]
        input: String,

        #[command(flatten)]
        trail: TrailArgs,
    },
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing: use RUST_LOG if set, otherwise default to info
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Reconstruct { input, k, alphabet, permissive, trail } => {
            reconstruct_command(&input, k, alphabet, permissive, trail)?;
        }
        Commands::Pairs { input, alphabet, permissive, trail } => {
            pairs_command(&input, alphabet, permissive, trail)?;
        }
        Commands::Contigs { input, k, alphabet, permissive, output, verbose } => {
            contigs_command(&input, k, alphabet, permissive, output, verbose)?;
        }
        Commands::Universal { k, seed, output } => {
            universal_command(k, seed, output)?;
        }
        Commands::Cycle { input, trail } => {
            cycle_command(&input, trail)?;
        }
    }

    Ok(())
}

fn policy(permissive: bool) -> OverlapPolicy {
    if permissive {
        OverlapPolicy::Permissive
    } else {
        OverlapPolicy::Strict
    }
}

/// Load single fragments, with the k announced by the input if any
fn load_kmers(input: &str) -> anyhow::Result<(Option<usize>, Vec<Kmer>)> {
    if is_fastx_path(input) {
        let reads = parse_reads(input)?;
        info!("  Loaded {} reads", reads.len());
        Ok((None, reads))
    } else {
        let list = parse_kmer_list(input)?;
        info!("  Loaded {} k-mers", list.kmers.len());
        Ok((list.k, list.kmers))
    }
}

fn assembler(config: AssemblyConfig, start: Option<String>) -> anyhow::Result<Assembler> {
    let assembler = Assembler::new(config)?;
    Ok(match start {
        Some(node) => assembler.with_start(node),
        None => assembler,
    })
}

fn write_output(output: Option<&str>, text: &str) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            fs::write(path, format!("{text}\n"))
                .with_context(|| format!("Failed to write output file: {path}"))?;
            info!("Wrote {}", path);
        }
        None => println!("{text}"),
    }
    Ok(())
}

fn reconstruct_command(
    input: &str,
    k: Option<usize>,
    alphabet: Alphabet,
    permissive: bool,
    trail: TrailArgs,
) -> anyhow::Result<()> {
    info!("Reconstructing sequence from {}...", input);
    let (listed_k, kmers) = load_kmers(input)?;

    let config = AssemblyConfig {
        k: k.or(listed_k).unwrap_or_default(),
        alphabet,
        policy: policy(permissive),
        seed: trail.seed,
        verbose: trail.verbose,
        ..AssemblyConfig::default()
    };
    let assembly = assembler(config, trail.start)?.assemble_kmers(kmers)?;

    debug!("Trail kind: {:?}", assembly.balance);
    if assembly.report.dropped > 0 {
        info!("  {} fragments dropped", assembly.report.dropped);
    }
    write_output(trail.output.as_deref(), &assembly.sequence)
}

fn pairs_command(
    input: &str,
    alphabet: Alphabet,
    permissive: bool,
    trail: TrailArgs,
) -> anyhow::Result<()> {
    info!("Reconstructing sequence from read pairs in {}...", input);
    let list = parse_read_pairs(input)?;
    info!("  Loaded {} pairs (k={}, d={})", list.pairs.len(), list.k, list.d);

    let config = AssemblyConfig {
        alphabet,
        policy: policy(permissive),
        seed: trail.seed,
        verbose: trail.verbose,
        ..AssemblyConfig::paired(list.k, list.d).map_err(|e| anyhow::anyhow!("{}", e))?
    };
    let assembly = assembler(config, trail.start)?.assemble_pairs(list.pairs)?;
    write_output(trail.output.as_deref(), &assembly.sequence)
}

fn contigs_command(
    input: &str,
    k: Option<usize>,
    alphabet: Alphabet,
    permissive: bool,
    output: Option<String>,
    verbose: bool,
) -> anyhow::Result<()> {
    info!("Extracting contigs from {}...", input);
    let (listed_k, kmers) = load_kmers(input)?;

    let config = AssemblyConfig {
        k: k.or(listed_k).unwrap_or_default(),
        alphabet,
        policy: policy(permissive),
        verbose,
        ..AssemblyConfig::default()
    };
    let contigs = Assembler::new(config)?.contigs(kmers)?;
    write_output(output.as_deref(), &contigs.join("\n"))
}

fn universal_command(k: usize, seed: Option<u64>, output: Option<String>) -> anyhow::Result<()> {
    info!("Building {}-universal circular string...", k);
    let text = universal_circular_string(k, &mut Selection::from_seed(seed))?;
    write_output(output.as_deref(), &text)
}

fn cycle_command(input: &str, trail: TrailArgs) -> anyhow::Result<()> {
    info!("Finding Eulerian trail through {}...", input);
    let graph = parse_adjacency_list(input)?;
    info!("  Loaded {} nodes, {} edges", graph.num_nodes(), graph.num_edges());

    let config = AssemblyConfig {
        seed: trail.seed,
        verbose: trail.verbose,
        ..AssemblyConfig::default()
    };
    let path = assembler(config, trail.start)?.eulerian_trail(&graph)?;
    write_output(trail.output.as_deref(), &path.render(&graph))
}
