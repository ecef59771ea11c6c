#![warn(clippy::all, clippy::pedantic)]
use std::error::Error;
use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::{ArgAction, Args, Parser, Subcommand};
use itertools::Itertools;
use log::LevelFilter;
use rand::rngs::StdRng;
use rand::SeedableRng;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use sapflow::generate::{grid_network, random_network, GeneratedNetwork};
use sapflow::{
    min_cut, EdgeRecord, FlowNetwork, FlowValidator, LogObserver, MaxFlow, PushRelabel,
    ShortestAugmentingPath, Vertex,
};

/// Maximum flow with the shortest augmenting path algorithm.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Log more (-v info, -vv debug, -vvv solver trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Solve a network read from a CSV edge list (source,target,capacity[,flow])
    Solve(SolveArgs),
    /// Benchmark on random connected networks
    Random {
        /// Number of vertices
        #[arg(short = 'n', long)]
        vertices: usize,
        /// Number of edges
        #[arg(short = 'm', long)]
        edges: usize,
        #[command(flatten)]
        eval: EvalArgs,
    },
    /// Benchmark on square grid networks
    Grid {
        /// Number of vertices per side
        #[arg(short = 'k', long)]
        size: usize,
        #[command(flatten)]
        eval: EvalArgs,
    },
}

#[derive(Args)]
struct SolveArgs {
    /// CSV file with one edge per row
    input: PathBuf,
    /// Name of the source vertex
    #[arg(short, long)]
    source: String,
    /// Name of the sink vertex
    #[arg(short = 't', long)]
    sink: String,
    /// Write the resulting flow to this CSV file instead of printing it
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Start from the flows given in the input file
    #[arg(long)]
    warm_start: bool,
    /// Certify the result with the flow validator
    #[arg(long)]
    check: bool,
}

#[derive(Args)]
struct EvalArgs {
    /// Number of networks to generate and solve
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    repetitions: u32,
    /// Seed of the network generator
    #[arg(long, default_value_t = 0)]
    seed: u64,
    #[arg(long, default_value_t = 100)]
    min_capacity: i64,
    #[arg(long, default_value_t = 10_000)]
    max_capacity: i64,
    /// Also solve with push-relabel and compare the flow values
    #[arg(long)]
    reference: bool,
    /// Certify every flow with the flow validator
    #[arg(long)]
    check: bool,
    /// Trace one solver loop out of every N (with -vvv)
    #[arg(long, default_value_t = 1000)]
    trace_every: usize,
}

fn level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn lookup(network: &FlowNetwork<i64>, name: &str) -> Result<Vertex, Box<dyn Error>> {
    Ok(network
        .vertex_by_name(name)
        .ok_or_else(|| format!("no vertex named `{name}`"))?)
}

fn check(network: &FlowNetwork<i64>, source: Vertex, sink: Vertex) -> Result<(), Box<dyn Error>> {
    FlowValidator::check(network, source, sink).map_err(|v| format!("flow check failed: {v}"))?;
    log::info!("flow check passed");
    Ok(())
}

fn print_flow(network: &FlowNetwork<i64>) {
    for e in network.edges() {
        println!(
            "{} -> {}: {}/{}",
            e.source_name, e.target_name, e.flow, e.capacity
        );
    }
}

fn solve(args: &SolveArgs) -> Result<(), Box<dyn Error>> {
    let mut reader = csv::Reader::from_path(&args.input)?;
    let records: Vec<EdgeRecord<i64>> = reader.deserialize().collect::<Result<_, _>>()?;
    let mut network = FlowNetwork::from_records(records).map_err(|e| e.to_string())?;
    let source = lookup(&network, &args.source)?;
    let sink = lookup(&network, &args.sink)?;
    log::info!(
        "read {} vertices and {} edges from {}",
        network.num_vertices(),
        network.num_edges(),
        args.input.display()
    );

    let mut solver = ShortestAugmentingPath::new()
        .with_observer(LogObserver::default())
        .warm_start(args.warm_start);
    let start = Instant::now();
    let value = solver
        .run(&mut network, source, sink)
        .map_err(|e| e.to_string())?;
    log::info!("solved in {:?} ({:?})", start.elapsed(), solver.stats());

    if args.check {
        check(&network, source, sink)?;
    }

    let cut = min_cut(&network, source);
    log::info!(
        "minimum cut source side: {}",
        cut.iter().map(|&v| network.name(v)).join(", ")
    );

    match &args.output {
        Some(path) => {
            let mut writer = csv::Writer::from_path(path)?;
            for record in network.to_records().map_err(|e| e.to_string())? {
                writer.serialize(record)?;
            }
            writer.flush()?;
        }
        None => print_flow(&network),
    }
    println!("max flow value: {value}");
    Ok(())
}

fn evaluate<F>(args: &EvalArgs, label: &str, mut generate: F) -> Result<(), Box<dyn Error>>
where
    F: FnMut(&mut StdRng, RangeInclusive<i64>) -> Result<GeneratedNetwork<i64>, sapflow::Error>,
{
    if args.min_capacity > args.max_capacity {
        return Err("--min-capacity must not exceed --max-capacity".into());
    }

    let mut rng = StdRng::seed_from_u64(args.seed);
    let mut sap_time = Duration::ZERO;
    let mut reference_time = Duration::ZERO;
    let mut values = Vec::new();

    for rep in 1..=args.repetitions {
        let GeneratedNetwork {
            mut network,
            source,
            sink,
        } = generate(&mut rng, args.min_capacity..=args.max_capacity)
            .map_err(|e| e.to_string())?;
        log::info!(
            "{label} #{rep}: {} vertices, {} edges, source {}, sink {}",
            network.num_vertices(),
            network.num_edges(),
            network.name(source),
            network.name(sink)
        );

        let mut sap =
            ShortestAugmentingPath::new().with_observer(LogObserver::every(args.trace_every));
        let start = Instant::now();
        let value = sap
            .run(&mut network, source, sink)
            .map_err(|e| e.to_string())?;
        sap_time += start.elapsed();
        log::debug!("{label} #{rep}: value {value}, {:?}", sap.stats());
        if args.check {
            check(&network, source, sink)?;
        }

        if args.reference {
            let start = Instant::now();
            let expected = PushRelabel
                .max_flow(&mut network, source, sink)
                .map_err(|e| e.to_string())?;
            reference_time += start.elapsed();
            if args.check {
                check(&network, source, sink)?;
            }
            if value != expected {
                return Err(format!(
                    "{label} #{rep}: shortest augmenting path found {value}, push-relabel {expected}"
                )
                .into());
            }
        }

        values.push(value);
    }

    println!("{label}: {} networks", args.repetitions);
    println!(
        "shortest augmenting path: total {sap_time:?}, average {:?}",
        sap_time / args.repetitions
    );
    if args.reference {
        println!(
            "push-relabel:             total {reference_time:?}, average {:?}",
            reference_time / args.repetitions
        );
    }
    if let Some((low, high)) = values.iter().minmax().into_option() {
        println!("flow values between {low} and {high}");
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    TermLogger::init(
        level(cli.verbose),
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )?;

    match &cli.command {
        Command::Solve(args) => solve(args),
        Command::Random {
            vertices,
            edges,
            eval,
        } => evaluate(eval, "random", |rng, capacities| {
            random_network(rng, *vertices, *edges, capacities)
        }),
        Command::Grid { size, eval } => evaluate(eval, "grid", |rng, capacities| {
            grid_network(rng, *size, capacities)
        }),
    }
}
