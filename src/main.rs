use std::time::Duration;

use box_packer::render;
use box_packer::{ConfigError, OversizePolicy, PackOptions, Packing, Problem, Rect, Strategy};
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::Level;

#[derive(Parser)]
#[command(
    name = "box_packer",
    about = "Pack rectangles into fixed-size bins with classic offline heuristics"
)]
struct Cli {
    /// Bin dimensions (WxH, e.g. 10x10)
    #[arg(long)]
    bin: String,

    /// Boxes as WxH or WxH:qty (e.g. 6x4 5x7:3)
    #[arg(long = "boxes", num_args = 1..)]
    boxes: Vec<String>,

    /// Generate N random boxes instead of (or in addition to) --boxes
    #[arg(long)]
    random: Option<usize>,

    /// Smallest side of a generated box
    #[arg(long, default_value_t = 1)]
    min_dim: u32,

    /// Largest side of a generated box
    #[arg(long, default_value_t = 10)]
    max_dim: u32,

    /// Seed for box generation
    #[arg(long)]
    seed: Option<u64>,

    /// Strategy id: HFF, HNF, HBF, FFF, FNF, FBL, NBL or AD
    #[arg(long, default_value = "HFF", value_parser = parse_strategy)]
    strategy: Strategy,

    /// Run every strategy and print a comparison
    #[arg(long)]
    all: bool,

    /// Fail instead of dropping boxes larger than the bin
    #[arg(long)]
    reject_oversized: bool,

    /// Abort a strategy that runs longer than this many milliseconds
    #[arg(long)]
    time_limit_ms: Option<u64>,

    /// Show ASCII layout of each bin
    #[arg(long)]
    layout: bool,

    /// Log engine progress to stderr (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_strategy(s: &str) -> Result<Strategy, String> {
    s.parse().map_err(|e: ConfigError| e.to_string())
}

fn parse_dimensions(s: &str) -> Result<Rect, String> {
    let (w, h) = s
        .split_once('x')
        .ok_or_else(|| format!("invalid dimensions '{}', expected WxH", s))?;
    let w = w
        .parse::<u32>()
        .map_err(|_| format!("invalid width in '{}'", s))?;
    let h = h
        .parse::<u32>()
        .map_err(|_| format!("invalid height in '{}'", s))?;
    if w == 0 || h == 0 {
        return Err(format!("dimensions must be non-zero in '{}'", s));
    }
    Ok(Rect::new(w, h))
}

fn parse_boxes(s: &str) -> Result<Vec<Rect>, String> {
    let (dims, qty) = match s.split_once(':') {
        Some((dims, qty)) => {
            let qty = qty
                .parse::<usize>()
                .map_err(|_| format!("invalid quantity in '{}'", s))?;
            if qty == 0 {
                return Err(format!("quantity must be non-zero in '{}'", s));
            }
            (dims, qty)
        }
        None => (s, 1),
    };
    let rect = parse_dimensions(dims)?;
    Ok(vec![rect; qty])
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", message);
    std::process::exit(1);
}

fn print_packing(packing: &Packing, layout: bool) {
    for (i, bin) in packing.bins.iter().enumerate() {
        println!("Bin {}:", i + 1);
        for p in &bin.placements {
            println!("  #{} {} @ ({}, {})", p.id, p.rect, p.x, p.y);
        }
        if layout {
            print!("{}", render::render_bin(packing.bin, bin));
        }
        println!();
    }

    for d in &packing.dropped {
        println!("Dropped: #{} {} does not fit in bin {}", d.id, d.rect, packing.bin);
    }

    println!(
        "Summary: {} bin{} used, {:.1}% waste",
        packing.bin_count(),
        if packing.bin_count() == 1 { "" } else { "s" },
        packing.total_waste_percent(),
    );
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(level)
        .init();

    let bin = parse_dimensions(&cli.bin).unwrap_or_else(|e| fail(e));

    let boxes: Vec<Rect> = cli
        .boxes
        .iter()
        .map(|b| parse_boxes(b))
        .collect::<Result<Vec<_>, _>>()
        .unwrap_or_else(|e| fail(e))
        .into_iter()
        .flatten()
        .collect();

    let mut problem = Problem::new(bin, Vec::new());
    if let Some(count) = cli.random {
        let mut rng = match cli.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_rng(&mut rand::rng()),
        };
        problem
            .generate_boxes(&mut rng, cli.min_dim, cli.max_dim, count)
            .unwrap_or_else(|e| fail(e));
    }
    problem.boxes.extend(boxes);

    let mut options = PackOptions::default();
    if cli.reject_oversized {
        options = options.with_oversize(OversizePolicy::Reject);
    }
    if let Some(ms) = cli.time_limit_ms {
        options = options.with_time_limit(Duration::from_millis(ms));
    }

    if cli.all {
        let results = problem.compare(&options).unwrap_or_else(|e| fail(e));
        for (strategy, result) in results {
            match result {
                Ok(packing) => println!(
                    "{:<4} {:<22} {:>4} bins {:>6.1}% waste {:>3} dropped",
                    strategy.id(),
                    strategy.name(),
                    packing.bin_count(),
                    packing.total_waste_percent(),
                    packing.dropped.len(),
                ),
                Err(e) => println!("{:<4} {:<22} failed: {}", strategy.id(), strategy.name(), e),
            }
        }
        return;
    }

    let packing = problem
        .solve(cli.strategy, &options)
        .unwrap_or_else(|e| fail(e));
    print_packing(&packing, cli.layout);
}
