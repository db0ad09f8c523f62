use clap::{Parser, Subcommand};
use membership_filter::{
    FilterConfig, FilterParams, MembershipFilter, common::bits2hr,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show derived size and hash count for a configuration
    Params {
        /// Expected number of items
        #[arg(short, long, default_value = "10000")]
        expected_items: usize,

        /// False positive rate (between 0 and 1)
        #[arg(short, long, default_value = "0.01")]
        fpr: f64,
    },

    /// Print the bit positions probed for an item
    Probe {
        /// Item to hash
        #[arg(short, long)]
        item: String,

        /// Expected number of items
        #[arg(short, long, default_value = "10000")]
        expected_items: usize,

        /// False positive rate (between 0 and 1)
        #[arg(short, long, default_value = "0.01")]
        fpr: f64,
    },

    /// Measure the observed false positive rate of a configuration
    Fpr {
        /// Expected number of items
        #[arg(short, long, default_value = "10000")]
        expected_items: usize,

        /// False positive rate (between 0 and 1)
        #[arg(short, long, default_value = "0.01")]
        fpr: f64,

        /// Fraction of expected items to insert before measuring
        #[arg(long, default_value = "1.0")]
        fill: f64,

        /// Number of never-inserted items to check
        #[arg(short, long, default_value = "100000")]
        samples: usize,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Params {
            expected_items,
            fpr,
        } => {
            let config = FilterConfig::new(expected_items, fpr);
            config.validate()?;
            let params = FilterParams::from(&config);

            println!("Bloom Filter Parameters:");
            println!("  Expected items: {expected_items}");
            println!("  False positive rate: {fpr:.4}");
            println!("  Bit array size: {}", params.size);
            println!("  Number of hash functions: {}", params.hash_count);
            println!("  Memory: {}", bits2hr(params.size));
            if params.hash_count == 0 {
                println!(
                    "  Warning: hash count is zero, every check will match"
                );
            }
        }
        Commands::Probe {
            item,
            expected_items,
            fpr,
        } => {
            let filter = MembershipFilter::with_params(expected_items, fpr)?;
            let positions: Vec<usize> =
                filter.probe_positions(item.as_bytes()).collect();
            println!(
                "Item '{item}' probes {} of {} bits:",
                positions.len(),
                filter.size()
            );
            for (i, position) in positions.iter().enumerate() {
                println!("  [{i}] {position}");
            }
        }
        Commands::Fpr {
            expected_items,
            fpr,
            fill,
            samples,
        } => {
            let mut filter = MembershipFilter::with_params(expected_items, fpr)?;
            let insert_count = (expected_items as f64 * fill) as usize;

            print!("Inserting {insert_count} items... ");
            for i in 0..insert_count {
                filter.insert(format!("known-{i}").as_bytes());
            }

            print!("Checking... ");
            let false_negatives = (0..insert_count)
                .filter(|i| !filter.contains(format!("known-{i}").as_bytes()))
                .count();
            let false_positives = (0..samples)
                .filter(|i| filter.contains(format!("unknown-{i}").as_bytes()))
                .count();
            println!("Done!");

            let observed = false_positives as f64 / samples.max(1) as f64;
            let stats = filter.stats();
            println!("Results:");
            println!("  Bits set: {}/{}", stats.bits_set, stats.size);
            println!("  False negatives: {false_negatives}");
            println!("  False positives: {false_positives}/{samples}");
            println!("  Observed FPR: {:.4}%", observed * 100.0);
            println!("  Target FPR: {:.4}%", fpr * 100.0);
        }
    }

    Ok(())
}
