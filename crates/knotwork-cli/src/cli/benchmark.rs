//! Benchmark command implementation.

use std::time::{Duration, Instant};

use anyhow::Result;

use knotwork::graph::Graph;
use knotwork::{generate_grid, ribbons, Art, GridConfig, RibbonConfig, Tracer};

use super::common::{flag_parse, flag_value};
use super::recipe::Recipe;

/// Execute the benchmark command.
pub fn cmd_benchmark(args: &[String]) -> Result<()> {
    let mut iterations = 20usize;
    let mut base_seed = 0u64;
    let mut grid = GridConfig::default();
    let mut ribbon = RibbonConfig::default();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-n" | "--iterations" => iterations = flag_parse::<usize>(args, &mut i)?.max(1),
            "-s" | "--seed" => base_seed = flag_parse(args, &mut i)?,
            "-d" | "--density" => {
                let n: u32 = flag_parse(args, &mut i)?;
                grid = grid.with_density(n, n);
            }
            "-c" | "--config" => {
                let recipe = Recipe::load(flag_value(args, &mut i)?)?;
                grid = recipe.grid_config();
                ribbon = recipe.ribbon_config();
            }
            "-h" | "--help" => {
                print_usage();
                return Ok(());
            }
            other => anyhow::bail!("unknown option `{}` (see `knotwork benchmark --help`)", other),
        }
        i += 1;
    }

    let mut grid_time = Duration::ZERO;
    let mut graph_time = Duration::ZERO;
    let mut trace_time = Duration::ZERO;
    let mut ribbon_time = Duration::ZERO;
    let mut total_strokes = 0;
    let mut total_threads = 0;

    for seed in seed_range(base_seed, iterations) {
        let start = Instant::now();
        let strokes = generate_grid(&grid, seed);
        grid_time += start.elapsed();

        let start = Instant::now();
        let graph = Graph::new(&strokes);
        graph_time += start.elapsed();

        let start = Instant::now();
        let mut threads = Vec::new();
        let mut zs = Vec::new();
        for path in Tracer::from_graph(graph) {
            let (thread, z) = path.into_curves();
            threads.push(thread);
            zs.push(z);
        }
        let art = Art::new(threads, zs);
        trace_time += start.elapsed();

        let start = Instant::now();
        let bands = ribbons(&art, &ribbon);
        ribbon_time += start.elapsed();

        log::debug!("seed {}: {} strokes, {} threads, {} ribbons", seed, strokes.len(), art.thread_count(), bands.len());
        total_strokes += strokes.len();
        total_threads += art.thread_count();
    }

    let ms = |d: Duration| d.as_secs_f64() * 1000.0;
    let per = |d: Duration| ms(d) / iterations as f64;

    println!();
    println!("═══════════════════════════════════════════════");
    println!("  KNOTWORK BENCHMARK: {} GRIDS", iterations);
    println!("═══════════════════════════════════════════════");
    println!("  Seeds: {}..{}", base_seed, base_seed.wrapping_add(iterations as u64));
    println!("  Strokes: {} ({:.1} per grid)", total_strokes, total_strokes as f64 / iterations as f64);
    println!("  Threads: {} ({:.1} per grid)", total_threads, total_threads as f64 / iterations as f64);
    println!("  Grid generation: {:.2}ms (avg {:.3}ms)", ms(grid_time), per(grid_time));
    println!("  Graph build:     {:.2}ms (avg {:.3}ms)", ms(graph_time), per(graph_time));
    println!("  Tracing:         {:.2}ms (avg {:.3}ms)", ms(trace_time), per(trace_time));
    println!("  Ribbon sampling: {:.2}ms (avg {:.3}ms)", ms(ribbon_time), per(ribbon_time));
    println!("═══════════════════════════════════════════════");

    Ok(())
}

/// Consecutive seeds from `base`, wrapping past `u64::MAX`.
fn seed_range(base: u64, count: usize) -> impl Iterator<Item = u64> {
    (0..count as u64).map(move |k| base.wrapping_add(k))
}

fn print_usage() {
    eprintln!("Usage: knotwork benchmark [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -n, --iterations <n>    Grids to generate (default: 20)");
    eprintln!("  -s, --seed <n>          First seed (default: 0)");
    eprintln!("  -d, --density <n>       Fixed junctions per unit");
    eprintln!("  -c, --config <yaml>     Grid and ribbon settings from a recipe");
    eprintln!();
    eprintln!("Times grid generation, graph construction, tracing and ribbon sampling.");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_range_wraps_at_u64_max() {
        let seeds: Vec<u64> = seed_range(u64::MAX - 1, 3).collect();
        assert_eq!(seeds, vec![u64::MAX - 1, u64::MAX, 0]);
    }

    #[test]
    fn benchmark_accepts_seed_near_u64_max() {
        let args: Vec<String> = ["-n", "2", "-d", "4", "-s", &u64::MAX.to_string()]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert!(cmd_benchmark(&args).is_ok());
    }
}
