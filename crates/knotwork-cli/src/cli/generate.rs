//! Generate command: random grid, traced knot, rendered output.

use std::time::Instant;

use anyhow::{Context, Result};

use knotwork::{art_to_svg, generate_grid, trace, validate_strokes};

use super::common::{flag_parse, flag_value, render_image, write_output, JsonOutput, OutputFormat};
use super::recipe::Recipe;

/// Execute the generate command.
pub fn cmd_generate(args: &[String]) -> Result<()> {
    let mut output_path: Option<&str> = None;
    let mut image_path: Option<&str> = None;
    let mut image_scale = 1.0f32;
    let mut format = OutputFormat::Svg;
    let mut recipe = Recipe::default();
    let mut seed: Option<u64> = None;
    let mut overrides: Vec<(String, String)> = Vec::new();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-o" | "--output" => output_path = Some(flag_value(args, &mut i)?),
            "-f" | "--format" => format = OutputFormat::from_name(flag_value(args, &mut i)?)?,
            "-c" | "--config" => {
                let path = flag_value(args, &mut i)?;
                recipe = Recipe::load(path)?;
            }
            "-s" | "--seed" => seed = Some(flag_parse(args, &mut i)?),
            "--png" => image_path = Some(flag_value(args, &mut i)?),
            "--png-scale" => image_scale = flag_parse(args, &mut i)?,
            "-h" | "--help" => {
                print_usage();
                return Ok(());
            }
            flag @ ("-W" | "--width" | "-H" | "--height" | "-d" | "--density" | "--half-width"
            | "--samples" | "--no-delete" | "--single-purge" | "--centreline" | "--strokes") => {
                // Applied after the loop so they win over a recipe given later on the line.
                let value = if matches!(flag, "--no-delete" | "--single-purge" | "--centreline" | "--strokes") {
                    String::new()
                } else {
                    flag_value(args, &mut i)?.to_string()
                };
                overrides.push((flag.to_string(), value));
            }
            other => anyhow::bail!("unknown option `{}` (see `knotwork generate --help`)", other),
        }
        i += 1;
    }

    for (flag, value) in &overrides {
        apply_override(&mut recipe, flag, value)?;
    }

    let seed = seed.or(recipe.seed).unwrap_or_else(rand::random);
    let grid = recipe.grid_config();
    let style = recipe.svg_style();

    let start = Instant::now();
    let strokes = generate_grid(&grid, seed);
    let art = trace(&strokes);
    let elapsed = start.elapsed();

    if let Err(e) = validate_strokes(&strokes) {
        log::warn!("generated grid is degenerate: {}", e);
    }

    eprintln!(
        "Seed {}: {} strokes, {} threads ({:.2}ms)",
        seed,
        strokes.len(),
        art.thread_count(),
        elapsed.as_secs_f64() * 1000.0
    );

    let svg = art_to_svg(&art, &strokes, &style);
    match format {
        OutputFormat::Svg => write_output(&svg, output_path)?,
        OutputFormat::Json => {
            let json = JsonOutput::new(&art, &strokes, Some(seed)).to_string_pretty()?;
            write_output(&json, output_path)?;
        }
    }

    if let Some(path) = image_path {
        render_image(&svg, path, image_scale)?;
    }

    Ok(())
}

fn apply_override(recipe: &mut Recipe, flag: &str, value: &str) -> Result<()> {
    let number = || value.parse::<f64>().with_context(|| format!("invalid value `{}` for {}", value, flag));

    match flag {
        "-W" | "--width" => recipe.canvas.width = number()?,
        "-H" | "--height" => recipe.canvas.height = number()?,
        "--half-width" => recipe.ribbon.half_width = number()?,
        "--samples" => {
            recipe.ribbon.samples_per_knot = value
                .parse()
                .with_context(|| format!("invalid value `{}` for {}", value, flag))?
        }
        "-d" | "--density" => recipe.grid.density = parse_range(value)?,
        "--no-delete" => recipe.grid.delete = false,
        "--single-purge" => recipe.grid.repeat_purge = false,
        "--centreline" => recipe.style.centreline = true,
        "--strokes" => recipe.style.show_strokes = true,
        _ => {}
    }
    Ok(())
}

/// `N` or `MIN:MAX`.
fn parse_range(value: &str) -> Result<(u32, u32)> {
    let parse = |s: &str| {
        s.trim()
            .parse::<u32>()
            .with_context(|| format!("invalid density `{}`; expected N or MIN:MAX", value))
    };

    match value.split_once(':') {
        Some((lo, hi)) => Ok((parse(lo)?, parse(hi)?)),
        None => {
            let n = parse(value)?;
            Ok((n, n))
        }
    }
}

fn print_usage() {
    eprintln!("Usage: knotwork generate [options]");
    eprintln!();
    eprintln!("Generate a random Celtic knot.");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -o, --output <file>     Write to file instead of stdout");
    eprintln!("  -f, --format <fmt>      svg (default) or json");
    eprintln!("  -c, --config <yaml>     Load a knot recipe");
    eprintln!("  -s, --seed <n>          Random seed (default: random)");
    eprintln!("  -W, --width <units>     Canvas width (default: 1.333)");
    eprintln!("  -H, --height <units>    Canvas height (default: 1.0)");
    eprintln!("  -d, --density <n|a:b>   Junctions per unit (default: 6:14)");
    eprintln!("      --half-width <w>    Ribbon half width (default: 0.01)");
    eprintln!("      --samples <n>       Ribbon samples per knot (default: 25)");
    eprintln!("      --no-delete         Keep the full lattice");
    eprintln!("      --single-purge      Purge dangling strokes only once");
    eprintln!("      --centreline        Draw thread centrelines");
    eprintln!("      --strokes           Draw the stroke graph");
    eprintln!("      --png <file>        Also render a PNG (or .jpg)");
    eprintln!("      --png-scale <f>     Raster scale factor (default: 1.0)");
}
