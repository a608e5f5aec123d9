//! Trace command: stroke graph from an SVG file, traced into a knot.

use std::fs;
use std::io::{self, Read};

use anyhow::{Context, Result};

use knotwork::svg::snap_strokes;
use knotwork::{art_to_svg, extract_strokes_from_svg, trace, try_trace, Stroke, SvgStyle};

use super::common::{flag_parse, flag_value, render_image, write_output, JsonOutput, OutputFormat};
use super::recipe::Recipe;

/// Ribbon half width relative to the mean stroke length.
const HALF_WIDTH_PER_STROKE: f64 = 0.1;
/// Target output width in pixels when no recipe sets a scale.
const TARGET_WIDTH_PX: f64 = 800.0;

/// Execute the trace command.
pub fn cmd_trace(args: &[String]) -> Result<()> {
    let mut svg_path: Option<&str> = None;
    let mut output_path: Option<&str> = None;
    let mut image_path: Option<&str> = None;
    let mut image_scale = 1.0f32;
    let mut format = OutputFormat::Svg;
    let mut recipe: Option<Recipe> = None;
    let mut snap: Option<f64> = None;
    let mut strict = false;
    let mut centreline = false;
    let mut show_strokes = false;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-o" | "--output" => output_path = Some(flag_value(args, &mut i)?),
            "-f" | "--format" => format = OutputFormat::from_name(flag_value(args, &mut i)?)?,
            "-c" | "--config" => recipe = Some(Recipe::load(flag_value(args, &mut i)?)?),
            "--snap" => snap = Some(flag_parse(args, &mut i)?),
            "--strict" => strict = true,
            "--centreline" => centreline = true,
            "--strokes" => show_strokes = true,
            "--png" => image_path = Some(flag_value(args, &mut i)?),
            "--png-scale" => image_scale = flag_parse(args, &mut i)?,
            "-h" | "--help" => {
                print_usage();
                return Ok(());
            }
            path if !path.starts_with('-') || path == "-" => {
                if svg_path.is_none() {
                    svg_path = Some(path);
                }
            }
            other => anyhow::bail!("unknown option `{}` (see `knotwork trace --help`)", other),
        }
        i += 1;
    }

    let Some(svg_path) = svg_path else {
        print_usage();
        anyhow::bail!("an input SVG file is required");
    };

    let content = if svg_path == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf).context("failed to read stdin")?;
        buf
    } else {
        fs::read_to_string(svg_path).with_context(|| format!("failed to read {}", svg_path))?
    };

    let mut strokes = extract_strokes_from_svg(&content)
        .with_context(|| format!("failed to extract strokes from {}", svg_path))?;
    if let Some(precision) = snap {
        strokes = snap_strokes(&strokes, precision);
    }

    let art = if strict {
        try_trace(&strokes).context("stroke graph rejected")?
    } else {
        trace(&strokes)
    };

    eprintln!("Traced {} strokes into {} threads", strokes.len(), art.thread_count());

    let mut style = match &recipe {
        Some(recipe) => recipe.svg_style(),
        None => fitted_style(&strokes),
    };
    style.centreline |= centreline;
    style.show_strokes |= show_strokes;

    let svg = art_to_svg(&art, &strokes, &style);
    match format {
        OutputFormat::Svg => write_output(&svg, output_path)?,
        OutputFormat::Json => {
            let json = JsonOutput::new(&art, &strokes, None).to_string_pretty()?;
            write_output(&json, output_path)?;
        }
    }

    if let Some(path) = image_path {
        render_image(&svg, path, image_scale)?;
    }

    Ok(())
}

/// Style sized to the stroke graph, for input drawn in arbitrary units.
fn fitted_style(strokes: &[Stroke]) -> SvgStyle {
    let defaults = SvgStyle::default();
    if strokes.is_empty() {
        return defaults;
    }

    let mean = strokes.iter().map(Stroke::length).sum::<f64>() / strokes.len() as f64;
    let (lo, hi) = strokes.iter().flat_map(|s| [s.a, s.b]).fold(
        (f64::INFINITY, f64::NEG_INFINITY),
        |(lo, hi), p| (lo.min(p.x.min(p.y)), hi.max(p.x.max(p.y))),
    );
    let extent = (hi - lo).max(mean) + 2.0 * mean;

    SvgStyle {
        scale: TARGET_WIDTH_PX / extent,
        padding: mean,
        outline_width: mean * 0.02,
        ribbon: defaults.ribbon.with_half_width(mean * HALF_WIDTH_PER_STROKE),
        ..defaults
    }
}

fn print_usage() {
    eprintln!("Usage: knotwork trace <input.svg | -> [options]");
    eprintln!();
    eprintln!("Trace a stroke graph drawn as SVG lines, polylines and paths.");
    eprintln!("Set data-stroke=\"cross|bounce|glance\" on an element or group to");
    eprintln!("choose its stroke type (default: cross).");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -o, --output <file>     Write to file instead of stdout");
    eprintln!("  -f, --format <fmt>      svg (default) or json");
    eprintln!("  -c, --config <yaml>     Take style and ribbon settings from a recipe");
    eprintln!("      --snap <precision>  Round coordinates so near endpoints meet");
    eprintln!("      --strict            Reject dangling junctions and zero-length strokes");
    eprintln!("      --centreline        Draw thread centrelines");
    eprintln!("      --strokes           Draw the stroke graph");
    eprintln!("      --png <file>        Also render a PNG (or .jpg)");
    eprintln!("      --png-scale <f>     Raster scale factor (default: 1.0)");
}
