//! Common utilities shared across CLI commands.

use std::fs;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use image::{DynamicImage, RgbaImage};
use serde::Serialize;
use tiny_skia::Pixmap;

use knotwork::spline::Spline;
use knotwork::{Art, Stroke};

/// Output format for a traced knot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum OutputFormat {
    Svg,
    Json,
}

impl OutputFormat {
    pub fn from_name(name: &str) -> Result<Self> {
        match name.to_lowercase().as_str() {
            "svg" => Ok(OutputFormat::Svg),
            "json" => Ok(OutputFormat::Json),
            other => bail!("unknown format `{}`; use 'svg' or 'json'", other),
        }
    }
}

/// Value following a flag, advancing the cursor past it.
pub fn flag_value<'a>(args: &'a [String], i: &mut usize) -> Result<&'a str> {
    let flag = &args[*i];
    *i += 1;
    args.get(*i)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("{} requires a value", flag))
}

/// Parsed value following a flag.
pub fn flag_parse<T>(args: &[String], i: &mut usize) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let flag = args[*i].clone();
    let value = flag_value(args, i)?;
    value
        .parse()
        .map_err(|e| anyhow!("invalid value `{}` for {}: {}", value, flag, e))
}

/// Write to `path`, or to stdout when there is none.
pub fn write_output(content: &str, path: Option<&str>) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, content).with_context(|| format!("failed to write {}", path))?;
            eprintln!("Wrote {}", path);
        }
        None => print!("{}", content),
    }
    Ok(())
}

/// Rasterise an SVG document to PNG (or JPEG, by extension).
pub fn render_image(svg: &str, path: &str, scale: f32) -> Result<()> {
    let options = usvg::Options::default();
    let tree = usvg::Tree::from_str(svg, &options).context("generated SVG did not parse")?;

    let size = tree.size();
    let width = (size.width() * scale).ceil().max(1.0) as u32;
    let height = (size.height() * scale).ceil().max(1.0) as u32;

    let mut pixmap = Pixmap::new(width, height)
        .ok_or_else(|| anyhow!("cannot allocate a {}x{} image", width, height))?;
    resvg::render(&tree, tiny_skia::Transform::from_scale(scale, scale), &mut pixmap.as_mut());

    let rgba = RgbaImage::from_raw(width, height, pixmap.take())
        .ok_or_else(|| anyhow!("pixel buffer does not match {}x{}", width, height))?;
    let image = DynamicImage::ImageRgba8(rgba);

    let is_jpeg = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("jpg") || e.eq_ignore_ascii_case("jpeg"));

    let saved = if is_jpeg {
        DynamicImage::ImageRgb8(image.to_rgb8()).save(path)
    } else {
        image.save(path)
    };
    saved.with_context(|| format!("failed to save {}", path))?;

    eprintln!("Wrote {} ({}x{})", path, width, height);
    Ok(())
}

/// A thread knot in JSON output format.
#[derive(Serialize)]
pub struct JsonKnot {
    pub t: f64,
    pub x: f64,
    pub y: f64,
    pub tx: f64,
    pub ty: f64,
    pub over: bool,
}

/// One thread in JSON output format.
#[derive(Serialize)]
pub struct JsonThread {
    pub index: usize,
    pub knots: Vec<JsonKnot>,
}

/// A stroke in JSON output format.
#[derive(Serialize)]
pub struct JsonStroke {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub kind: &'static str,
}

/// JSON output: the stroke graph and every traced thread.
#[derive(Serialize)]
pub struct JsonOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub strokes: Vec<JsonStroke>,
    pub threads: Vec<JsonThread>,
}

impl JsonOutput {
    pub fn new(art: &Art, strokes: &[Stroke], seed: Option<u64>) -> Self {
        let threads = art
            .iter()
            .enumerate()
            .map(|(index, (thread, z))| {
                let spline = thread.knots();
                let zs = z.knots().ys();
                let count = spline.len() - 1;

                let knots = (0..count)
                    .map(|k| {
                        let p = spline.ys()[k];
                        let m = thread.tangents()[k];
                        JsonKnot {
                            t: spline.xs()[k],
                            x: p.x,
                            y: p.y,
                            tx: m.x,
                            ty: m.y,
                            over: zs[k] > 0.0,
                        }
                    })
                    .collect();

                JsonThread { index, knots }
            })
            .collect();

        let strokes = strokes
            .iter()
            .map(|s| JsonStroke {
                x1: s.a.x,
                y1: s.a.y,
                x2: s.b.x,
                y2: s.b.y,
                kind: s.kind.name(),
            })
            .collect();

        Self { seed, strokes, threads }
    }

    pub fn to_string_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialize JSON")
    }
}
