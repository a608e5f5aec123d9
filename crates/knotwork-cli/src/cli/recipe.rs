//! Knot recipes: YAML files describing how a knot is generated and drawn.
//!
//! Every section is optional; missing values fall back to the library
//! defaults. Command-line flags override whatever the recipe sets.
//!
//! ```yaml
//! name: wide braid
//! seed: 42
//! canvas:
//!   width: 2.0
//!   height: 1.0
//!   background: "#ffffff"
//! grid:
//!   density: [8, 10]
//!   weights: { cross: 10, bounce: 1, glance: 2 }
//! ribbon:
//!   half_width: 0.015
//! style:
//!   palette: ["#264653", "#2a9d8f", "#e9c46a"]
//!   centreline: true
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use knotwork::grid::StrokeWeights;
use knotwork::svg::DEFAULT_PALETTE;
use knotwork::{GridConfig, RibbonConfig, SvgStyle};

/// A complete knot recipe.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Recipe {
    /// Recipe name/title
    pub name: Option<String>,

    /// Fixed seed; random when absent
    pub seed: Option<u64>,

    pub canvas: Canvas,
    pub grid: GridSection,
    pub ribbon: RibbonSection,
    pub style: StyleSection,
}

/// Canvas configuration, in knot units.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,

    /// Background color; `none` for transparent
    pub background: String,

    /// Output pixels per knot unit
    pub scale: f64,

    /// Margin around the knot, in knot units
    pub padding: f64,
}

impl Default for Canvas {
    fn default() -> Self {
        let grid = GridConfig::default();
        let style = SvgStyle::default();
        Self {
            width: grid.width,
            height: grid.height,
            background: style.background.unwrap_or_else(|| "none".to_string()),
            scale: style.scale,
            padding: style.padding,
        }
    }
}

/// Grid generation parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSection {
    /// Junction columns per unit, `[min, max]`
    pub density: (u32, u32),
    pub weights: Weights,
    /// Deletion probability divisor range, `[min, max]`
    pub delete_divisor: (u32, u32),
    pub delete: bool,
    pub repeat_purge: bool,
}

impl Default for GridSection {
    fn default() -> Self {
        let grid = GridConfig::default();
        Self {
            density: grid.junctions_per_unit,
            weights: Weights::default(),
            delete_divisor: grid.delete_divisor,
            delete: grid.delete,
            repeat_purge: grid.repeat_purge,
        }
    }
}

/// Stroke type odds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct Weights {
    pub cross: u32,
    pub bounce: u32,
    pub glance: u32,
}

impl Default for Weights {
    fn default() -> Self {
        let w = StrokeWeights::default();
        Self { cross: w.cross, bounce: w.bounce, glance: w.glance }
    }
}

/// Ribbon sampling parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RibbonSection {
    pub half_width: f64,
    pub samples_per_knot: usize,
}

impl Default for RibbonSection {
    fn default() -> Self {
        let r = RibbonConfig::default();
        Self { half_width: r.half_width, samples_per_knot: r.samples_per_knot }
    }
}

/// Drawing style.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleSection {
    pub palette: Vec<String>,

    /// Ribbon edge color; `none` disables edges
    pub outline: String,
    pub outline_width: f64,
    pub centreline: bool,
    pub show_strokes: bool,
}

impl Default for StyleSection {
    fn default() -> Self {
        let style = SvgStyle::default();
        Self {
            palette: DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
            outline: style.outline.unwrap_or_else(|| "none".to_string()),
            outline_width: style.outline_width,
            centreline: style.centreline,
            show_strokes: style.show_strokes,
        }
    }
}

fn color_or_none(color: &str) -> Option<String> {
    if color.trim().eq_ignore_ascii_case("none") {
        None
    } else {
        Some(color.to_string())
    }
}

impl Recipe {
    /// Load a recipe from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read recipe {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("failed to parse recipe {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let recipe: Recipe = serde_yaml::from_str(content)?;
        if let Some(name) = &recipe.name {
            log::info!("loaded recipe '{}'", name);
        }
        Ok(recipe)
    }

    pub fn grid_config(&self) -> GridConfig {
        let g = &self.grid;
        GridConfig {
            width: self.canvas.width,
            height: self.canvas.height,
            junctions_per_unit: g.density,
            weights: StrokeWeights {
                cross: g.weights.cross,
                bounce: g.weights.bounce,
                glance: g.weights.glance,
            },
            delete_divisor: g.delete_divisor,
            delete: g.delete,
            repeat_purge: g.repeat_purge,
        }
    }

    pub fn ribbon_config(&self) -> RibbonConfig {
        RibbonConfig::default()
            .with_half_width(self.ribbon.half_width)
            .with_samples_per_knot(self.ribbon.samples_per_knot)
    }

    pub fn svg_style(&self) -> SvgStyle {
        SvgStyle {
            scale: self.canvas.scale,
            padding: self.canvas.padding,
            background: color_or_none(&self.canvas.background),
            palette: self.style.palette.clone(),
            outline: color_or_none(&self.style.outline),
            outline_width: self.style.outline_width,
            ribbon: self.ribbon_config(),
            centreline: self.style.centreline,
            show_strokes: self.style.show_strokes,
        }
    }
}
