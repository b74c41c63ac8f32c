use serde::{Deserialize, Serialize};

/// RGB color tuple with 8-bit channels.
pub type Rgb = (u8, u8, u8);

/// Configuration for plot rendering.
///
/// Controls the canvas size, fonts and default colors of all analysis plots.
/// Plots are written as PNG files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    // Canvas
    pub width: u32,
    pub height: u32,
    pub font_family: String,
    pub caption_size: f64,

    // General drawing defaults
    pub bar_color: Rgb,
    pub line_color: Rgb,
    pub fill_color: Rgb,
    pub fill_alpha: f64,
    pub grid_alpha: f64,

    // Heatmaps
    pub heatmap_low: Rgb,
    pub heatmap_mid: Rgb,
    pub heatmap_high: Rgb,
    pub colorbar_steps: usize,
    /// Number of isolines drawn over the SET and metamodel heatmaps.
    pub contour_levels: usize,
    pub colorbar_label_size: f64,

    // Spectrum
    /// Linear region half-width of the symmetric-log irradiance axis.
    pub symlog_threshold: f64,
}

impl PlotConfig {
    pub fn new() -> Self {
        Self {
            width: 1200,
            height: 700,
            font_family: "sans-serif".to_string(),
            caption_size: 20.0,

            bar_color: (31, 119, 180),
            line_color: (214, 39, 40),
            fill_color: (31, 119, 180),
            fill_alpha: 0.3,
            grid_alpha: 0.15,

            heatmap_low: (59, 76, 192),
            heatmap_mid: (221, 221, 221),
            heatmap_high: (180, 4, 38),
            colorbar_steps: 64,
            contour_levels: 5,
            colorbar_label_size: 12.0,

            symlog_threshold: 1.0,
        }
    }

    /// Maps `value` within `[lo, hi]` onto the diverging heatmap colors.
    pub fn heatmap_color(&self, value: f64, lo: f64, hi: f64) -> Rgb {
        let t = if hi > lo {
            ((value - lo) / (hi - lo)).clamp(0.0, 1.0)
        } else {
            0.5
        };
        // Low -> mid -> high
        if t < 0.5 {
            blend(self.heatmap_low, self.heatmap_mid, t * 2.0)
        } else {
            blend(self.heatmap_mid, self.heatmap_high, (t - 0.5) * 2.0)
        }
    }
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn blend(a: Rgb, b: Rgb, s: f64) -> Rgb {
    let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * s).round() as u8;
    (mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
}
