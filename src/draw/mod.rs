//! Plot rendering for the analysis results.

pub mod config;
pub mod morris;
pub mod radiosity;
pub mod spectrum;
pub mod surrogate;

use plotters::style::RGBColor;

pub use config::{PlotConfig, Rgb};
pub use morris::draw_morris;
pub use radiosity::draw_radiosity;
pub use spectrum::draw_spectrum;
pub use surrogate::draw_surrogate;

pub(crate) fn rgb(color: Rgb) -> RGBColor {
    RGBColor(color.0, color.1, color.2)
}

/// Label of the category drawn at integer position `v`, empty between categories.
pub(crate) fn category_label(names: &[String], v: f64) -> String {
    let i = v.round();
    if (v - i).abs() > 1e-6 || i < 0.0 {
        return String::new();
    }
    names.get(i as usize).cloned().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_label() {
        let names = vec!["a".to_string(), "b".to_string()];
        assert_eq!(category_label(&names, 0.0), "a");
        assert_eq!(category_label(&names, 1.0), "b");
        assert_eq!(category_label(&names, 0.5), "");
        assert_eq!(category_label(&names, 2.0), "");
        assert_eq!(category_label(&names, -1.0), "");
    }
}
