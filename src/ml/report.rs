//! Diagnostic model-performance report
//!
//! Renders the actual-vs-predicted scatter the `/model_performance` endpoint
//! serves. The ideal fit is the y = x line.

use std::fs;
use std::path::Path;

use anyhow::Result;
use plotters::prelude::*;

pub fn render_scatter(actual: &[f64], predicted: &[f64], out_path: &Path) -> Result<()> {
    if actual.is_empty() || actual.len() != predicted.len() {
        anyhow::bail!(
            "cannot render report: {} actual vs {} predicted values",
            actual.len(),
            predicted.len()
        );
    }

    if let Some(parent) = out_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let min = actual
        .iter()
        .chain(predicted.iter())
        .copied()
        .fold(f64::INFINITY, f64::min);
    let max = actual
        .iter()
        .chain(predicted.iter())
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);
    let pad = ((max - min).abs()).max(1.0) * 0.05;
    let (lo, hi) = (min - pad, max + pad);

    let root = BitMapBackend::new(out_path, (1000, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(12)
        .caption("Actual vs. Predicted Water Levels", ("sans-serif", 22))
        .x_label_area_size(40)
        .y_label_area_size(56)
        .build_cartesian_2d(lo..hi, lo..hi)?;

    chart
        .configure_mesh()
        .x_desc("Actual Water Level (m)")
        .y_desc("Predicted Water Level (m)")
        .axis_style(&BLACK.mix(0.6))
        .light_line_style(&BLACK.mix(0.06))
        .label_style(("sans-serif", 13))
        .draw()?;

    chart
        .draw_series(std::iter::once(PathElement::new(
            vec![(lo, lo), (hi, hi)],
            RED.stroke_width(2),
        )))?
        .label("Ideal fit")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED.stroke_width(2)));

    chart
        .draw_series(
            actual
                .iter()
                .zip(predicted.iter())
                .map(|(a, p)| Circle::new((*a, *p), 3, BLUE.mix(0.7).filled())),
        )?
        .label("Held-out predictions")
        .legend(|(x, y)| Circle::new((x, y), 3, BLUE.filled()));

    chart
        .configure_series_labels()
        .border_style(&BLACK.mix(0.4))
        .background_style(&WHITE.mix(0.8))
        .label_font(("sans-serif", 12))
        .draw()?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_render_rejects_mismatched_input() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("plot.png");
        assert!(render_scatter(&[1.0, 2.0], &[1.0], &path).is_err());
        assert!(render_scatter(&[], &[], &path).is_err());
    }
}
