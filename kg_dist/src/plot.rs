use std::{fmt, path::Path};

use anyhow::Context;
use plotters::prelude::*;

const CORNFLOWER_BLUE: RGBColor = RGBColor(100, 149, 237);
const ORANGE: RGBColor = RGBColor(255, 165, 0);

fn draw_err<E: fmt::Display>(e: E) -> anyhow::Error {
    anyhow!("Plotting error: {}", e)
}

/// Sample counts of the listed diseases followed by the estimated counts of the rest
pub fn plot_distribution(path: &Path, counts: &[u64], hidden: &[u64]) -> anyhow::Result<()> {
    debug!("Writing distribution plot to {}", path.display());
    let n = (counts.len() + hidden.len()).max(2) as f64;
    let ymax = counts.iter().chain(hidden.iter()).copied().max().unwrap_or(1) as f64 * 1.05;

    let root = BitMapBackend::new(path, (1000, 600)).into_drawing_area();
    root.fill(&WHITE).map_err(draw_err)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Diseases by Count", ("sans-serif", 28))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..n, 0f64..ymax)
        .map_err(draw_err)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("Diseases")
        .y_desc("Count")
        .draw()
        .map_err(draw_err)?;

    chart
        .draw_series(LineSeries::new(
            counts.iter().enumerate().map(|(i, c)| (i as f64, *c as f64)),
            CORNFLOWER_BLUE.stroke_width(5),
        ))
        .map_err(draw_err)?
        .label("Listed")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], CORNFLOWER_BLUE.stroke_width(5)));

    let k = counts.len();
    chart
        .draw_series(LineSeries::new(
            hidden
                .iter()
                .enumerate()
                .map(|(i, c)| ((i + k) as f64, *c as f64)),
            ORANGE.stroke_width(5),
        ))
        .map_err(draw_err)?
        .label("Estimated")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], ORANGE.stroke_width(5)));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(draw_err)?;

    root.present()
        .map_err(draw_err)
        .with_context(|| format!("Could not write plot to {}", path.display()))
}
