use std::{fmt, path::Path};

use anyhow::Context;
use plotters::prelude::*;

use crate::{
    compare::{Comparison, OccurrenceMap, PercentageMap, SectionCounts, Sections},
    report::interval_labels,
};

const SIZE: (u32, u32) = (1280, 800);
const ORANGE: RGBColor = RGBColor(255, 165, 0);
const DARK_GREEN: RGBColor = RGBColor(0, 150, 0);

fn draw_err<E: fmt::Display>(e: E) -> anyhow::Error {
    anyhow!("Plotting error: {}", e)
}

/// y axis limits for a set of bar heights.  Always includes 0; values all
/// within +/-0.1 give a fixed +/-0.1 axis, otherwise the data range with 5% padding
pub fn y_range<'a, I: IntoIterator<Item = &'a f64>>(values: I) -> (f64, f64) {
    let (lo, hi) = values
        .into_iter()
        .fold((0.0f64, 0.0f64), |(lo, hi), x| (lo.min(*x), hi.max(*x)));
    if lo >= -0.1 && hi <= 0.1 {
        (-0.1, 0.1)
    } else {
        let pad = 0.05 * (hi - lo);
        (lo - pad, hi + pad)
    }
}

fn bar(i: usize, v: f64, style: ShapeStyle) -> Rectangle<(f64, f64)> {
    let x = i as f64;
    Rectangle::new([(x + 0.1, 0.0), (x + 0.9, v)], style)
}

/// Disease and control percentages overlaid with their differences, one bar
/// position per node ordered by decreasing difference
pub fn plot_comparison(
    path: &Path,
    cmp: &Comparison,
    sections: &Sections,
    disease: &str,
    node_type: &str,
) -> anyhow::Result<()> {
    debug!("Writing comparison plot to {}", path.display());
    let sorted = cmp.sorted_diff();
    let n = sorted.len().max(1) as f64;
    let (y0, y1) = y_range(
        cmp.diff
            .values()
            .chain(cmp.disease.values())
            .chain(cmp.control.values()),
    );

    let root = BitMapBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(draw_err)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(format!("Occurrences of {}", node_type), ("sans-serif", 28))
        .margin(15)
        .x_label_area_size(30)
        .y_label_area_size(70)
        .build_cartesian_2d(0f64..n, y0..y1)
        .map_err(draw_err)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(0)
        .x_desc(node_type)
        .y_desc("Percentage of occurrences")
        .draw()
        .map_err(draw_err)?;

    let get = |m: &PercentageMap, k: &str| m.get(k).copied().unwrap_or(0.0);

    chart
        .draw_series(
            sorted
                .iter()
                .enumerate()
                .map(|(i, (k, _))| bar(i, get(&cmp.disease, k), BLUE.mix(0.5).filled())),
        )
        .map_err(draw_err)?
        .label(disease)
        .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], BLUE.mix(0.5).filled()));

    chart
        .draw_series(
            sorted
                .iter()
                .enumerate()
                .map(|(i, (k, _))| bar(i, get(&cmp.control, k), ORANGE.mix(0.5).filled())),
        )
        .map_err(draw_err)?
        .label("Control")
        .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], ORANGE.mix(0.5).filled()));

    chart
        .draw_series(
            sorted
                .iter()
                .enumerate()
                .filter(|(_, (_, d))| *d > 0.0)
                .map(|(i, (_, d))| bar(i, *d, DARK_GREEN.filled())),
        )
        .map_err(draw_err)?
        .label("Positive Difference")
        .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], DARK_GREEN.filled()));

    chart
        .draw_series(
            sorted
                .iter()
                .enumerate()
                .filter(|(_, (_, d))| *d <= 0.0)
                .map(|(i, (_, d))| bar(i, *d, RED.filled())),
        )
        .map_err(draw_err)?
        .label("Negative Difference")
        .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], RED.filled()));

    for b in sections.boundaries().iter().filter(|b| **b > y0 && **b < y1) {
        chart
            .draw_series(DashedLineSeries::new(
                vec![(0.0, *b), (n, *b)],
                6,
                4,
                RED.mix(0.5).stroke_width(1),
            ))
            .map_err(draw_err)?;
    }

    chart
        .draw_series(std::iter::empty::<Rectangle<(f64, f64)>>())
        .map_err(draw_err)?
        .label(format!(
            "Unique {}s for patients with disease: {}",
            node_type,
            cmp.disease.len()
        ))
        .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], WHITE.filled()));

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

/// Bar chart of the number of nodes in each section
pub fn plot_section_counts(
    path: &Path,
    counts: &SectionCounts,
    sections: &Sections,
    disease: &str,
    node_type: &str,
) -> anyhow::Result<()> {
    debug!("Writing section count plot to {}", path.display());
    let labels = interval_labels(sections);
    let n = labels.len() as u32;
    let ymax = counts.counts().iter().copied().max().unwrap_or(0) as u32 + 1;

    let root = BitMapBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(draw_err)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!(
                "Percentage Difference in Occurrences of {}s for {}",
                node_type, disease
            ),
            ("sans-serif", 24),
        )
        .margin(15)
        .x_label_area_size(90)
        .y_label_area_size(60)
        .build_cartesian_2d((0u32..n).into_segmented(), 0u32..ymax)
        .map_err(draw_err)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Percentage Difference Range")
        .y_desc("Count")
        .x_labels(labels.len())
        .x_label_formatter(&|v| match v {
            SegmentValue::CenterOf(i) => labels.get(*i as usize).cloned().unwrap_or_default(),
            _ => String::new(),
        })
        .x_label_style(("sans-serif", 14).into_font().transform(FontTransform::Rotate90))
        .draw()
        .map_err(draw_err)?;

    chart
        .draw_series(
            Histogram::vertical(&chart)
                .style(BLUE.filled())
                .margin(5)
                .data(
                    counts
                        .iter()
                        .enumerate()
                        .map(|(i, (_, c))| (i as u32, c as u32)),
                ),
        )
        .map_err(draw_err)?;

    root.present()
        .map_err(draw_err)
        .with_context(|| format!("Could not write plot to {}", path.display()))
}

/// Occurrences of each node as a fraction of the total associations for one disease
pub fn plot_occurrences(
    path: &Path,
    occ: &OccurrenceMap,
    total_associations: u64,
    samples: u64,
    disease: &str,
    node_type: &str,
) -> anyhow::Result<()> {
    if total_associations == 0 {
        warn!(
            "No {} associations for {}; skipping occurrence plot",
            node_type, disease
        );
        return Ok(());
    }
    debug!("Writing occurrence plot to {}", path.display());
    let t = total_associations as f64;
    let mut v: Vec<f64> = occ.values().map(|n| *n as f64 / t).collect();
    v.sort_unstable_by(|a, b| b.total_cmp(a));
    let n = v.len().max(1) as f64;
    let ymax = v.first().copied().unwrap_or(0.0).max(0.01) * 1.05;

    let root = BitMapBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(draw_err)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("Occurrences of {} for {}", node_type, disease),
            ("sans-serif", 28),
        )
        .margin(15)
        .x_label_area_size(30)
        .y_label_area_size(70)
        .build_cartesian_2d(0f64..n, 0f64..ymax)
        .map_err(draw_err)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(0)
        .x_desc(node_type)
        .y_desc("Percentage of occurrences")
        .draw()
        .map_err(draw_err)?;

    chart
        .draw_series(
            v.iter()
                .enumerate()
                .map(|(i, y)| bar(i, *y, BLUE.filled())),
        )
        .map_err(draw_err)?;

    let style = ("sans-serif", 18).into_font();
    let x = (SIZE.0 as f64 * 0.6) as i32;
    let y = (SIZE.1 as f64 * 0.15) as i32;
    root.draw(&Text::new(
        format!("Total Associations: {}", total_associations),
        (x, y),
        style.clone(),
    ))
    .map_err(draw_err)?;
    root.draw(&Text::new(
        format!("Samples: {}", samples),
        (x, y + 24),
        style,
    ))
    .map_err(draw_err)?;

    root.present()
        .map_err(draw_err)
        .with_context(|| format!("Could not write plot to {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_values_use_fixed_range() {
        assert_eq!(y_range([0.05, -0.02, 0.1].iter()), (-0.1, 0.1));
        assert_eq!(y_range(std::iter::empty::<&f64>()), (-0.1, 0.1));
    }

    #[test]
    fn large_values_are_padded() {
        let (lo, hi) = y_range([0.5, -0.25, 0.3].iter());
        assert!((lo - (-0.2875)).abs() < 1e-12);
        assert!((hi - 0.5375).abs() < 1e-12);

        // Range always includes the bar base
        let (lo, hi) = y_range([0.4, 0.8].iter());
        assert!(lo < 0.0);
        assert!((hi - 0.84).abs() < 1e-12);
    }
}
