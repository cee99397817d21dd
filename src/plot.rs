use crate::config::Job;
use anyhow::{Context, Result};
use plotters::prelude::*;

const PLOT_SIZE: (u32, u32) = (800, 600);

// Series colors cycle in draw order.
const PALETTE: [RGBColor; 3] = [RED, GREEN, BLUE];

/// Render the aggregate series of a job as a line chart and write it to the
/// job's output file.
///
/// One line per series, window index on the horizontal axis. Empty series
/// yield an empty but valid chart.
pub fn render_chart(job: &Job, series_data: &[(String, Vec<f64>)]) -> Result<()> {
    let root = BitMapBackend::new(&job.output_file, PLOT_SIZE).into_drawing_area();
    root.fill(&WHITE)
        .with_context(|| format!("failed to fill {:?}", job.output_file))?;

    let n_windows = series_data
        .iter()
        .map(|(_, values)| values.len())
        .max()
        .unwrap_or(0);
    let x_max = job
        .x_limit
        .unwrap_or(n_windows.saturating_sub(1).max(1) as f64);

    let (y_min, y_max) = y_range(series_data);

    let mut chart = ChartBuilder::on(&root)
        .caption(&job.title, ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(0f64..x_max, y_min..y_max)
        .context("failed to build chart")?;

    chart
        .configure_mesh()
        .x_desc(job.x_label.as_str())
        .y_desc(job.y_label.as_str())
        .draw()
        .context("failed to draw mesh")?;

    for (i_series, (label, values)) in series_data.iter().enumerate() {
        let color = PALETTE[i_series % PALETTE.len()];
        let points = values
            .iter()
            .enumerate()
            .map(|(i_window, &value)| (i_window as f64, value));

        chart
            .draw_series(LineSeries::new(points, color))
            .with_context(|| format!("failed to draw series {label:?}"))?
            .label(label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .context("failed to draw series labels")?;

    root.present()
        .with_context(|| format!("failed to write {:?}", job.output_file))?;

    Ok(())
}

fn y_range(series_data: &[(String, Vec<f64>)]) -> (f64, f64) {
    let values = series_data.iter().flat_map(|(_, values)| values.iter());
    let (mut y_min, mut y_max) = values.fold(
        (f64::INFINITY, f64::NEG_INFINITY),
        |(y_min, y_max), &value| (y_min.min(value), y_max.max(value)),
    );

    if !y_min.is_finite() || !y_max.is_finite() {
        return (0.0, 1.0);
    }
    if y_min == y_max {
        return (y_min - 1.0, y_max + 1.0);
    }

    let pad = 0.05 * (y_max - y_min);
    y_min -= pad;
    y_max += pad;
    (y_min, y_max)
}
