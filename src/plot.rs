use crate::types::Float;
use plotters::prelude::*;

/// One labeled data series, e.g. per-interval energy for one scheme.
pub type Series = (String, Vec<(Float, Float)>);

fn ranges(series: &[Series]) -> (Float, Float, Float, Float) {
    let mut min_x = Float::INFINITY;
    let mut max_x = Float::NEG_INFINITY;
    let mut min_y = Float::INFINITY;
    let mut max_y = Float::NEG_INFINITY;
    for (_, points) in series {
        for (x, y) in points {
            min_x = min_x.min(*x);
            max_x = max_x.max(*x);
            min_y = min_y.min(*y);
            max_y = max_y.max(*y);
        }
    }
    // Pad the y range so flat series stay visible
    let pad = if max_y > min_y {
        0.05 * (max_y - min_y)
    } else {
        1.0
    };
    (min_x, max_x, min_y - pad, max_y + pad)
}

/// Overlay the labeled series as lines on one figure and write it as a PNG.
pub fn plot_series(series: &[Series], title: &str, path: &str) {
    let (min_x, max_x, min_y, max_y) = ranges(series);

    // Create a plotting area
    let root = BitMapBackend::new(path, (640, 480)).into_drawing_area();
    let _ = root.fill(&WHITE);

    // Configure the chart
    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 20))
        .x_label_area_size(30)
        .y_label_area_size(40)
        .build_cartesian_2d(min_x..max_x, min_y..max_y)
        .unwrap();

    let _ = chart.configure_mesh().draw();

    // Plot each scheme's data as one labeled line
    for (idx, (name, points)) in series.iter().enumerate() {
        let color = Palette99::pick(idx).to_rgba();
        let _ = chart
            .draw_series(LineSeries::new(points.iter().cloned(), &color))
            .map(|line| {
                line.label(name).legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], color)
                });
            });
    }

    let _ = chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw();

    let _ = root.present();
}

/// Plot the labeled series as cross markers; used for the per-scheme drift
/// figures where each series is a handful of points.
pub fn plot_markers(series: &[Series], title: &str, path: &str) {
    let (min_x, max_x, min_y, max_y) = ranges(series);

    let root = BitMapBackend::new(path, (640, 480)).into_drawing_area();
    let _ = root.fill(&WHITE);

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 20))
        .x_label_area_size(30)
        .y_label_area_size(40)
        .build_cartesian_2d((min_x - 1.0)..(max_x + 1.0), min_y..max_y)
        .unwrap();

    let _ = chart.configure_mesh().draw();

    for (idx, (name, points)) in series.iter().enumerate() {
        let color = Palette99::pick(idx).to_rgba();
        let _ = chart
            .draw_series(
                points
                    .iter()
                    .map(|(x, y)| Cross::new((*x, *y), 6, color.stroke_width(2))),
            )
            .map(|markers| {
                markers
                    .label(name)
                    .legend(move |(x, y)| Cross::new((x + 10, y), 4, color));
            });
    }

    let _ = chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw();

    let _ = root.present();
}
