//! Chart specifications and SVG rendering using Plotters

use std::f64::consts::PI;

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::stats::{self, CorrelationMatrix, Proportion};

/// Color palette for chart series
const SERIES_COLORS: [RGBColor; 8] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
];

/// Ends of the heatmap colour scale, -1 to +1
const BLUES_LOW: RGBColor = RGBColor(247, 251, 255);
const BLUES_HIGH: RGBColor = RGBColor(8, 48, 107);

const CHART_SIZE: (u32, u32) = (800, 500);
const HEATMAP_SIZE: (u32, u32) = (1000, 820);
const KDE_POINTS: usize = 200;

fn series_color(index: usize) -> RGBColor {
    SERIES_COLORS[index % SERIES_COLORS.len()]
}

/// Named set of values plotted in one colour
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub name: String,
    pub values: Vec<f64>,
}

impl Group {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramChart {
    pub title: String,
    pub x_label: String,
    pub groups: Vec<Group>,
    pub bins: usize,
    /// Overlay a density curve scaled to counts
    pub kde: bool,
    /// Tick marks for each observation along the x axis
    pub rug: bool,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub bars: Vec<(String, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoxChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub groups: Vec<Group>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DonutChart {
    pub title: String,
    pub slices: Vec<Proportion>,
    /// Hole radius as a fraction of the outer radius
    pub hole: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PointGroup {
    pub name: String,
    pub points: Vec<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub groups: Vec<PointGroup>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapChart {
    pub title: String,
    pub matrix: CorrelationMatrix,
}

/// Every chart the dashboard can show
#[derive(Debug, Clone, PartialEq)]
pub enum Chart {
    Histogram(HistogramChart),
    Bar(BarChart),
    Box(BoxChart),
    Donut(DonutChart),
    Scatter(ScatterChart),
    Heatmap(HeatmapChart),
}

impl Chart {
    pub fn title(&self) -> &str {
        match self {
            Chart::Histogram(chart) => &chart.title,
            Chart::Bar(chart) => &chart.title,
            Chart::Box(chart) => &chart.title,
            Chart::Donut(chart) => &chart.title,
            Chart::Scatter(chart) => &chart.title,
            Chart::Heatmap(chart) => &chart.title,
        }
    }

    /// Render to a standalone SVG document
    pub fn to_svg(&self) -> crate::Result<String> {
        match self {
            Chart::Histogram(chart) => with_svg(CHART_SIZE, |root| draw_histogram(root, chart)),
            Chart::Bar(chart) => with_svg(CHART_SIZE, |root| draw_bar(root, chart)),
            Chart::Box(chart) => with_svg(CHART_SIZE, |root| draw_box(root, chart)),
            Chart::Donut(chart) => with_svg(CHART_SIZE, |root| draw_donut(root, chart)),
            Chart::Scatter(chart) => with_svg(CHART_SIZE, |root| draw_scatter(root, chart)),
            Chart::Heatmap(chart) => with_svg(HEATMAP_SIZE, |root| draw_heatmap(root, chart)),
        }
    }
}

type Area<'a> = DrawingArea<SVGBackend<'a>, Shift>;

fn with_svg<F>(size: (u32, u32), draw: F) -> crate::Result<String>
where
    F: FnOnce(&Area<'_>) -> crate::Result<()>,
{
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        root.fill(&WHITE)?;
        draw(&root)?;
        root.present()?;
    }
    Ok(svg)
}

/// Title and a centred "No data" note, for charts over an empty selection
fn draw_placeholder(root: &Area<'_>, title: &str) -> crate::Result<()> {
    let (width, height) = root.dim_in_pixel();
    let centered = TextStyle::from(("sans-serif", 22).into_font())
        .pos(Pos::new(HPos::Center, VPos::Top));
    root.draw(&Text::new(title.to_string(), (width as i32 / 2, 10), centered.clone()))?;
    root.draw(&Text::new(
        "No data".to_string(),
        (width as i32 / 2, height as i32 / 2),
        centered.color(&RGBColor(127, 127, 127)),
    ))?;
    Ok(())
}

fn value_range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |range, v| match range {
        None => Some((v, v)),
        Some((lo, hi)) => Some((f64::min(lo, v), f64::max(hi, v))),
    })
}

/// Pad a range so single values and flat series still get an axis
fn padded((lo, hi): (f64, f64)) -> (f64, f64) {
    let pad = if hi > lo { (hi - lo) * 0.05 } else { 0.5 };
    (lo - pad, hi + pad)
}

fn draw_histogram(root: &Area<'_>, spec: &HistogramChart) -> crate::Result<()> {
    let slices: Vec<&[f64]> = spec.groups.iter().map(|g| g.values.as_slice()).collect();
    let Some(hist) = stats::histogram(&slices, spec.bins) else {
        return draw_placeholder(root, &spec.title);
    };

    let lo = hist.edges[0];
    let hi = hist.edges[hist.edges.len() - 1];
    let grid: Vec<f64> = (0..KDE_POINTS)
        .map(|i| lo + (hi - lo) * i as f64 / (KDE_POINTS - 1) as f64)
        .collect();

    // Densities are scaled to counts so they share the bar axis
    let curves: Vec<Vec<f64>> = if spec.kde {
        spec.groups
            .iter()
            .map(|g| {
                let scale = g.values.len() as f64 * hist.bin_width();
                stats::gaussian_kde(&g.values, &grid)
                    .into_iter()
                    .map(|d| d * scale)
                    .collect()
            })
            .collect()
    } else {
        Vec::new()
    };

    let curve_max = curves.iter().flatten().copied().fold(0.0, f64::max);
    let y_max = (hist.max_count() as f64).max(curve_max).max(1.0) * 1.1;

    let mut chart = ChartBuilder::on(root)
        .caption(&spec.title, ("sans-serif", 22))
        .margin(10)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d(lo..hi, 0f64..y_max)?;

    chart
        .configure_mesh()
        .x_desc(spec.x_label.as_str())
        .y_desc("Count")
        .axis_desc_style(("sans-serif", 15))
        .draw()?;

    for (index, group) in spec.groups.iter().enumerate() {
        let color = series_color(index);
        let opacity = spec.opacity;
        let counts = &hist.counts[index];

        chart
            .draw_series(
                hist.edges
                    .windows(2)
                    .zip(counts)
                    .filter(|(_, count)| **count > 0)
                    .map(move |(edge, count)| {
                        Rectangle::new(
                            [(edge[0], 0.0), (edge[1], *count as f64)],
                            color.mix(opacity).filled(),
                        )
                    }),
            )?
            .label(group.name.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));

        if let Some(curve) = curves.get(index).filter(|curve| !curve.is_empty()) {
            chart.draw_series(LineSeries::new(
                grid.iter().copied().zip(curve.iter().copied()),
                color.stroke_width(2),
            ))?;
        }

        if spec.rug {
            let tick = y_max * 0.03;
            chart.draw_series(group.values.iter().map(move |&v| {
                PathElement::new(vec![(v, 0.0), (v, tick)], color.mix(0.6).stroke_width(1))
            }))?;
        }
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;
    Ok(())
}

/// Category names for a segmented x axis
fn segment_label(names: &[String], value: &SegmentValue<u32>) -> String {
    match value {
        SegmentValue::CenterOf(index) => names.get(*index as usize).cloned().unwrap_or_default(),
        _ => String::new(),
    }
}

fn draw_bar(root: &Area<'_>, spec: &BarChart) -> crate::Result<()> {
    if spec.bars.is_empty() {
        return draw_placeholder(root, &spec.title);
    }

    let names: Vec<String> = spec.bars.iter().map(|(name, _)| name.clone()).collect();
    let y_max = spec.bars.iter().map(|(_, v)| *v).fold(0.0, f64::max).max(1.0) * 1.1;
    let y_min = spec.bars.iter().map(|(_, v)| *v).fold(0.0, f64::min) * 1.1;

    let mut chart = ChartBuilder::on(root)
        .caption(&spec.title, ("sans-serif", 22))
        .margin(10)
        .x_label_area_size(45)
        .y_label_area_size(80)
        .build_cartesian_2d((0u32..names.len() as u32).into_segmented(), y_min..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_label_formatter(&|value| segment_label(&names, value))
        .x_desc(spec.x_label.as_str())
        .y_desc(spec.y_label.as_str())
        .axis_desc_style(("sans-serif", 15))
        .draw()?;

    for (index, (name, value)) in spec.bars.iter().enumerate() {
        let color = series_color(index);
        let slot = index as u32;
        let mut bar = Rectangle::new(
            [
                (SegmentValue::Exact(slot), 0.0),
                (SegmentValue::Exact(slot + 1), *value),
            ],
            color.filled(),
        );
        bar.set_margin(0, 0, 12, 12);

        chart
            .draw_series(std::iter::once(bar))?
            .label(name.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;
    Ok(())
}

fn draw_box(root: &Area<'_>, spec: &BoxChart) -> crate::Result<()> {
    let boxes: Vec<(String, stats::BoxStats)> = spec
        .groups
        .iter()
        .filter_map(|g| stats::box_stats(&g.values).map(|b| (g.name.clone(), b)))
        .collect();
    let Some(range) = value_range(spec.groups.iter().flat_map(|g| g.values.iter().copied()))
    else {
        return draw_placeholder(root, &spec.title);
    };
    let (y_lo, y_hi) = padded(range);
    let names: Vec<String> = boxes.iter().map(|(name, _)| name.clone()).collect();

    let mut chart = ChartBuilder::on(root)
        .caption(&spec.title, ("sans-serif", 22))
        .margin(10)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d((0u32..names.len() as u32).into_segmented(), y_lo..y_hi)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_label_formatter(&|value| segment_label(&names, value))
        .x_desc(spec.x_label.as_str())
        .y_desc(spec.y_label.as_str())
        .axis_desc_style(("sans-serif", 15))
        .draw()?;

    for (index, (_, b)) in boxes.iter().enumerate() {
        let color = series_color(index);
        let slot = index as u32;

        let mut body = Rectangle::new(
            [
                (SegmentValue::Exact(slot), b.q3),
                (SegmentValue::Exact(slot + 1), b.q1),
            ],
            color.mix(0.7).filled(),
        );
        body.set_margin(0, 0, 20, 20);
        let mut median = Rectangle::new(
            [
                (SegmentValue::Exact(slot), b.median),
                (SegmentValue::Exact(slot + 1), b.median),
            ],
            BLACK.stroke_width(2),
        );
        median.set_margin(0, 0, 20, 20);
        chart.draw_series([body, median])?;

        chart.draw_series([
            PathElement::new(
                vec![
                    (SegmentValue::CenterOf(slot), b.q3),
                    (SegmentValue::CenterOf(slot), b.upper_whisker),
                ],
                BLACK.stroke_width(1),
            ),
            PathElement::new(
                vec![
                    (SegmentValue::CenterOf(slot), b.q1),
                    (SegmentValue::CenterOf(slot), b.lower_whisker),
                ],
                BLACK.stroke_width(1),
            ),
        ])?;

        chart.draw_series(b.outliers.iter().map(move |&v| {
            Circle::new((SegmentValue::CenterOf(slot), v), 2, BLACK.mix(0.6).filled())
        }))?;
    }
    Ok(())
}

fn draw_scatter(root: &Area<'_>, spec: &ScatterChart) -> crate::Result<()> {
    let points = || spec.groups.iter().flat_map(|g| g.points.iter());
    let (Some(x_range), Some(y_range)) = (
        value_range(points().map(|(x, _)| *x)),
        value_range(points().map(|(_, y)| *y)),
    ) else {
        return draw_placeholder(root, &spec.title);
    };
    let (x_lo, x_hi) = padded(x_range);
    let (y_lo, y_hi) = padded(y_range);

    let mut chart = ChartBuilder::on(root)
        .caption(&spec.title, ("sans-serif", 22))
        .margin(10)
        .x_label_area_size(45)
        .y_label_area_size(70)
        .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)?;

    chart
        .configure_mesh()
        .x_desc(spec.x_label.as_str())
        .y_desc(spec.y_label.as_str())
        .axis_desc_style(("sans-serif", 15))
        .draw()?;

    for (index, group) in spec.groups.iter().enumerate() {
        let color = series_color(index);
        chart
            .draw_series(
                group
                    .points
                    .iter()
                    .map(move |&point| Circle::new(point, 3, color.mix(0.6).filled())),
            )?
            .label(group.name.as_str())
            .legend(move |(x, y)| Circle::new((x + 5, y), 4, color.filled()));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;
    Ok(())
}

/// Ring segment between two angles, as a polygon in pixel space
fn ring_segment(
    center: (i32, i32),
    outer: f64,
    inner: f64,
    start: f64,
    end: f64,
) -> Vec<(i32, i32)> {
    let steps = (((end - start) / (2.0 * PI)) * 180.0).ceil().max(2.0) as usize;
    let at = |radius: f64, angle: f64| {
        (
            center.0 + (radius * angle.cos()).round() as i32,
            center.1 + (radius * angle.sin()).round() as i32,
        )
    };

    let outer_arc = (0..=steps).map(|i| at(outer, start + (end - start) * i as f64 / steps as f64));
    let inner_arc = (0..=steps)
        .rev()
        .map(|i| at(inner, start + (end - start) * i as f64 / steps as f64));
    outer_arc.chain(inner_arc).collect()
}

fn draw_donut(root: &Area<'_>, spec: &DonutChart) -> crate::Result<()> {
    if spec.slices.is_empty() {
        return draw_placeholder(root, &spec.title);
    }

    let (width, height) = root.dim_in_pixel();
    let caption = TextStyle::from(("sans-serif", 22).into_font())
        .pos(Pos::new(HPos::Center, VPos::Top));
    root.draw(&Text::new(spec.title.clone(), (width as i32 / 2, 10), caption))?;

    let center = (width as i32 / 2 - 120, height as i32 / 2 + 20);
    let outer = (height as f64 / 2.0 - 60.0).max(40.0);
    let inner = outer * spec.hole.clamp(0.0, 0.95);
    let label_style = TextStyle::from(("sans-serif", 13).into_font())
        .pos(Pos::new(HPos::Center, VPos::Center));

    // Clockwise from twelve o'clock
    let mut start = -PI / 2.0;
    for (index, slice) in spec.slices.iter().enumerate() {
        let color = series_color(index);
        let end = start + slice.share * 2.0 * PI;
        root.draw(&Polygon::new(
            ring_segment(center, outer, inner, start, end),
            color.filled(),
        ))?;

        let middle = (start + end) / 2.0;
        let radius = (outer + inner) / 2.0;
        let anchor = (
            center.0 + (radius * middle.cos()).round() as i32,
            center.1 + (radius * middle.sin()).round() as i32,
        );
        root.draw(&Text::new(
            format!("{:.1}%", slice.share * 100.0),
            anchor,
            label_style.clone(),
        ))?;

        let legend_y = 80 + index as i32 * 24;
        let legend_x = width as i32 - 260;
        root.draw(&Rectangle::new(
            [(legend_x, legend_y), (legend_x + 14, legend_y + 14)],
            color.filled(),
        ))?;
        root.draw(&Text::new(
            format!("{} ({})", slice.label, slice.count),
            (legend_x + 22, legend_y),
            ("sans-serif", 14).into_font(),
        ))?;

        start = end;
    }
    Ok(())
}

/// Colour for a correlation in -1..=1; grey for undefined values
fn blues(value: f64) -> RGBColor {
    if value.is_nan() {
        return RGBColor(220, 220, 220);
    }
    let t = ((value + 1.0) / 2.0).clamp(0.0, 1.0);
    let mix = |lo: u8, hi: u8| (lo as f64 + (hi as f64 - lo as f64) * t).round() as u8;
    RGBColor(
        mix(BLUES_LOW.0, BLUES_HIGH.0),
        mix(BLUES_LOW.1, BLUES_HIGH.1),
        mix(BLUES_LOW.2, BLUES_HIGH.2),
    )
}

fn short_name(name: &str) -> String {
    const MAX: usize = 24;
    if name.chars().count() <= MAX {
        name.to_string()
    } else {
        let head: String = name.chars().take(MAX - 1).collect();
        format!("{head}…")
    }
}

fn draw_heatmap(root: &Area<'_>, spec: &HeatmapChart) -> crate::Result<()> {
    let matrix = &spec.matrix;
    if matrix.is_empty() {
        return draw_placeholder(root, &spec.title);
    }

    let (width, height) = root.dim_in_pixel();
    let caption = TextStyle::from(("sans-serif", 22).into_font())
        .pos(Pos::new(HPos::Center, VPos::Top));
    root.draw(&Text::new(spec.title.clone(), (width as i32 / 2, 10), caption))?;

    let (left, top, right, bottom) = (200, 50, 90, 170);
    let n = matrix.len() as i32;
    let cell = ((width as i32 - left - right) / n)
        .min((height as i32 - top - bottom) / n)
        .max(4);

    let annotation = TextStyle::from(("sans-serif", (cell / 4).clamp(6, 14)).into_font())
        .pos(Pos::new(HPos::Center, VPos::Center));
    let row_label = TextStyle::from(("sans-serif", 11).into_font())
        .pos(Pos::new(HPos::Right, VPos::Center));
    let col_label = TextStyle::from(
        ("sans-serif", 11)
            .into_font()
            .transform(FontTransform::Rotate270),
    )
    .pos(Pos::new(HPos::Right, VPos::Center));

    for row in 0..matrix.len() {
        let y = top + row as i32 * cell;
        root.draw(&Text::new(
            short_name(&matrix.columns[row]),
            (left - 6, y + cell / 2),
            row_label.clone(),
        ))?;

        for col in 0..matrix.len() {
            let x = left + col as i32 * cell;
            let value = matrix.get(row, col);
            let fill = blues(value);
            root.draw(&Rectangle::new([(x, y), (x + cell, y + cell)], fill.filled()))?;
            root.draw(&Rectangle::new([(x, y), (x + cell, y + cell)], RED.stroke_width(2)))?;

            let ink = if value.is_finite() && value > 0.2 { WHITE } else { BLACK };
            let text = if value.is_nan() { "NaN".to_string() } else { format!("{value:.2}") };
            root.draw(&Text::new(
                text,
                (x + cell / 2, y + cell / 2),
                annotation.clone().color(&ink),
            ))?;
        }
    }

    let grid_bottom = top + n * cell;
    for col in 0..matrix.len() {
        let x = left + col as i32 * cell + cell / 2;
        root.draw(&Text::new(
            short_name(&matrix.columns[col]),
            (x, grid_bottom + 6),
            col_label.clone(),
        ))?;
    }

    // Colour bar from +1 (top) to -1 (bottom)
    let bar_x = left + n * cell + 20;
    let steps = 40;
    let step_height = (n * cell / steps).max(1);
    for step in 0..steps {
        let value = 1.0 - 2.0 * step as f64 / (steps - 1) as f64;
        let y = top + step * step_height;
        root.draw(&Rectangle::new(
            [(bar_x, y), (bar_x + 18, y + step_height)],
            blues(value).filled(),
        ))?;
    }
    let tick_style = TextStyle::from(("sans-serif", 12).into_font())
        .pos(Pos::new(HPos::Left, VPos::Center));
    root.draw(&Text::new("+1".to_string(), (bar_x + 24, top), tick_style.clone()))?;
    root.draw(&Text::new(
        "-1".to_string(),
        (bar_x + 24, top + steps * step_height),
        tick_style,
    ))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{correlation_matrix, proportions};
    use polars::prelude::df;

    fn histogram_chart(groups: Vec<Group>) -> Chart {
        Chart::Histogram(HistogramChart {
            title: "Customer_Age".to_string(),
            x_label: "Customer_Age".to_string(),
            groups,
            bins: 25,
            kde: true,
            rug: true,
            opacity: 0.75,
        })
    }

    #[test]
    fn test_histogram_renders_svg() {
        let chart = histogram_chart(vec![
            Group::new("Existing Customer", vec![30.0, 41.0, 45.0, 52.0, 60.0]),
            Group::new("Attrited Customer", vec![44.0, 47.0, 49.0]),
        ]);
        let svg = chart.to_svg().unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Existing Customer"));
    }

    #[test]
    fn test_empty_charts_render_placeholder() {
        let charts = vec![
            histogram_chart(vec![Group::new("Existing Customer", Vec::new())]),
            Chart::Donut(DonutChart {
                title: "Combined".to_string(),
                slices: Vec::new(),
                hole: 0.4,
            }),
            Chart::Scatter(ScatterChart {
                title: "Scatter".to_string(),
                x_label: "x".to_string(),
                y_label: "y".to_string(),
                groups: Vec::new(),
            }),
            Chart::Box(BoxChart {
                title: "Box".to_string(),
                x_label: "x".to_string(),
                y_label: "y".to_string(),
                groups: Vec::new(),
            }),
        ];

        for chart in charts {
            let svg = chart.to_svg().unwrap();
            assert!(svg.contains("No data"), "{} should show a placeholder", chart.title());
        }
    }

    #[test]
    fn test_donut_lists_labels_and_shares() {
        let labels: Vec<String> = std::iter::repeat("M - Existing Customer".to_string())
            .take(8)
            .chain(std::iter::repeat("M - Attrited Customer".to_string()).take(2))
            .collect();
        let chart = Chart::Donut(DonutChart {
            title: "Combined Gender and Attrition Distribution".to_string(),
            slices: proportions(&labels).unwrap(),
            hole: 0.4,
        });
        let svg = chart.to_svg().unwrap();
        assert!(svg.contains("80.0%"));
        assert!(svg.contains("20.0%"));
        assert!(svg.contains("M - Attrited Customer"));
    }

    #[test]
    fn test_bar_box_and_heatmap_render() {
        let bar = Chart::Bar(BarChart {
            title: "Bars".to_string(),
            x_label: "Marital_Status".to_string(),
            y_label: "Total_Trans_Amt".to_string(),
            bars: vec![("Married".to_string(), 2435.0), ("Single".to_string(), 1291.0)],
        });
        assert!(bar.to_svg().unwrap().contains("<svg"));

        let boxes = Chart::Box(BoxChart {
            title: "Boxes".to_string(),
            x_label: "Education Level".to_string(),
            y_label: "Avg Utilization Ratio".to_string(),
            groups: vec![
                Group::new("Graduate", vec![0.1, 0.2, 0.3, 0.9]),
                Group::new("Doctorate", vec![0.05]),
            ],
        });
        assert!(boxes.to_svg().unwrap().contains("<svg"));

        let frame = df!("a" => [1.0, 2.0, 3.0], "b" => [3.0, 1.0, 2.0]).unwrap();
        let matrix = correlation_matrix(&frame).unwrap();
        let heatmap = Chart::Heatmap(HeatmapChart {
            title: "Correlation".to_string(),
            matrix,
        });
        let svg = heatmap.to_svg().unwrap();
        assert!(svg.contains("1.00"));
    }

    #[test]
    fn test_blues_scale_ends() {
        let RGBColor(r, g, b) = blues(-1.0);
        assert_eq!((r, g, b), (247, 251, 255));
        let RGBColor(r, g, b) = blues(1.0);
        assert_eq!((r, g, b), (8, 48, 107));
        let RGBColor(r, g, b) = blues(f64::NAN);
        assert_eq!((r, g, b), (220, 220, 220));
    }

    #[test]
    fn test_short_name_truncates() {
        assert_eq!(short_name("Gender"), "Gender");
        let long = short_name("Naive_Bayes_Classifier_Attrition_Flag");
        assert_eq!(long.chars().count(), 24);
        assert!(long.ends_with('…'));
    }
}
