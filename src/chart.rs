//! Six-panel dashboard image (2 rows x 3 columns) built from analysis rows.
//!
//! Panel data is computed up front by [`DashboardData::from_rows`]; the
//! drawing functions only lay it out. A `.svg` target uses the vector
//! backend, anything else is rendered as a bitmap.

use std::ops::Range;
use std::path::{Path, PathBuf};

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use tracing::{debug, info};

use crate::error::AnalyzerError;
use crate::model::{AnalysisRow, OptionType};
use crate::output;

pub const DASHBOARD_TITLE: &str = "NSE Options Trading Analysis Dashboard";
pub const DASHBOARD_SIZE: (u32, u32) = (2400, 1500);
/// Percentile at which the range panel switches bar colour.
pub const PERCENTILE_MIDPOINT: f64 = 50.0;

const CALL_COLOR: RGBColor = RGBColor(0x66, 0x7e, 0xea);
const PUT_COLOR: RGBColor = RGBColor(0xf0, 0x93, 0xfb);
const CALL_PREMIUM_COLOR: RGBColor = RGBColor(0x4f, 0xac, 0xfe);
const PUT_PREMIUM_COLOR: RGBColor = RGBColor(0x00, 0xf2, 0xfe);
const UPPER_HALF_COLOR: RGBColor = RGBColor(0x43, 0xe9, 0x7b);
const LOWER_HALF_COLOR: RGBColor = RGBColor(0xfa, 0x70, 0x9a);

const FONT: &str = "sans-serif";
const GROUPED_BAR_WIDTH: f64 = 0.35;

type DrawResult<T, DB> = Result<T, DrawingAreaErrorKind<<DB as DrawingBackend>::ErrorType>>;

/// Per-panel series, all in input row order.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardData {
    pub symbols: Vec<String>,
    pub ce_irr: Vec<f64>,
    pub pe_irr: Vec<f64>,
    pub ce_premium: Vec<f64>,
    pub pe_premium: Vec<f64>,
    pub percentile: Vec<f64>,
    pub spot: Vec<f64>,
    pub ce_strike: Vec<f64>,
    pub pe_strike: Vec<f64>,
    pub avg_ce_irr: f64,
    pub avg_pe_irr: f64,
    pub ce_ratio: Vec<f64>,
    pub pe_ratio: Vec<f64>,
}

impl DashboardData {
    pub fn from_rows(rows: &[AnalysisRow]) -> Result<Self, AnalyzerError> {
        if rows.is_empty() {
            return Err(AnalyzerError::NoData);
        }
        let col = |f: fn(&AnalysisRow) -> f64| rows.iter().map(f).collect::<Vec<f64>>();
        let ce_irr = col(|r| r.ce_irr);
        let pe_irr = col(|r| r.pe_irr);
        Ok(Self {
            symbols: rows.iter().map(|r| r.symbol.clone()).collect(),
            avg_ce_irr: mean(&ce_irr),
            avg_pe_irr: mean(&pe_irr),
            ce_irr,
            pe_irr,
            ce_premium: col(|r| r.ce_premium),
            pe_premium: col(|r| r.pe_premium),
            percentile: col(|r| r.percentile),
            spot: col(|r| r.spot_price),
            ce_strike: col(|r| r.ce_strike),
            pe_strike: col(|r| r.pe_strike),
            ce_ratio: col(|r| r.premium_to_strike_pct(OptionType::Call)),
            pe_ratio: col(|r| r.premium_to_strike_pct(OptionType::Put)),
        })
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

pub fn percentile_color(percentile: f64) -> RGBColor {
    if percentile >= PERCENTILE_MIDPOINT {
        UPPER_HALF_COLOR
    } else {
        LOWER_HALF_COLOR
    }
}

/// Axis range covering `values` with `pad` (fraction of the span) on each
/// side. With `include_zero` the range always spans 0 and is not padded
/// past it.
pub fn value_range<I: IntoIterator<Item = f64>>(values: I, include_zero: bool, pad: f64) -> Range<f64> {
    let (mut lo, mut hi) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if lo > hi {
        return 0.0..1.0;
    }
    if include_zero {
        lo = lo.min(0.0);
        hi = hi.max(0.0);
    }
    let span = hi - lo;
    let margin = if span > 0.0 {
        span * pad
    } else {
        hi.abs().max(1.0) * pad.max(0.1)
    };
    let start = if include_zero && lo == 0.0 { 0.0 } else { lo - margin };
    let end = if include_zero && hi == 0.0 { 0.0 } else { hi + margin };
    start..end
}

/// Text for a category axis tick; empty between categories.
pub fn category_label(labels: &[String], x: f64) -> String {
    let idx = x.round();
    if (x - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}

fn indexed(values: &[f64]) -> Vec<(f64, f64)> {
    values.iter().enumerate().map(|(i, v)| (i as f64, *v)).collect()
}

/// Category `i` sits at `i`; ticks between categories get empty labels.
fn category_axis(n: usize) -> Range<f64> {
    -0.5..n as f64 - 0.5
}

/// Render the dashboard and return the path written.
///
/// Without `filename`, writes `Options_Analysis_Graphs_YYYYMMDD_HHMMSS.png`.
pub fn render_dashboard(
    rows: &[AnalysisRow],
    filename: Option<&Path>,
) -> Result<PathBuf, AnalyzerError> {
    let data = DashboardData::from_rows(rows)?;
    let path = output::resolve_filename(filename, "Options_Analysis_Graphs", "png");
    let svg = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("svg"));

    info!("Generating graphs...");
    if svg {
        let root = SVGBackend::new(&path, DASHBOARD_SIZE).into_drawing_area();
        draw_dashboard(&root, &data).map_err(chart_error)?;
    } else {
        let root = BitMapBackend::new(&path, DASHBOARD_SIZE).into_drawing_area();
        draw_dashboard(&root, &data).map_err(chart_error)?;
    }
    debug!(symbols = data.len(), svg, "dashboard rendered");
    info!("Graphs saved: {}", path.display());
    Ok(path)
}

fn chart_error<E: std::error::Error + Send + Sync>(e: DrawingAreaErrorKind<E>) -> AnalyzerError {
    AnalyzerError::Chart(e.to_string())
}

fn draw_dashboard<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    data: &DashboardData,
) -> DrawResult<(), DB> {
    root.fill(&WHITE)?;
    let body = root.titled(DASHBOARD_TITLE, (FONT, 40).into_font().style(FontStyle::Bold))?;
    let panels = body.split_evenly((2, 3));

    draw_grouped_bars(
        &panels[0],
        data,
        "Call vs Put IRR Comparison",
        "IRR (%)",
        [("CE IRR", &data.ce_irr, CALL_COLOR), ("PE IRR", &data.pe_irr, PUT_COLOR)],
    )?;
    draw_grouped_bars(
        &panels[1],
        data,
        "Call vs Put Premium Comparison",
        "Premium (Rs)",
        [
            ("CE Premium", &data.ce_premium, CALL_PREMIUM_COLOR),
            ("PE Premium", &data.pe_premium, PUT_PREMIUM_COLOR),
        ],
    )?;
    draw_percentiles(&panels[2], data)?;
    draw_spot_vs_strikes(&panels[3], data)?;
    draw_average_irr(&panels[4], data)?;
    draw_premium_ratios(&panels[5], data)?;

    root.present()?;
    Ok(())
}

fn caption_font() -> FontDesc<'static> {
    (FONT, 24).into_font().style(FontStyle::Bold)
}

fn rotated_label_font() -> FontDesc<'static> {
    (FONT, 14).into_font().transform(FontTransform::Rotate90)
}

fn grid_style() -> ShapeStyle {
    BLACK.mix(0.15).stroke_width(1)
}

fn legend_box(color: RGBColor) -> impl Fn((i32, i32)) -> Rectangle<(i32, i32)> {
    move |(x, y)| Rectangle::new([(x, y - 6), (x + 14, y + 6)], color.mix(0.8).filled())
}

fn draw_legend<'a, DB, CT>(chart: &mut ChartContext<'a, DB, CT>) -> DrawResult<(), DB>
where
    DB: DrawingBackend + 'a,
    CT: CoordTranslate,
{
    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.85).filled())
        .border_style(BLACK.mix(0.4).stroke_width(1))
        .label_font((FONT, 14))
        .draw()
}

/// Side-by-side bars for two series sharing the symbol axis.
fn draw_grouped_bars<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    data: &DashboardData,
    title: &str,
    y_desc: &str,
    series: [(&str, &Vec<f64>, RGBColor); 2],
) -> DrawResult<(), DB> {
    let y_range = value_range(series.iter().flat_map(|(_, v, _)| v.iter().copied()), true, 0.1);
    let mut chart = ChartBuilder::on(area)
        .caption(title, caption_font())
        .margin(12)
        .x_label_area_size(110)
        .y_label_area_size(70)
        .build_cartesian_2d(category_axis(data.len()), y_range)?;

    chart
        .configure_mesh()
        .x_desc("Symbol")
        .y_desc(y_desc)
        .x_labels(data.len())
        .x_label_formatter(&|x| category_label(&data.symbols, *x))
        .x_label_style(rotated_label_font())
        .bold_line_style(grid_style())
        .light_line_style(WHITE.stroke_width(0))
        .draw()?;

    for (k, (label, values, color)) in series.into_iter().enumerate() {
        let offset = if k == 0 {
            -GROUPED_BAR_WIDTH / 2.0
        } else {
            GROUPED_BAR_WIDTH / 2.0
        };
        chart
            .draw_series(values.iter().enumerate().map(|(i, v)| {
                let center = i as f64 + offset;
                Rectangle::new(
                    [
                        (center - GROUPED_BAR_WIDTH / 2.0, 0.0),
                        (center + GROUPED_BAR_WIDTH / 2.0, *v),
                    ],
                    color.mix(0.8).filled(),
                )
            }))?
            .label(label)
            .legend(legend_box(color));
    }

    draw_legend(&mut chart)
}

/// Horizontal percentile bars with a reference line at the midpoint.
fn draw_percentiles<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    data: &DashboardData,
) -> DrawResult<(), DB> {
    let x_range = value_range(
        data.percentile
            .iter()
            .copied()
            .chain([0.0, 100.0]),
        true,
        0.12,
    );
    let n = data.len();
    let mut chart = ChartBuilder::on(area)
        .caption("52-Week Price Percentile", caption_font())
        .margin(12)
        .x_label_area_size(50)
        .y_label_area_size(120)
        .build_cartesian_2d(x_range, category_axis(n))?;

    chart
        .configure_mesh()
        .x_desc("Percentile (%)")
        .y_labels(n)
        .y_label_formatter(&|y| category_label(&data.symbols, *y))
        .disable_y_mesh()
        .bold_line_style(grid_style())
        .light_line_style(WHITE.stroke_width(0))
        .draw()?;

    chart.draw_series(data.percentile.iter().enumerate().map(|(i, p)| {
        let y = i as f64;
        Rectangle::new([(0.0, y - 0.4), (*p, y + 0.4)], percentile_color(*p).mix(0.8).filled())
    }))?;

    chart
        .draw_series(LineSeries::new(
            [(PERCENTILE_MIDPOINT, -0.5), (PERCENTILE_MIDPOINT, n as f64 - 0.5)],
            RED.stroke_width(2),
        ))?
        .label("50% Mark")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED.stroke_width(2)));

    let value_style = TextStyle::from((FONT, 13).into_font()).pos(Pos::new(HPos::Left, VPos::Center));
    chart.draw_series(data.percentile.iter().enumerate().map(|(i, p)| {
        Text::new(format!("{p:.1}%"), (p.max(0.0) + 1.0, i as f64), value_style.clone())
    }))?;

    draw_legend(&mut chart)
}

/// Spot and both strikes per symbol as three marked lines.
fn draw_spot_vs_strikes<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    data: &DashboardData,
) -> DrawResult<(), DB> {
    let y_range = value_range(
        data.spot
            .iter()
            .chain(&data.ce_strike)
            .chain(&data.pe_strike)
            .copied(),
        false,
        0.08,
    );
    let mut chart = ChartBuilder::on(area)
        .caption("Spot Price vs Strike Prices", caption_font())
        .margin(12)
        .x_label_area_size(110)
        .y_label_area_size(80)
        .build_cartesian_2d(category_axis(data.len()), y_range)?;

    chart
        .configure_mesh()
        .x_desc("Symbol")
        .y_desc("Price (Rs)")
        .x_labels(data.len())
        .x_label_formatter(&|x| category_label(&data.symbols, *x))
        .x_label_style(rotated_label_font())
        .bold_line_style(grid_style())
        .light_line_style(WHITE.stroke_width(0))
        .draw()?;

    let spot = indexed(&data.spot);
    let ce = indexed(&data.ce_strike);
    let pe = indexed(&data.pe_strike);

    chart
        .draw_series(LineSeries::new(spot.clone(), CALL_COLOR.stroke_width(3)))?
        .label("Spot Price")
        .legend(|(x, y)| Circle::new((x + 8, y), 5, CALL_COLOR.filled()));
    chart.draw_series(spot.iter().map(|p| Circle::new(*p, 7, CALL_COLOR.filled())))?;

    chart
        .draw_series(LineSeries::new(ce.clone(), CALL_PREMIUM_COLOR.stroke_width(2)))?
        .label("CE Strike")
        .legend(|(x, y)| Cross::new((x + 8, y), 5, CALL_PREMIUM_COLOR.stroke_width(2)));
    chart.draw_series(ce.iter().map(|p| Cross::new(*p, 6, CALL_PREMIUM_COLOR.stroke_width(2))))?;

    chart
        .draw_series(LineSeries::new(pe.clone(), PUT_COLOR.stroke_width(2)))?
        .label("PE Strike")
        .legend(|(x, y)| TriangleMarker::new((x + 8, y), 6, PUT_COLOR.filled()));
    chart.draw_series(pe.iter().map(|p| TriangleMarker::new(*p, 7, PUT_COLOR.filled())))?;

    draw_legend(&mut chart)
}

/// Mean IRR across all symbols, one bar per option type.
fn draw_average_irr<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    data: &DashboardData,
) -> DrawResult<(), DB> {
    let labels = vec!["Call Options".to_string(), "Put Options".to_string()];
    let bars = [(data.avg_ce_irr, CALL_COLOR), (data.avg_pe_irr, PUT_COLOR)];
    let y_range = value_range(bars.iter().map(|(v, _)| *v), true, 0.15);

    let mut chart = ChartBuilder::on(area)
        .caption("Average IRR Comparison", caption_font())
        .margin(12)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(category_axis(bars.len()), y_range)?;

    chart
        .configure_mesh()
        .y_desc("Average IRR (%)")
        .x_labels(labels.len())
        .x_label_formatter(&|x| category_label(&labels, *x))
        .x_label_style((FONT, 16))
        .disable_x_mesh()
        .bold_line_style(grid_style())
        .light_line_style(WHITE.stroke_width(0))
        .draw()?;

    chart.draw_series(bars.iter().enumerate().map(|(i, (v, color))| {
        let x = i as f64;
        Rectangle::new([(x - 0.3, 0.0), (x + 0.3, *v)], color.mix(0.8).filled())
    }))?;

    let value_style = TextStyle::from((FONT, 18).into_font().style(FontStyle::Bold))
        .pos(Pos::new(HPos::Center, VPos::Bottom));
    chart.draw_series(bars.iter().enumerate().map(|(i, (v, _))| {
        Text::new(format!("{v:.2}%"), (i as f64, *v), value_style.clone())
    }))?;

    Ok(())
}

/// Premium as a percentage of strike, per symbol and option type.
fn draw_premium_ratios<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    data: &DashboardData,
) -> DrawResult<(), DB> {
    let y_range = value_range(
        data.ce_ratio.iter().chain(&data.pe_ratio).copied(),
        true,
        0.1,
    );
    let mut chart = ChartBuilder::on(area)
        .caption("Premium to Strike Price Ratio", caption_font())
        .margin(12)
        .x_label_area_size(110)
        .y_label_area_size(70)
        .build_cartesian_2d(category_axis(data.len()), y_range)?;

    chart
        .configure_mesh()
        .x_desc("Symbol")
        .y_desc("Premium/Strike Ratio (%)")
        .x_labels(data.len())
        .x_label_formatter(&|x| category_label(&data.symbols, *x))
        .x_label_style(rotated_label_font())
        .bold_line_style(grid_style())
        .light_line_style(WHITE.stroke_width(0))
        .draw()?;

    for (label, values, color) in [
        ("CE Ratio", &data.ce_ratio, CALL_COLOR),
        ("PE Ratio", &data.pe_ratio, PUT_COLOR),
    ] {
        chart
            .draw_series(values.iter().enumerate().map(|(i, v)| {
                Circle::new((i as f64, *v), 9, color.mix(0.7).filled())
            }))?
            .label(label)
            .legend(move |(x, y)| Circle::new((x + 8, y), 6, color.mix(0.7).filled()));
        chart.draw_series(
            values
                .iter()
                .enumerate()
                .map(|(i, v)| Circle::new((i as f64, *v), 9, BLACK.stroke_width(1))),
        )?;
    }

    draw_legend(&mut chart)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisConfig;
    use crate::metrics;
    use crate::source::SampleSource;

    fn sample_rows() -> Vec<AnalysisRow> {
        metrics::analyze(&SampleSource::records(), &AnalysisConfig::default())
    }

    #[test]
    fn test_dashboard_data_from_sample() {
        let data = DashboardData::from_rows(&sample_rows()).unwrap();
        assert_eq!(data.len(), 10);
        assert_eq!(data.symbols[0], "NIFTY");
        assert_eq!(data.ce_irr[0], 1607.56);
        assert_eq!(data.pe_strike[0], 22400.0);
        assert!((data.avg_ce_irr - 1593.123).abs() < 1e-9);
        assert!((data.avg_pe_irr - 1253.928).abs() < 1e-9);
        // 3290 / 16600 * 100
        assert!((data.ce_ratio[0] - 19.819277108433734).abs() < 1e-9);
    }

    #[test]
    fn test_dashboard_data_empty() {
        assert!(DashboardData::from_rows(&[]).unwrap_err().is_no_data());
    }

    #[test]
    fn test_percentile_color_threshold() {
        assert_eq!(percentile_color(50.0), UPPER_HALF_COLOR);
        assert_eq!(percentile_color(75.0), UPPER_HALF_COLOR);
        assert_eq!(percentile_color(49.99), LOWER_HALF_COLOR);
        assert_eq!(percentile_color(-10.0), LOWER_HALF_COLOR);
    }

    #[test]
    fn test_value_range() {
        let r = value_range([1.0, 2.0, 3.0], true, 0.1);
        assert_eq!(r.start, 0.0);
        assert!((r.end - 3.3).abs() < 1e-9);

        let r = value_range([5.0, 5.0], false, 0.1);
        assert!((r.start - 4.5).abs() < 1e-9);
        assert!((r.end - 5.5).abs() < 1e-9);

        let r = value_range([-10.0, 10.0], true, 0.5);
        assert_eq!(r, -20.0..20.0);

        assert_eq!(value_range(std::iter::empty(), true, 0.1), 0.0..1.0);
    }

    #[test]
    fn test_category_label() {
        let labels = vec!["NIFTY".to_string(), "SBIN".to_string()];
        assert_eq!(category_label(&labels, 0.0), "NIFTY");
        assert_eq!(category_label(&labels, 1.0), "SBIN");
        assert_eq!(category_label(&labels, 0.5), "");
        assert_eq!(category_label(&labels, 2.0), "");
        assert_eq!(category_label(&labels, -1.0), "");
    }

    #[test]
    fn test_render_empty_no_file() {
        let path = std::env::temp_dir().join(format!("oa_empty_{}.png", std::process::id()));
        let err = render_dashboard(&[], Some(&path)).unwrap_err();
        assert!(err.is_no_data());
        assert!(!path.exists());
    }

    #[test]
    fn test_render_svg_panels() {
        let path = std::env::temp_dir().join(format!("oa_dash_{}.svg", std::process::id()));
        let written = match render_dashboard(&sample_rows(), Some(&path)) {
            Ok(p) => p,
            // Text layout needs a system font; nothing else to check without one
            Err(AnalyzerError::Chart(msg)) if msg.to_lowercase().contains("font") => {
                eprintln!("skipping SVG text checks: {msg}");
                std::fs::remove_file(&path).ok();
                return;
            }
            Err(e) => panic!("render failed: {e}"),
        };
        assert_eq!(written, path);

        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(!svg.is_empty());
        for text in [
            DASHBOARD_TITLE,
            "Call vs Put IRR Comparison",
            "Call vs Put Premium Comparison",
            "52-Week Price Percentile",
            "Spot Price vs Strike Prices",
            "Average IRR Comparison",
            "Premium to Strike Price Ratio",
            "50% Mark",
            "NIFTY",
            "75.0%",
        ] {
            assert!(svg.contains(text), "missing {text:?}");
        }
        // Panel order follows the drawing order
        let irr = svg.find("Call vs Put IRR Comparison").unwrap();
        let ratio = svg.find("Premium to Strike Price Ratio").unwrap();
        assert!(irr < ratio);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    #[ignore] // Requires a system font stack
    fn test_render_png() {
        let path = std::env::temp_dir().join(format!("oa_dash_{}.png", std::process::id()));
        let written = render_dashboard(&sample_rows(), Some(&path)).unwrap();
        assert_eq!(written, path);
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
        std::fs::remove_file(&path).ok();
    }
}
