use std::iter::once;
use std::ops::Range;

use comfy_table::presets::UTF8_NO_BORDERS;
use comfy_table::{Cell, ContentArrangement, Table};
use itertools::Itertools;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::{Palette, Palette99};

use crate::{Chance, Count, Curve};

#[allow(type_alias_bounds)]
pub type ChartResult<DB: DrawingBackend> = Result<(), DrawingAreaErrorKind<DB::ErrorType>>;

const MARK_COLOR: RGBColor = RGBColor(0xD6, 0x27, 0x28);
const LEGEND_WIDTH: i32 = 20;

pub trait PrintExt {
    fn table(&self) -> String;

    fn plot<DB>(&self, title: &str, area: &DrawingArea<DB, Shift>) -> ChartResult<DB>
    where
        DB: DrawingBackend;

    fn print_table(&self) {
        print!("{}", self.table());
    }
}

impl PrintExt for [Curve] {
    fn table(&self) -> String {
        table(self)
    }

    fn plot<DB>(&self, title: &str, area: &DrawingArea<DB, Shift>) -> ChartResult<DB>
    where
        DB: DrawingBackend,
    {
        let lines = self.iter().map(|c| Line::linear(c, Count::MAX)).collect();
        Chart::new(title, "k", "win chance", lines)
            .legend()
            .draw(area)
    }
}

impl PrintExt for Curve {
    fn table(&self) -> String {
        std::slice::from_ref(self).table()
    }

    fn plot<DB>(&self, title: &str, area: &DrawingArea<DB, Shift>) -> ChartResult<DB>
    where
        DB: DrawingBackend,
    {
        let lines = vec![Line::linear(self, Count::MAX)];
        let chart = Chart::new(title, "k", self.label(), lines);
        chart.draw(area)
    }
}

/// Curves side by side, one row per adversary count.
pub fn table(curves: &[Curve]) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_NO_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            once(Cell::new("k"))
                .chain(curves.iter().map(|c| Cell::new(c.label())))
                .collect::<Vec<_>>(),
        );

    let counts = curves
        .iter()
        .flat_map(|c| c.points().iter().map(|&(k, _)| k))
        .sorted()
        .dedup();
    for k in counts {
        table.add_row(
            once(Cell::new(k))
                .chain(curves.iter().map(|c| match c.value_at(k) {
                    Some(p) => Cell::new(format!("{p:.6}")),
                    None => Cell::new("-"),
                }))
                .collect::<Vec<_>>(),
        );
    }

    format!("{table}\n")
}

/// Plot-ready series in chart coordinates.
#[derive(Debug, Clone)]
pub(crate) struct Line {
    label: String,
    points: Vec<(f64, f64)>,
}

#[derive(Debug, Clone)]
pub(crate) struct Mark {
    x: f64,
    y: f64,
    label: String,
}

#[derive(Debug, Clone)]
pub(crate) struct Chart {
    title: String,
    x_desc: String,
    y_desc: String,
    x_range: Option<Range<f64>>,
    y_range: Option<Range<f64>>,
    lines: Vec<Line>,
    marks: Vec<Mark>,
    legend: bool,
}

impl Line {
    /// Points with `k <= limit`; non-finite values dropped.
    pub(crate) fn linear(curve: &Curve, limit: Count) -> Self {
        Self::project(curve, limit, |k| Some(k as f64), Some)
    }

    /// `log10` of the values, and of `k` too when `log_x` is set. Points
    /// that have no logarithm are dropped.
    pub(crate) fn log(curve: &Curve, limit: Count, log_x: bool) -> Self {
        let x = |k: Count| {
            if log_x {
                log10(k as f64)
            } else {
                Some(k as f64)
            }
        };
        Self::project(curve, limit, x, log10)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    fn project<X, Y>(curve: &Curve, limit: Count, x: X, y: Y) -> Self
    where
        X: Fn(Count) -> Option<f64>,
        Y: Fn(Chance) -> Option<f64>,
    {
        let points = curve
            .points()
            .iter()
            .filter(|&&(k, _)| k <= limit)
            .filter_map(|&(k, p)| Some((x(k)?, y(p)?)))
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .collect();
        Self {
            label: curve.label().to_owned(),
            points,
        }
    }
}

impl Mark {
    pub(crate) fn new(k: Count, p: Chance) -> Self {
        Self {
            x: k as f64,
            y: p,
            label: format!("k={k}, p={p:.4}"),
        }
    }
}

impl Chart {
    pub(crate) fn new(title: &str, x_desc: &str, y_desc: &str, lines: Vec<Line>) -> Self {
        Self {
            title: title.to_owned(),
            x_desc: x_desc.to_owned(),
            y_desc: y_desc.to_owned(),
            x_range: None,
            y_range: None,
            lines,
            marks: Vec::new(),
            legend: false,
        }
    }

    #[must_use]
    pub(crate) fn x_range(mut self, range: Range<f64>) -> Self {
        self.x_range = Some(range);
        self
    }

    #[must_use]
    pub(crate) fn y_range(mut self, range: Range<f64>) -> Self {
        self.y_range = Some(range);
        self
    }

    #[must_use]
    pub(crate) fn marks(mut self, marks: Vec<Mark>) -> Self {
        self.legend |= !marks.is_empty();
        self.marks = marks;
        self
    }

    pub(crate) fn is_blank(&self) -> bool {
        self.lines.iter().all(Line::is_empty) && self.marks.is_empty()
    }

    #[must_use]
    pub(crate) fn legend(mut self) -> Self {
        self.legend = true;
        self
    }

    pub(crate) fn draw<DB>(&self, area: &DrawingArea<DB, Shift>) -> ChartResult<DB>
    where
        DB: DrawingBackend,
    {
        let x_range = self
            .x_range
            .clone()
            .unwrap_or_else(|| span(self.values(|&(x, _)| x)));
        let y_range = self
            .y_range
            .clone()
            .unwrap_or_else(|| span(self.values(|&(_, y)| y)));

        area.fill(&WHITE)?;
        let mut chart = ChartBuilder::on(area);
        chart
            .x_label_area_size(35)
            .y_label_area_size(60)
            .margin(10)
            .caption(self.title.as_str(), ("sans-serif", 16.0));

        let mut coord = chart.build_cartesian_2d(x_range, y_range)?;

        coord
            .configure_mesh()
            .x_desc(self.x_desc.as_str())
            .y_desc(self.y_desc.as_str())
            .draw()?;

        for (i, line) in self.lines.iter().enumerate() {
            let style = Palette99::pick(i).stroke_width(2);
            coord
                .draw_series(LineSeries::new(line.points.iter().copied(), style))?
                .label(line.label.as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + LEGEND_WIDTH, y)], style));
        }

        for mark in &self.marks {
            let style = MARK_COLOR.filled();
            coord
                .draw_series(once(Circle::new((mark.x, mark.y), 4, style)))?
                .label(mark.label.as_str())
                .legend(move |(x, y)| Circle::new((x + LEGEND_WIDTH / 2, y), 4, style));
        }

        if self.legend {
            coord
                .configure_series_labels()
                .background_style(&WHITE.mix(0.8))
                .border_style(&BLACK)
                .draw()?;
        }

        Ok(())
    }

    fn values(&self, axis: fn(&(f64, f64)) -> f64) -> impl Iterator<Item = f64> + '_ {
        self.lines
            .iter()
            .flat_map(|l| l.points.iter().copied())
            .chain(self.marks.iter().map(|m| (m.x, m.y)))
            .map(move |p| axis(&p))
    }
}

fn log10(value: f64) -> Option<f64> {
    (value > 0.0).then(|| value.log10())
}

/// Padded `[min, max]` of the values, `0..1` when there are none.
fn span(values: impl Iterator<Item = f64>) -> Range<f64> {
    match values.minmax_by(f64::total_cmp).into_option() {
        None => 0.0..1.0,
        Some((lo, hi)) if hi - lo < f64::EPSILON => (lo - 0.5)..(hi + 0.5),
        Some((lo, hi)) => {
            let pad = (hi - lo) * 0.05;
            (lo - pad)..(hi + pad)
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn table_joins_curves_by_count() {
        let a = Curve::new("a", vec![(1, 0.5), (2, 0.25)]);
        let b = Curve::new("b", vec![(2, 1.0)]);
        let out = table(&[a, b]);
        // keep data tokens, drop box-drawing separators
        let rows = out
            .lines()
            .map(|line| {
                line.split_whitespace()
                    .filter(|t| t.starts_with(|c: char| c.is_ascii_alphanumeric()) || *t == "-")
                    .collect::<Vec<_>>()
            })
            .filter(|r| !r.is_empty())
            .collect::<Vec<_>>();
        assert_eq!(rows[0], vec!["k", "a", "b"]);
        assert!(rows.iter().any(|r| r.contains(&"0.500000") && r.contains(&"-")));
        assert!(rows.iter().any(|r| r.contains(&"0.250000") && r.contains(&"1.000000")));
    }

    #[test]
    fn plots_onto_any_backend() {
        let curves = vec![
            Curve::new("first", vec![(1, 0.5), (2, 0.75), (3, 0.8)]),
            Curve::new("second", vec![(1, 0.2), (2, 0.4)]),
        ];
        let mut svg = String::new();
        {
            let area = SVGBackend::with_string(&mut svg, (400, 300)).into_drawing_area();
            curves.plot("two curves", &area).unwrap();
            area.present().unwrap();
        }
        assert!(svg.contains("<svg"));
        assert!(svg.contains("two curves"));
        assert!(svg.contains("second"));
    }

    #[test]
    fn log_lines_drop_non_positive_values() {
        let curve = Curve::new("d", vec![(1, 0.1), (2, 0.0), (3, -0.5), (10, 0.01), (200, 1.0)]);
        let line = Line::log(&curve, 100, true);
        let expected = vec![(0.0, 0.1f64.log10()), (10f64.log10(), 0.01f64.log10())];
        assert_eq!(line.points, expected);
        let line = Line::log(&curve, 100, false);
        assert_eq!(line.points, vec![(1.0, 0.1f64.log10()), (10.0, 0.01f64.log10())]);
    }

    #[test]
    fn span_pads_range() {
        assert_eq!(span([].into_iter()), 0.0..1.0);
        assert_eq!(span([2.0].into_iter()), 1.5..2.5);
        let range = span([0.0, 1.0].into_iter());
        assert!((range.start + 0.05).abs() < 1e-12 && (range.end - 1.05).abs() < 1e-12);
    }
}
