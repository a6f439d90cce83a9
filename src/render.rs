//! SVG charts of the sweeps, one file per chart.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use plotters::prelude::{DrawingAreaErrorKind, IntoDrawingArea, SVGBackend};
use thiserror::Error;

use crate::print::{Chart, Line, Mark};
use crate::{Count, Curve, Error, SweepConfig};

const CHART_SIZE: (u32, u32) = (800, 600);

#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Lottery(#[from] Error),
    #[error("io: {0}")]
    Io(#[from] io::Error),
    #[error("drawing failed: {0}")]
    Draw(String),
    #[error("sweep over N={0} produced no points")]
    EmptyCurve(Count),
}

impl<E> From<DrawingAreaErrorKind<E>> for RenderError
where
    E: std::error::Error + Send + Sync,
{
    fn from(e: DrawingAreaErrorKind<E>) -> Self {
        RenderError::Draw(e.to_string())
    }
}

pub type RenderResult<T> = Result<T, RenderError>;

/// Writes the charts for a lottery size into `out_dir`.
#[derive(Debug, Clone)]
pub struct Renderer {
    out_dir: PathBuf,
    config: SweepConfig,
}

impl Renderer {
    pub fn new(out_dir: impl Into<PathBuf>, config: SweepConfig) -> Self {
        Self {
            out_dir: out_dir.into(),
            config,
        }
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Every chart for `total`; returns the written paths.
    pub fn render(&self, total: Count) -> RenderResult<Vec<PathBuf>> {
        let mut paths = self.render_average(total)?;
        paths.push(self.render_fixed_positions(total)?);
        Ok(paths)
    }

    /// Average win chance and its derived series.
    pub fn render_average(&self, total: Count) -> RenderResult<Vec<PathBuf>> {
        let curve = self.config.average_curve(total)?;
        let limit = self.limit(total, &curve)?;
        let x_range = 1.0..limit as f64;
        let title = format!("Win Chance vs Number of Adversary Balls, N={total}");

        let marks = self
            .config
            .highlights()
            .iter()
            .filter_map(|&k| curve.value_at(k).map(|p| Mark::new(k, p)))
            .collect();
        let average = Chart::new(
            &title,
            "Number of Adversary Balls (k)",
            "Average Win Chance",
            vec![Line::linear(&curve, limit)],
        )
        .x_range(x_range.clone())
        .y_range(0.5..1.0)
        .marks(marks);

        let ratio = Chart::new(
            &format!("N={total}"),
            "Number of Adversary Balls (k)",
            "p_loss / p_win * k",
            vec![Line::linear(&curve.loss_win_ratio(), limit)],
        )
        .x_range(x_range.clone())
        .y_range(0.0..2.0);

        let relative = Chart::new(
            &format!("N={total}"),
            "Number of Adversary Balls (k)",
            "p_win / k",
            vec![Line::linear(&curve.win_per_adversary(), limit)],
        )
        .x_range(x_range.clone());

        let increments = curve.increments();
        let log = Chart::new(
            &format!("N={total}"),
            "Number of Adversary Balls (k)",
            "log10(d p_win / dk)",
            vec![Line::log(&increments, limit, false)],
        )
        .x_range(x_range);
        let log_log = Chart::new(
            &format!("N={total}"),
            "log10(k)",
            "log10(d p_win / dk)",
            vec![Line::log(&increments, limit, true)],
        )
        .x_range(0.0..(limit as f64).log10().max(1.0));

        [
            (format!("plot_average__N={total}.svg"), average),
            (format!("plot_p_loss_p_win_k__N={total}.svg"), ratio),
            (format!("plot_p_win_k__N={total}.svg"), relative),
            (format!("plot_d_p_win_dk__N={total}__log.svg"), log),
            (format!("plot_d_p_win_dk__N={total}__log_log.svg"), log_log),
        ]
        .iter()
        .map(|(file, chart)| self.write(file, chart))
        .collect()
    }

    /// Win chance at the fixed separator ranks, one line per rank.
    pub fn render_fixed_positions(&self, total: Count) -> RenderResult<PathBuf> {
        let curves = self.config.fixed_position_curves(total)?;
        let limit = match curves.first() {
            Some(curve) => self.limit(total, curve)?,
            None => self.config.plot_limit(),
        };
        let lines = curves.iter().map(|c| Line::linear(c, limit)).collect();
        let chart = Chart::new(
            &format!("Win Chance vs Number of Adversary Balls, N={total}"),
            "Number of Adversary Balls (k)",
            "Win Chance",
            lines,
        )
        .x_range(0.0..limit as f64)
        .y_range(0.0..1.0)
        .legend();
        self.write(&format!("plot_fixed_m__N={total}.svg"), &chart)
    }

    /// Right edge of the x-axis: `min(plot_limit, max k)`, at least 2.
    fn limit(&self, total: Count, curve: &Curve) -> RenderResult<Count> {
        let k = curve
            .max_adversaries()
            .ok_or(RenderError::EmptyCurve(total))?;
        Ok(k.min(self.config.plot_limit()).max(2))
    }

    fn write(&self, file: &str, chart: &Chart) -> RenderResult<PathBuf> {
        fs::create_dir_all(&self.out_dir)?;
        let path = self.out_dir.join(file);
        if chart.is_blank() {
            log::warn!("{:<32}{}", "chart has no drawable points", path.display());
        }
        {
            let area = SVGBackend::new(&path, CHART_SIZE).into_drawing_area();
            chart.draw(&area)?;
            area.present()?;
        }
        log::info!("{:<32}{}", "saving chart", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "bucket-lottery-{name}-{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn writes_every_chart() {
        let dir = scratch("charts");
        let renderer = Renderer::new(&dir, SweepConfig::default());
        let paths = renderer.render(40).unwrap();
        let names = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect::<Vec<_>>();
        assert_eq!(
            names,
            vec![
                "plot_average__N=40.svg",
                "plot_p_loss_p_win_k__N=40.svg",
                "plot_p_win_k__N=40.svg",
                "plot_d_p_win_dk__N=40__log.svg",
                "plot_d_p_win_dk__N=40__log_log.svg",
                "plot_fixed_m__N=40.svg",
            ]
        );
        for path in &paths {
            let svg = fs::read_to_string(path).unwrap();
            assert!(svg.contains("<svg"), "{}", path.display());
        }
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn empty_sweep_is_an_error() {
        let renderer = Renderer::new(scratch("empty"), SweepConfig::default());
        assert!(matches!(
            renderer.render_average(2),
            Err(RenderError::EmptyCurve(2))
        ));
        assert!(matches!(
            renderer.render(0),
            Err(RenderError::Lottery(Error::Empty))
        ));
        assert!(!renderer.out_dir().exists());
    }
}
