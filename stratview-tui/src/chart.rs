//! Chart series construction — pure transforms from fetched data to
//! plottable datasets. No network access and no ratatui types, so the
//! whole module is unit-testable.
//!
//! Price and returns get independent y-bounds; the renderer stacks them
//! vertically over a shared x axis, which is the terminal equivalent of the
//! left/right dual-axis layout. Signal markers are non-connected points
//! keyed to the price scale.

use stratview_api::StrategySeries;

pub const RSI_OVERBOUGHT: f64 = 70.0;
pub const RSI_OVERSOLD: f64 = 30.0;

/// One named, plottable series.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotSeries {
    pub label: &'static str,
    pub points: Vec<(f64, f64)>,
}

/// RSI sub-chart: the indicator line plus its threshold lines.
#[derive(Debug, Clone)]
pub struct RsiView {
    pub line: PlotSeries,
    pub overbought: PlotSeries,
    pub oversold: PlotSeries,
}

/// Everything the chart panel needs to draw, precomputed.
#[derive(Debug, Clone)]
pub struct ChartView {
    pub price: PlotSeries,
    pub returns: PlotSeries,
    /// Non-connected buy markers on the price scale.
    pub buys: PlotSeries,
    /// Non-connected sell markers on the price scale.
    pub sells: PlotSeries,
    pub rsi: Option<RsiView>,

    pub x_bounds: [f64; 2],
    /// First and last date, for x-axis labeling.
    pub x_labels: (String, String),
    pub price_bounds: [f64; 2],
    pub returns_bounds: [f64; 2],
}

/// Build the chart view from a fetched series. The series is validated
/// upstream, so all arrays are index-aligned here.
pub fn build(series: &StrategySeries) -> ChartView {
    let price = PlotSeries {
        label: "Price",
        points: indexed(&series.prices),
    };
    let returns = PlotSeries {
        label: "Strategy Returns",
        points: indexed(&series.strategy_returns),
    };
    let buys = PlotSeries {
        label: "Buy Signals",
        points: marker_points(&series.buy_markers()),
    };
    let sells = PlotSeries {
        label: "Sell Signals",
        points: marker_points(&series.sell_markers()),
    };

    let x_max = series.len().saturating_sub(1) as f64;
    let rsi = series.rsi.as_ref().map(|values| RsiView {
        line: PlotSeries {
            label: "RSI",
            points: indexed(values),
        },
        overbought: PlotSeries {
            label: "Overbought",
            points: vec![(0.0, RSI_OVERBOUGHT), (x_max.max(1.0), RSI_OVERBOUGHT)],
        },
        oversold: PlotSeries {
            label: "Oversold",
            points: vec![(0.0, RSI_OVERSOLD), (x_max.max(1.0), RSI_OVERSOLD)],
        },
    });

    let x_labels = (
        series
            .dates
            .first()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
        series
            .dates
            .last()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
    );

    ChartView {
        price_bounds: padded_bounds(&series.prices),
        returns_bounds: padded_bounds(&series.strategy_returns),
        x_bounds: [0.0, x_max.max(1.0)],
        x_labels,
        price,
        returns,
        buys,
        sells,
        rsi,
    }
}

fn indexed(values: &[f64]) -> Vec<(f64, f64)> {
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| (i as f64, v))
        .collect()
}

/// Keep only the indices where a marker exists; the gaps make the series
/// render as disconnected points.
fn marker_points(markers: &[Option<f64>]) -> Vec<(f64, f64)> {
    markers
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|price| (i as f64, price)))
        .collect()
}

/// Min/max with 5% headroom so lines don't hug the frame.
fn padded_bounds(values: &[f64]) -> [f64; 2] {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !min.is_finite() || !max.is_finite() {
        return [0.0, 1.0];
    }
    let padding = ((max - min).abs() * 0.05).max(f64::EPSILON);
    [min - padding, max + padding]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> StrategySeries {
        StrategySeries::from_json(
            r#"{
                "dates": ["2023-01-01", "2023-01-02", "2023-01-03", "2023-01-04"],
                "prices": [100.0, 102.0, 101.0, 99.0],
                "signals": [1, 0, -1, 1],
                "strategy_returns": [0.0, 0.02, 0.01, -0.01],
                "rsi": [50.0, 65.0, 72.0, 28.0]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn line_series_cover_every_index() {
        let view = build(&sample());
        assert_eq!(view.price.points.len(), 4);
        assert_eq!(view.returns.points.len(), 4);
        assert_eq!(view.price.label, "Price");
        assert_eq!(view.returns.label, "Strategy Returns");
        assert_eq!(view.price.points[1], (1.0, 102.0));
    }

    #[test]
    fn markers_appear_only_at_their_signals() {
        let view = build(&sample());
        assert_eq!(view.buys.points, vec![(0.0, 100.0), (3.0, 99.0)]);
        assert_eq!(view.sells.points, vec![(2.0, 101.0)]);
    }

    #[test]
    fn rsi_view_carries_threshold_lines() {
        let view = build(&sample());
        let rsi = view.rsi.expect("rsi present");
        assert_eq!(rsi.line.points.len(), 4);
        assert!(rsi.overbought.points.iter().all(|&(_, y)| y == RSI_OVERBOUGHT));
        assert!(rsi.oversold.points.iter().all(|&(_, y)| y == RSI_OVERSOLD));
    }

    #[test]
    fn rsi_absent_when_backend_omits_it() {
        let series = StrategySeries::from_json(
            r#"{
                "dates": ["2023-01-01"],
                "prices": [10.0],
                "signals": [0],
                "strategy_returns": [0.0]
            }"#,
        )
        .unwrap();
        assert!(build(&series).rsi.is_none());
    }

    #[test]
    fn bounds_are_padded_and_ordered() {
        let view = build(&sample());
        assert!(view.price_bounds[0] < 99.0);
        assert!(view.price_bounds[1] > 102.0);
        assert!(view.returns_bounds[0] < -0.01);
        assert!(view.returns_bounds[1] > 0.02);
        assert_eq!(view.x_bounds, [0.0, 3.0]);
    }

    #[test]
    fn x_labels_are_first_and_last_dates() {
        let view = build(&sample());
        assert_eq!(view.x_labels.0, "2023-01-01");
        assert_eq!(view.x_labels.1, "2023-01-04");
    }
}
