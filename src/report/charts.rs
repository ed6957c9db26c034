/// SVG chart rendering for the report document.
///
/// Charts are built as plain SVG strings and inlined into the HTML, so
/// the output is a single self-contained file with no image assets or
/// client-side scripting. Rendering is deterministic: the same inputs
/// always produce byte-identical markup, which keeps the tests simple.
///
/// Three chart shapes cover the report:
///   - `bar_chart`           — hour-of-day and borough totals
///   - `multi_line_chart`    — borough × year comparison
///   - `forecast_chart`      — monthly history + forecast with band

use crate::analysis::forecast::ForecastBand;

// Plot area margins, in px. Left is wide enough for 5-digit y labels.
const MARGIN_LEFT: f64 = 52.0;
const MARGIN_RIGHT: f64 = 14.0;
const MARGIN_TOP: f64 = 34.0;
const MARGIN_BOTTOM: f64 = 38.0;

const Y_TICKS: u32 = 4;

/// Series palette, reused in registry order for the borough lines.
pub const PALETTE: &[&str] = &["#2b6cb0", "#c05621", "#2f855a", "#b83280", "#6b46c1"];

const HISTORY_COLOR: &str = "#2b6cb0";
const FORECAST_COLOR: &str = "#c05621";
const BAND_COLOR: &str = "#f6ad55";
const BAR_COLOR: &str = "#2b6cb0";
const AXIS_COLOR: &str = "#718096";
const GRID_COLOR: &str = "#e2e8f0";

// ---------------------------------------------------------------------------
// Public chart builders
// ---------------------------------------------------------------------------

/// Renders a vertical bar chart. `labels` and `values` must be the same
/// length; labels are decimated automatically when there are too many
/// to print side by side.
pub fn bar_chart(title: &str, labels: &[String], values: &[u64], width: u32, height: u32) -> String {
    let frame = Frame::new(width, height);
    let max = values.iter().copied().max().unwrap_or(0) as f64;

    let mut svg = frame.open(title);
    frame.push_axes(&mut svg, max);

    let n = values.len().max(1);
    let slot = frame.plot_width() / n as f64;
    let bar_width = (slot * 0.72).max(1.0);

    for (i, &value) in values.iter().enumerate() {
        let x = frame.left() + slot * i as f64 + (slot - bar_width) / 2.0;
        let bar_height = frame.scaled(value as f64, max);
        let y = frame.bottom() - bar_height;
        svg.push_str(&format!(
            "<rect x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" fill=\"{}\"/>\n",
            x, y, bar_width, bar_height, BAR_COLOR
        ));
    }

    frame.push_x_labels(&mut svg, labels, true);
    svg.push_str("</svg>\n");
    svg
}

/// Renders one line per series over a shared x axis. Series colors
/// cycle through `PALETTE` in order, matching the legend the renderer
/// prints next to the chart.
pub fn multi_line_chart(
    title: &str,
    x_labels: &[String],
    series: &[(String, Vec<u64>)],
    width: u32,
    height: u32,
) -> String {
    let frame = Frame::new(width, height);
    let max = series
        .iter()
        .flat_map(|(_, values)| values.iter().copied())
        .max()
        .unwrap_or(0) as f64;

    let mut svg = frame.open(title);
    frame.push_axes(&mut svg, max);

    for (idx, (name, values)) in series.iter().enumerate() {
        let color = PALETTE[idx % PALETTE.len()];
        let points = frame.polyline_points(
            &values.iter().map(|&v| v as f64).collect::<Vec<_>>(),
            max,
            x_labels.len(),
            0,
        );
        svg.push_str(&format!(
            "<polyline points=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"2\"><title>{}</title></polyline>\n",
            points,
            color,
            xml_escape(name)
        ));
    }

    frame.push_x_labels(&mut svg, x_labels, false);
    svg.push_str("</svg>\n");
    svg
}

/// Renders the monthly history as a solid line, the forecast as a
/// dashed continuation, and the confidence band as a shaded polygon
/// behind the forecast.
pub fn forecast_chart(
    title: &str,
    labels: &[String],
    history: &[f64],
    band: &ForecastBand,
    width: u32,
    height: u32,
) -> String {
    let frame = Frame::new(width, height);
    let total = history.len() + band.point.len();
    let max = history
        .iter()
        .chain(band.upper.iter())
        .fold(0.0_f64, |acc, &v| acc.max(v));

    let mut svg = frame.open(title);
    frame.push_axes(&mut svg, max);

    // Shaded band: upper bound left-to-right, lower bound back.
    if !band.point.is_empty() {
        let mut outline = String::new();
        for (i, &v) in band.upper.iter().enumerate() {
            let (x, y) = frame.point_at(history.len() + i, total, v, max);
            outline.push_str(&format!("{:.1},{:.1} ", x, y));
        }
        for (i, &v) in band.lower.iter().enumerate().rev() {
            let (x, y) = frame.point_at(history.len() + i, total, v, max);
            outline.push_str(&format!("{:.1},{:.1} ", x, y));
        }
        svg.push_str(&format!(
            "<polygon points=\"{}\" fill=\"{}\" fill-opacity=\"0.35\" stroke=\"none\"/>\n",
            outline.trim_end(),
            BAND_COLOR
        ));
    }

    let history_points = frame.polyline_points(history, max, total, 0);
    svg.push_str(&format!(
        "<polyline points=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"2\"/>\n",
        history_points, HISTORY_COLOR
    ));

    if !band.point.is_empty() {
        let forecast_points = frame.polyline_points(&band.point, max, total, history.len());
        svg.push_str(&format!(
            "<polyline points=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"2\" stroke-dasharray=\"6 3\"/>\n",
            forecast_points, FORECAST_COLOR
        ));
    }

    frame.push_x_labels(&mut svg, labels, false);
    svg.push_str("</svg>\n");
    svg
}

// ---------------------------------------------------------------------------
// Frame: shared plot geometry
// ---------------------------------------------------------------------------

/// Plot-area geometry shared by all chart shapes.
struct Frame {
    width: f64,
    height: f64,
}

impl Frame {
    fn new(width: u32, height: u32) -> Frame {
        Frame {
            width: width as f64,
            height: height as f64,
        }
    }

    fn left(&self) -> f64 {
        MARGIN_LEFT
    }

    fn bottom(&self) -> f64 {
        self.height - MARGIN_BOTTOM
    }

    fn plot_width(&self) -> f64 {
        (self.width - MARGIN_LEFT - MARGIN_RIGHT).max(1.0)
    }

    fn plot_height(&self) -> f64 {
        (self.height - MARGIN_TOP - MARGIN_BOTTOM).max(1.0)
    }

    /// Value scaled into plot-height pixels. A zero max collapses every
    /// value to the baseline rather than dividing by zero.
    fn scaled(&self, value: f64, max: f64) -> f64 {
        if max <= 0.0 {
            0.0
        } else {
            (value / max) * self.plot_height()
        }
    }

    /// Pixel position of point `i` in an `n`-point x axis at `value`.
    fn point_at(&self, i: usize, n: usize, value: f64, max: f64) -> (f64, f64) {
        let slot = self.plot_width() / n.max(1) as f64;
        let x = self.left() + slot * i as f64 + slot / 2.0;
        let y = self.bottom() - self.scaled(value, max);
        (x, y)
    }

    fn polyline_points(&self, values: &[f64], max: f64, n: usize, offset: usize) -> String {
        let mut points = String::new();
        for (i, &v) in values.iter().enumerate() {
            let (x, y) = self.point_at(offset + i, n, v, max);
            points.push_str(&format!("{:.1},{:.1} ", x, y));
        }
        points.trim_end().to_string()
    }

    fn open(&self, title: &str) -> String {
        let mut svg = format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 {:.0} {:.0}\" width=\"{:.0}\" height=\"{:.0}\" font-family=\"sans-serif\">\n",
            self.width, self.height, self.width, self.height
        );
        svg.push_str(&format!(
            "<text x=\"{:.1}\" y=\"20\" font-size=\"14\" font-weight=\"bold\">{}</text>\n",
            self.left(),
            xml_escape(title)
        ));
        svg
    }

    /// Axis lines, horizontal gridlines, and y tick labels.
    fn push_axes(&self, svg: &mut String, max: f64) {
        for tick in 1..=Y_TICKS {
            let value = max * tick as f64 / Y_TICKS as f64;
            let y = self.bottom() - self.scaled(value, max);
            svg.push_str(&format!(
                "<line x1=\"{:.1}\" y1=\"{:.1}\" x2=\"{:.1}\" y2=\"{:.1}\" stroke=\"{}\"/>\n",
                self.left(),
                y,
                self.width - MARGIN_RIGHT,
                y,
                GRID_COLOR
            ));
            svg.push_str(&format!(
                "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"10\" text-anchor=\"end\">{:.0}</text>\n",
                self.left() - 6.0,
                y + 3.0,
                value
            ));
        }

        // x axis baseline and y axis.
        svg.push_str(&format!(
            "<line x1=\"{:.1}\" y1=\"{:.1}\" x2=\"{:.1}\" y2=\"{:.1}\" stroke=\"{}\"/>\n",
            self.left(),
            self.bottom(),
            self.width - MARGIN_RIGHT,
            self.bottom(),
            AXIS_COLOR
        ));
        svg.push_str(&format!(
            "<line x1=\"{:.1}\" y1=\"{:.1}\" x2=\"{:.1}\" y2=\"{:.1}\" stroke=\"{}\"/>\n",
            self.left(),
            MARGIN_TOP,
            self.left(),
            self.bottom(),
            AXIS_COLOR
        ));
    }

    /// X tick labels, decimated so at most ~12 print. `rotate` tilts
    /// long category labels (borough names) to keep them readable.
    fn push_x_labels(&self, svg: &mut String, labels: &[String], rotate: bool) {
        if labels.is_empty() {
            return;
        }
        let step = labels.len().div_ceil(12);
        let slot = self.plot_width() / labels.len() as f64;

        for (i, label) in labels.iter().enumerate() {
            if i % step != 0 {
                continue;
            }
            let x = self.left() + slot * i as f64 + slot / 2.0;
            let y = self.bottom() + 14.0;
            if rotate && label.len() > 4 {
                svg.push_str(&format!(
                    "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"10\" text-anchor=\"end\" transform=\"rotate(-35 {:.1} {:.1})\">{}</text>\n",
                    x,
                    y,
                    x,
                    y,
                    xml_escape(label)
                ));
            } else {
                svg.push_str(&format!(
                    "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"10\" text-anchor=\"middle\">{}</text>\n",
                    x,
                    y,
                    xml_escape(label)
                ));
            }
        }
    }
}

/// Minimal XML text escaping for labels and titles.
pub fn xml_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
