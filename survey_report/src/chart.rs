//! Renders the per-question proportion chart as an in-memory PNG.

use plotters::prelude::*;
use std::io::Cursor;

use crate::config::ReportError;

// Fixed physical output size of the embedded chart.
const WIDTH_CM: f64 = 9.28;
const HEIGHT_CM: f64 = 5.74;
const CM_PER_INCH: f64 = 2.54;
const DPI: f64 = 300.0;

/// Pixel dimensions of the chart at the fixed physical size.
pub fn chart_dimensions() -> (u32, u32) {
    (
        (WIDTH_CM / CM_PER_INCH * DPI).round() as u32,
        (HEIGHT_CM / CM_PER_INCH * DPI).round() as u32,
    )
}

/// The palette color for a category position, cycling when there are more
/// categories than palette entries.
pub fn wedge_color(palette: &[(u8, u8, u8)], index: usize) -> RGBColor {
    let (r, g, b) = palette[index % palette.len()];
    RGBColor(r, g, b)
}

// Greedy word wrap for the chart title. A single word longer than the limit
// gets a line of its own.
fn wrap_title(title: &str, max_chars: usize) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    for word in title.split_whitespace() {
        if !current.is_empty()
            && current.chars().count() + 1 + word.chars().count() > max_chars
        {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn draw_err<E: std::error::Error + Send + Sync>(
    e: plotters::drawing::DrawingAreaErrorKind<E>,
) -> ReportError {
    ReportError::ChartRender(e.to_string())
}

/// Renders the proportion chart for the ordered (category, exact percentage)
/// pairs, the question title word-wrapped above the pie.
///
/// Pure function of its inputs: no state is shared between calls, so one
/// invocation per question is safe in any order.
pub fn render_pie_chart(
    shares: &[(String, f64)],
    title: &str,
    palette: &[(u8, u8, u8)],
) -> Result<Vec<u8>, ReportError> {
    let (width, height) = chart_dimensions();
    let mut raw = vec![0u8; (width * height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut raw, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        let title_lines = wrap_title(title, 52);
        let line_height: i32 = 44;
        let title_px = title_lines.len() as i32 * line_height + 8;

        let title_font = FontDesc::new(FontFamily::SansSerif, 40.0, FontStyle::Bold);
        let title_style = TextStyle::from(title_font).color(&BLACK);
        for (i, line) in title_lines.iter().enumerate() {
            root.draw(&Text::new(
                line.clone(),
                (16, 4 + i as i32 * line_height),
                title_style.clone(),
            ))
            .map_err(draw_err)?;
        }

        // The pie occupies the area left below the title.
        let pie_h = height as i32 - title_px;
        let center = ((width / 2) as i32, title_px + pie_h / 2);
        let radius = f64::from((width as i32).min(pie_h)) * 0.38;
        let sizes: Vec<f64> = shares.iter().map(|(_, pct)| *pct).collect();
        let colors: Vec<RGBColor> = (0..shares.len()).map(|i| wedge_color(palette, i)).collect();
        let labels: Vec<String> = shares
            .iter()
            .map(|(category, pct)| format!("{} ({:.1}%)", category, pct))
            .collect();

        let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
        pie.start_angle(90.0);
        pie.label_style(
            TextStyle::from(FontDesc::new(FontFamily::SansSerif, 33.0, FontStyle::Normal))
                .color(&BLACK),
        );
        root.draw(&pie).map_err(draw_err)?;

        root.present().map_err(draw_err)?;
    }

    let img = image::RgbImage::from_raw(width, height, raw)
        .ok_or_else(|| ReportError::ChartRender("buffer size mismatch".to_string()))?;
    let mut png: Vec<u8> = Vec::new();
    img.write_to(&mut Cursor::new(&mut png), image::ImageOutputFormat::Png)
        .map_err(|e| ReportError::ChartRender(e.to_string()))?;
    Ok(png)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimensions_match_the_physical_size() {
        assert_eq!(chart_dimensions(), (1096, 678));
    }

    #[test]
    fn palette_cycles_by_position() {
        let palette = [(1, 2, 3), (4, 5, 6)];
        assert_eq!(wedge_color(&palette, 0), RGBColor(1, 2, 3));
        assert_eq!(wedge_color(&palette, 1), RGBColor(4, 5, 6));
        assert_eq!(wedge_color(&palette, 2), RGBColor(1, 2, 3));
    }

    #[test]
    fn titles_wrap_greedily() {
        let lines = wrap_title("uno dos tres cuatro", 8);
        assert_eq!(lines, vec!["uno dos", "tres", "cuatro"]);
        assert_eq!(wrap_title("corto", 52), vec!["corto"]);
    }

    #[test]
    #[ignore = "needs system fonts for the labels"]
    fn renders_a_png() {
        let shares = vec![("Sí".to_string(), 80.0), ("No".to_string(), 20.0)];
        let png = render_pie_chart(&shares, "¿Está satisfecho?", &crate::CHART_PALETTE).unwrap();
        // PNG signature.
        assert_eq!(&png[..4], &[0x89, b'P', b'N', b'G']);
    }
}
