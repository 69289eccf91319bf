//! QR encoding to raster and vector output
//!
//! The `qrcode` crate produces the module matrix. Both renderers here draw
//! that matrix with a configurable quiet zone, colors and pixel size, which
//! the crate's built-in renderers do not expose.

use image::{ImageBuffer, Rgba, RgbaImage};
use qrcode::{Color, QrCode};
use std::fmt::Write as _;

use crate::error::AppResult;
use crate::state::options::QrOptions;

/// Dark/light module matrix including the quiet zone
struct ModuleGrid {
    /// Side length in modules, margin included
    side: usize,
    margin: usize,
    width: usize,
    colors: Vec<Color>,
}

impl ModuleGrid {
    fn encode(text: &str, options: &QrOptions) -> AppResult<Self> {
        let code = QrCode::with_error_correction_level(text.as_bytes(), options.error_correction.to_qrcode())?;
        let width = code.width();
        let margin = options.margin as usize;
        Ok(Self {
            side: width + 2 * margin,
            margin,
            width,
            colors: code.to_colors(),
        })
    }

    /// Whether the module at (x, y), in quiet-zone coordinates, is dark
    fn is_dark(&self, x: usize, y: usize) -> bool {
        let (Some(qx), Some(qy)) = (x.checked_sub(self.margin), y.checked_sub(self.margin)) else {
            return false;
        };
        if qx >= self.width || qy >= self.width {
            return false;
        }
        self.colors[qy * self.width + qx] == Color::Dark
    }
}

/// Encode `text` into a square RGBA image of `options.size` pixels.
/// If the symbol has more modules than pixels, one pixel per module is used.
pub fn encode_raster(text: &str, options: &QrOptions) -> AppResult<RgbaImage> {
    let fg = options.fg()?.to_rgba();
    let bg = options.bg()?.to_rgba();
    let grid = ModuleGrid::encode(text, options)?;

    let pixels = (options.size as usize).max(grid.side);
    let image: RgbaImage = ImageBuffer::from_fn(pixels as u32, pixels as u32, |px, py| {
        // floor(px * modules / pixels) maps every pixel to exactly one module
        let mx = px as usize * grid.side / pixels;
        let my = py as usize * grid.side / pixels;
        if grid.is_dark(mx, my) {
            fg
        } else {
            bg
        }
    });

    Ok(image)
}

/// Encode `text` as standalone SVG markup.
/// The viewBox is in module units; width/height are `options.size`.
pub fn encode_svg(text: &str, options: &QrOptions) -> AppResult<String> {
    let fg = options.fg()?;
    let bg = options.bg()?;
    let grid = ModuleGrid::encode(text, options)?;

    let mut path = String::new();
    for y in 0..grid.side {
        for x in 0..grid.side {
            if grid.is_dark(x, y) {
                // writing to a String cannot fail
                let _ = write!(path, "M{} {}h1v1h-1z", x, y);
            }
        }
    }

    Ok(format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8"?>"#,
            "\n",
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {side} {side}" width="{size}" height="{size}" shape-rendering="crispEdges">"#,
            r#"<rect width="{side}" height="{side}" fill="{bg}"/>"#,
            r#"<path fill="{fg}" d="{path}"/>"#,
            "</svg>\n"
        ),
        side = grid.side,
        size = options.size,
        bg = bg,
        fg = fg,
        path = path,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use crate::state::options::EcLevel;

    #[test]
    fn test_raster_has_requested_size() {
        let options = QrOptions::default();
        let image = encode_raster("https://example.com", &options).unwrap();
        assert_eq!(image.dimensions(), (250, 250));

        let mut small = QrOptions::default();
        small.set_size(100);
        let image = encode_raster("https://example.com", &small).unwrap();
        assert_eq!(image.dimensions(), (100, 100));
    }

    #[test]
    fn test_quiet_zone_uses_background() {
        let mut options = QrOptions::default();
        options.bg_color = "#FFEEDD".to_string();
        options.fg_color = "#112233".to_string();
        let image = encode_raster("hello", &options).unwrap();

        let bg = Rgb::new(0xFF, 0xEE, 0xDD).to_rgba();
        let last = image.width() - 1;
        for (x, y) in [(0, 0), (last, 0), (0, last), (last, last)] {
            assert_eq!(*image.get_pixel(x, y), bg);
        }

        // the finder pattern corner is dark right after the quiet zone
        let fg = Rgb::new(0x11, 0x22, 0x33).to_rgba();
        let grid = ModuleGrid::encode("hello", &options).unwrap();
        let module_px = image.width() as usize / grid.side;
        let inside = (options.margin as usize * image.width() as usize).div_ceil(grid.side) as u32;
        assert!(module_px >= 1);
        assert_eq!(*image.get_pixel(inside, inside), fg);
    }

    #[test]
    fn test_zero_margin_starts_with_finder() {
        let mut options = QrOptions::default();
        options.set_margin(0);
        let image = encode_raster("hello", &options).unwrap();
        // top-left module is part of a finder pattern, always dark
        assert_eq!(*image.get_pixel(0, 0), Rgb::BLACK.to_rgba());
    }

    #[test]
    fn test_higher_error_correction_needs_more_modules() {
        let text = "https://example.com/some/fairly/long/path?with=query&and=more";
        let mut options = QrOptions::default();
        options.error_correction = EcLevel::L;
        let low = ModuleGrid::encode(text, &options).unwrap();
        options.error_correction = EcLevel::H;
        let high = ModuleGrid::encode(text, &options).unwrap();
        assert!(high.width > low.width);
    }

    #[test]
    fn test_invalid_color_fails() {
        let mut options = QrOptions::default();
        options.fg_color = "blue-ish".to_string();
        assert!(encode_raster("hello", &options).is_err());
        assert!(encode_svg("hello", &options).is_err());
    }

    #[test]
    fn test_oversized_payload_fails() {
        let text = "x".repeat(4000);
        let mut options = QrOptions::default();
        options.error_correction = EcLevel::H;
        assert!(encode_raster(&text, &options).is_err());
    }

    #[test]
    fn test_svg_markup() {
        let mut options = QrOptions::default();
        options.fg_color = "#7c3aed".to_string();
        let svg = encode_svg("hello", &options).unwrap();
        let grid = ModuleGrid::encode("hello", &options).unwrap();

        assert!(svg.starts_with("<?xml"));
        assert!(svg.contains(&format!(r#"viewBox="0 0 {0} {0}""#, grid.side)));
        assert!(svg.contains(r#"width="250""#));
        assert!(svg.contains(r##"fill="#FFFFFF""##));
        assert!(svg.contains(r##"fill="#7C3AED""##));
        // the first dark module sits right inside the 4-module margin
        assert!(svg.contains("M4 4h1v1h-1z"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }
}
