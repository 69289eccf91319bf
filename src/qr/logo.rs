//! Logo overlay compositing
//!
//! A white, lightly bordered square is painted over the center of the code
//! and the logo is drawn inside it. The covered modules are recovered by
//! error correction, which is why a logo forces level H.

use image::{imageops, imageops::FilterType, DynamicImage, Rgba, RgbaImage};

/// Box fill behind the logo
const BOX_FILL: Rgba<u8> = Rgba([255, 255, 255, 255]);
/// Light gray border (#E5E7EB)
const BOX_BORDER: Rgba<u8> = Rgba([0xE5, 0xE7, 0xEB, 255]);
const MIN_PADDING: u32 = 2;

/// Where the logo box lands on a QR image of `qr_width` pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogoBox {
    pub x: u32,
    pub y: u32,
    pub side: u32,
    pub padding: u32,
}

impl LogoBox {
    pub fn centered(qr_width: u32, percent: u8) -> Self {
        let side = (qr_width * percent as u32 / 100).max(1);
        let padding = (side / 10).max(MIN_PADDING);
        let offset = (qr_width - side.min(qr_width)) / 2;
        Self {
            x: offset,
            y: offset,
            side,
            padding,
        }
    }

    /// Space left for the logo itself
    fn inner(&self) -> u32 {
        self.side.saturating_sub(2 * self.padding).max(1)
    }
}

/// Paint the logo box onto `qr` and draw `logo` centered inside it
pub fn overlay_logo(qr: &mut RgbaImage, logo: &DynamicImage, percent: u8) -> LogoBox {
    let logo_box = LogoBox::centered(qr.width(), percent);
    let right = logo_box.x + logo_box.side;
    let bottom = logo_box.y + logo_box.side;

    for y in logo_box.y..bottom.min(qr.height()) {
        for x in logo_box.x..right.min(qr.width()) {
            let on_border = x == logo_box.x || y == logo_box.y || x == right - 1 || y == bottom - 1;
            qr.put_pixel(x, y, if on_border { BOX_BORDER } else { BOX_FILL });
        }
    }

    // fits inside inner x inner, keeping aspect ratio
    let inner = logo_box.inner();
    let scaled = logo.resize(inner, inner, FilterType::Lanczos3).to_rgba8();
    let lx = logo_box.x + (logo_box.side - scaled.width()) / 2;
    let ly = logo_box.y + (logo_box.side - scaled.height()) / 2;
    imageops::overlay(qr, &scaled, lx as i64, ly as i64);

    logo_box
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::ImageBuffer;

    fn blank_qr(width: u32) -> RgbaImage {
        ImageBuffer::from_pixel(width, width, Rgba([0, 0, 0, 255]))
    }

    fn is_red(pixel: &Rgba<u8>) -> bool {
        pixel[0] > 200 && pixel[1] < 50 && pixel[2] < 50
    }

    fn red_logo(w: u32, h: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(ImageBuffer::from_pixel(w, h, Rgba([220, 20, 20, 255])))
    }

    #[test]
    fn test_box_geometry() {
        let logo_box = LogoBox::centered(250, 20);
        assert_eq!(logo_box.side, 50);
        assert_eq!(logo_box.padding, 5);
        assert_eq!((logo_box.x, logo_box.y), (100, 100));

        let small = LogoBox::centered(100, 10);
        assert_eq!(small.side, 10);
        assert_eq!(small.padding, MIN_PADDING);
    }

    #[test]
    fn test_overlay_draws_box_and_logo() {
        let mut qr = blank_qr(250);
        let logo_box = overlay_logo(&mut qr, &red_logo(64, 64), 20);

        // border, padding and logo center
        assert_eq!(*qr.get_pixel(logo_box.x, logo_box.y), BOX_BORDER);
        assert_eq!(*qr.get_pixel(logo_box.x + 2, logo_box.y + 2), BOX_FILL);
        assert!(is_red(qr.get_pixel(125, 125)));

        // untouched outside the box
        assert_eq!(*qr.get_pixel(logo_box.x - 1, 125), Rgba([0, 0, 0, 255]));
        assert_eq!(*qr.get_pixel(0, 0), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_wide_logo_keeps_aspect_ratio() {
        let mut qr = blank_qr(300);
        let logo_box = overlay_logo(&mut qr, &red_logo(200, 50), 30);
        // 90px box, 9px padding, 72px inner: logo scales to 72x18
        assert_eq!(logo_box.side, 90);
        let top_of_logo = logo_box.y + (logo_box.side - 18) / 2;
        assert_eq!(*qr.get_pixel(150, top_of_logo - 2), BOX_FILL);
        assert!(is_red(qr.get_pixel(150, top_of_logo + 1)));
    }

    #[test]
    fn test_transparent_logo_shows_white_box() {
        let mut qr = blank_qr(200);
        let clear = DynamicImage::ImageRgba8(ImageBuffer::from_pixel(10, 10, Rgba([0, 0, 0, 0])));
        overlay_logo(&mut qr, &clear, 20);
        assert_eq!(*qr.get_pixel(100, 100), BOX_FILL);
    }
}
