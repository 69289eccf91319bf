/// QR rendering pipeline
///
/// This module handles:
/// - Encoding text to a raster image and SVG markup (encoder.rs)
/// - Compositing a logo over the center of the code (logo.rs)
/// - PNG/data URL conversion, file names and the print sheet (export.rs)
/// - Building a `QrResult` from a payload and options (generate.rs)
pub mod encoder;
pub mod export;
pub mod generate;
pub mod logo;

pub use generate::{generate, generate_async, render_svg};
