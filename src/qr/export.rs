//! Output artifacts derived from a result
//!
//! PNG bytes and data URLs, download file names, and the printable HTML sheet.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{codecs::png::PngEncoder, ExtendedColorType, ImageEncoder, RgbaImage};
use std::path::PathBuf;

use crate::error::{AppError, AppResult};
use crate::state::data::QrResult;

pub const PNG_MIME: &str = "image/png";

/// Encode an RGBA image as PNG
pub fn png_bytes(image: &RgbaImage) -> AppResult<Vec<u8>> {
    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes).write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        ExtendedColorType::Rgba8,
    )?;
    Ok(bytes)
}

/// `data:<mime>;base64,<payload>`
pub fn to_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Split a base64 data URL into its mime type and decoded bytes
pub fn decode_data_url(data_url: &str) -> AppResult<(String, Vec<u8>)> {
    let rest = data_url
        .strip_prefix("data:")
        .ok_or_else(|| AppError::DataUrl("missing data: prefix".to_string()))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| AppError::DataUrl("missing ',' separator".to_string()))?;
    let mime = meta
        .strip_suffix(";base64")
        .ok_or_else(|| AppError::DataUrl("only base64 data URLs are supported".to_string()))?;

    let bytes = STANDARD
        .decode(payload)
        .map_err(|e| AppError::DataUrl(e.to_string()))?;
    Ok((mime.to_string(), bytes))
}

/// Replace every non-alphanumeric character with `_`
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// `<sanitized name>_<millis>.<ext>`
pub fn download_file_name(name: &str, millis: i64, ext: &str) -> String {
    format!("{}_{}.{}", sanitize_file_name(name), millis, ext)
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// A standalone HTML page that shows the code with its name and content
/// and opens the print dialog when loaded.
pub fn print_document(result: &QrResult) -> String {
    let name = escape_html(&result.name);
    let content = escape_html(&result.content);
    format!(
        r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8" />
    <title>QR Code - {name}</title>
    <style>
      body {{
        display: flex;
        justify-content: center;
        align-items: center;
        min-height: 100vh;
        margin: 0;
        font-family: system-ui, -apple-system, sans-serif;
      }}
      .container {{ text-align: center; padding: 20px; }}
      h1 {{ font-size: 24px; margin-bottom: 10px; }}
      p {{ color: #666; margin-bottom: 20px; font-size: 14px; word-break: break-all; }}
      img {{ max-width: 400px; border: 1px solid #ddd; padding: 20px; background: white; }}
      @media print {{ body {{ margin: 0; }} }}
    </style>
  </head>
  <body>
    <div class="container">
      <h1>{name}</h1>
      <p>{content}</p>
      <img src="{image}" alt="QR Code" />
    </div>
    <script>
      window.onload = function () {{
        window.print();
        window.onafterprint = function () {{ window.close(); }};
      }};
    </script>
  </body>
</html>
"#,
        name = name,
        content = content,
        image = result.image,
    )
}

/// Write an exported artifact to disk, returning where it went
pub async fn write_artifact(path: PathBuf, bytes: Vec<u8>) -> Result<PathBuf, String> {
    tokio::fs::write(&path, bytes)
        .await
        .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;
    log::info!("Saved {}", path.display());
    Ok(path)
}
