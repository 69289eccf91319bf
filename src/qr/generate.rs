//! Turning a validated payload plus options into a `QrResult`

use chrono::{DateTime, Utc};
use log::{debug, error};
use tokio::task;

use super::encoder::{encode_raster, encode_svg};
use super::export::{png_bytes, to_data_url, PNG_MIME};
use super::logo::overlay_logo;
use crate::error::{AppError, AppResult};
use crate::payload::Payload;
use crate::state::data::QrResult;
use crate::state::options::QrOptions;

/// Encode, composite the logo if any, and package the result.
/// The options snapshot is the effective one (H forced under a logo).
pub fn generate(payload: &Payload, options: &QrOptions, now: DateTime<Utc>) -> AppResult<QrResult> {
    let effective = options.effective();
    let mut image = encode_raster(&payload.content, &effective)?;

    if let Some(logo) = &effective.logo {
        let decoded = logo.decode()?;
        let placed = overlay_logo(&mut image, &decoded, effective.logo_size);
        debug!("Logo '{}' placed at {:?}", logo.file_name, placed);
    }

    let png = png_bytes(&image)?;
    debug!(
        "Generated {}x{} {} code ({} bytes, EC {:?})",
        image.width(),
        image.height(),
        payload.kind,
        png.len(),
        effective.error_correction
    );

    Ok(QrResult {
        content: payload.content.clone(),
        kind: payload.kind,
        name: payload.name.clone(),
        image: to_data_url(PNG_MIME, &png),
        options: effective,
        created_at: now,
    })
}

/// Generate on the blocking pool so the UI stays responsive
pub async fn generate_async(payload: Payload, options: QrOptions) -> Result<QrResult, String> {
    task::spawn_blocking(move || generate(&payload, &options, Utc::now()))
        .await
        .map_err(|e| AppError::Task(e.to_string()))
        .and_then(|result| result)
        .map_err(|e| {
            error!("Error generating QR code: {}", e);
            e.to_string()
        })
}

/// Vector rendering of an existing result, using its own options snapshot
pub fn render_svg(result: &QrResult) -> AppResult<String> {
    encode_svg(&result.content, &result.options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::{build_link, Security, WifiCredentials};
    use crate::state::data::ContentKind;
    use crate::state::options::{EcLevel, Logo};
    use crate::test_utils::{link_payload, tiny_png};

    #[test]
    fn test_link_result() {
        let payload = build_link("example.com").unwrap();
        let now = Utc::now();
        let result = generate(&payload, &QrOptions::default(), now).unwrap();

        assert_eq!(result.content, "https://example.com");
        assert_eq!(result.name, "example.com");
        assert_eq!(result.kind, ContentKind::Link);
        assert_eq!(result.created_at, now);
        assert!(result.image.starts_with("data:image/png;base64,"));

        let png = image::load_from_memory(&result.png_bytes().unwrap()).unwrap();
        assert_eq!((png.width(), png.height()), (250, 250));
    }

    #[test]
    fn test_logo_forces_h_in_snapshot() {
        for level in EcLevel::ALL {
            let mut options = QrOptions::default();
            options.error_correction = level;
            options.logo = Some(Logo::from_bytes("logo.png", &tiny_png()).unwrap());

            let result = generate(&link_payload("https://example.com"), &options, Utc::now()).unwrap();
            assert_eq!(result.options.error_correction, EcLevel::H);
            assert!(result.options.logo.is_some());
        }
    }

    #[test]
    fn test_without_logo_keeps_level() {
        let mut options = QrOptions::default();
        options.error_correction = EcLevel::Q;
        let result = generate(&link_payload("https://example.com"), &options, Utc::now()).unwrap();
        assert_eq!(result.options.error_correction, EcLevel::Q);
    }

    #[test]
    fn test_wifi_result() {
        let payload = WifiCredentials::new("Cafe_5G", "Sunshine123", Security::Wpa, false)
            .build()
            .unwrap();
        let result = generate(&payload, &QrOptions::default(), Utc::now()).unwrap();
        assert_eq!(result.content, "WIFI:T:WPA;S:Cafe_5G;P:Sunshine123;H:false;;");
        assert_eq!(result.name, "WiFi: Cafe_5G");
    }

    #[test]
    fn test_invalid_color_is_an_error() {
        let mut options = QrOptions::default();
        options.bg_color = "#zzz".to_string();
        let err = generate(&link_payload("https://example.com"), &options, Utc::now()).unwrap_err();
        assert!(matches!(err, AppError::Color(_)));
    }

    #[test]
    fn test_svg_uses_snapshot() {
        let mut options = QrOptions::default();
        options.set_size(320);
        let result = generate(&link_payload("https://example.com"), &options, Utc::now()).unwrap();
        let svg = render_svg(&result).unwrap();
        assert!(svg.contains(r#"width="320""#));
    }

    #[tokio::test]
    async fn test_generate_async() {
        let result = generate_async(link_payload("https://example.com"), QrOptions::default())
            .await
            .unwrap();
        assert_eq!(result.content, "https://example.com");

        let text = "x".repeat(5000);
        let err = generate_async(link_payload(&text), QrOptions::default())
            .await
            .unwrap_err();
        assert!(err.contains("encode"));
    }
}
