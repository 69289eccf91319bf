//! Result viewer with export actions

use iced::widget::image;
use iced::widget::{button, column, container, row, text};
use iced::{Alignment, Color, ContentFit, Element, Length};

use crate::error::AppResult;
use crate::payload::Payload;
use crate::state::data::QrResult;
use crate::Message;

/// The currently displayed code and its decoded preview
#[derive(Debug, Clone)]
pub struct ResultView {
    result: QrResult,
    handle: image::Handle,
}

impl ResultView {
    pub fn new(result: QrResult) -> AppResult<Self> {
        let handle = image::Handle::from_bytes(result.png_bytes()?);
        Ok(Self { result, handle })
    }

    pub fn result(&self) -> &QrResult {
        &self.result
    }

    /// What to feed back into the generator when options change
    pub fn payload(&self) -> Payload {
        Payload {
            content: self.result.content.clone(),
            kind: self.result.kind,
            name: self.result.name.clone(),
        }
    }

    pub fn view(&self, is_updating: bool) -> Element<'_, Message> {
        let result = &self.result;
        let side = result.options.size as f32;

        let preview = container(
            image(self.handle.clone())
                .width(Length::Fixed(side))
                .height(Length::Fixed(side))
                .content_fit(ContentFit::Contain),
        )
        .padding(12)
        .style(container::bordered_box);

        let status = if is_updating { "Updating..." } else { "" };

        let actions = row![
            button(text("Download PNG").size(14)).on_press(Message::DownloadPng),
            button(text("Download SVG").size(14))
                .on_press(Message::DownloadSvg)
                .style(button::secondary),
            button(text("Print").size(14))
                .on_press(Message::Print)
                .style(button::secondary),
            button(text("Copy content").size(14))
                .on_press(Message::CopyContent)
                .style(button::secondary),
        ]
        .spacing(8);

        column![
            row![
                text(&result.name).size(20).width(Length::Fill),
                text(status).size(13).color(Color::from_rgb(0.45, 0.45, 0.5)),
            ]
            .align_y(Alignment::Center),
            text(result.kind.to_string()).size(13),
            preview,
            text(&result.content).size(13),
            text(format!(
                "{}px, margin {}, error correction {:?}",
                result.options.size, result.options.margin, result.options.error_correction
            ))
            .size(12)
            .color(Color::from_rgb(0.45, 0.45, 0.5)),
            actions,
            button(text("New QR code").size(14))
                .on_press(Message::ResetResult)
                .style(button::text),
        ]
        .spacing(10)
        .align_x(Alignment::Center)
        .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qr::generate;
    use crate::state::options::QrOptions;
    use crate::test_utils::link_payload;
    use chrono::Utc;

    #[test]
    fn test_view_keeps_payload() {
        let payload = link_payload("https://example.com");
        let result = generate(&payload, &QrOptions::default(), Utc::now()).unwrap();
        let view = ResultView::new(result).unwrap();

        assert_eq!(view.payload(), payload);
        assert_eq!(view.result().content, "https://example.com");
    }

    #[test]
    fn test_broken_image_is_rejected() {
        let payload = link_payload("https://example.com");
        let mut result = generate(&payload, &QrOptions::default(), Utc::now()).unwrap();
        result.image = "not a data url".to_string();
        assert!(ResultView::new(result).is_err());
    }
}
