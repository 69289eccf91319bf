//! Appearance panel: size, margin, colors, error correction and logo

use iced::widget::{button, column, container, pick_list, row, slider, text, text_input, Column};
use iced::{Alignment, Background, Border, Color, Element, Length};
use iced_aw::Wrap;

use crate::color::{contrast_text_color, ContrastLevel, Rgb, PRESETS};
use crate::state::options::{
    EcLevel, OptionField, QrOptions, MAX_LOGO_SIZE, MAX_MARGIN, MAX_SIZE, MIN_LOGO_SIZE, MIN_SIZE,
};
use crate::Message;

const HINT_GRAY: Color = Color::from_rgb(0.45, 0.45, 0.5);
const ACCENT: Color = Color::from_rgb(0.15, 0.39, 0.92);

#[derive(Debug, Clone)]
pub enum OptionMessage {
    SizeChanged(u32),
    MarginChanged(u32),
    FgInput(String),
    BgInput(String),
    PresetSelected(usize),
    EcSelected(EcLevel),
    LogoSizeChanged(u8),
    PickLogo,
    RemoveLogo,
    Reset(OptionField),
    ResetAll,
}

/// Panel state that is not part of the options themselves.
/// Color fields keep the raw text so a half-typed hex does not
/// clobber the last valid color.
#[derive(Debug, Clone)]
pub struct CustomizationPanel {
    fg_draft: String,
    bg_draft: String,
}

impl CustomizationPanel {
    pub fn new(options: &QrOptions) -> Self {
        Self {
            fg_draft: options.fg_color.clone(),
            bg_draft: options.bg_color.clone(),
        }
    }

    /// Drop any drafts and mirror `options`
    pub fn sync(&mut self, options: &QrOptions) {
        self.fg_draft = options.fg_color.clone();
        self.bg_draft = options.bg_color.clone();
    }

    /// Apply `message` to `options`, returning true if they changed.
    /// `PickLogo` needs a file dialog and is handled by the caller.
    pub fn apply(&mut self, options: &mut QrOptions, message: OptionMessage) -> bool {
        let before = options.clone();

        match message {
            OptionMessage::SizeChanged(size) => options.set_size(size),
            OptionMessage::MarginChanged(margin) => options.set_margin(margin),
            OptionMessage::FgInput(input) => {
                if let Ok(rgb) = Rgb::from_hex(&input) {
                    options.fg_color = rgb.to_hex();
                }
                self.fg_draft = input;
            }
            OptionMessage::BgInput(input) => {
                if let Ok(rgb) = Rgb::from_hex(&input) {
                    options.bg_color = rgb.to_hex();
                }
                self.bg_draft = input;
            }
            OptionMessage::PresetSelected(index) => {
                if let Some(preset) = PRESETS.get(index) {
                    options.apply_preset(preset);
                    self.sync(options);
                }
            }
            OptionMessage::EcSelected(level) => options.error_correction = level,
            OptionMessage::LogoSizeChanged(percent) => options.set_logo_size(percent),
            OptionMessage::RemoveLogo => options.logo = None,
            OptionMessage::Reset(field) => {
                options.reset(field);
                self.sync(options);
            }
            OptionMessage::ResetAll => {
                options.reset_all();
                self.sync(options);
            }
            OptionMessage::PickLogo => {}
        }

        *options != before
    }

    pub fn view<'a>(&'a self, options: &'a QrOptions) -> Element<'a, Message> {
        let reset_all = button(text("Reset all").size(13))
            .on_press_maybe(
                (*options != QrOptions::default()).then_some(Message::Option(OptionMessage::ResetAll)),
            )
            .style(button::text);

        let header = row![text("Customize").size(20), iced::widget::horizontal_space(), reset_all]
            .align_y(Alignment::Center);

        let size = column![
            labeled(format!("Size: {}px", options.size), options, OptionField::Size),
            slider(MIN_SIZE..=MAX_SIZE, options.size, |v| {
                Message::Option(OptionMessage::SizeChanged(v))
            })
            .step(10u32),
        ]
        .spacing(4);

        let margin = column![
            labeled(format!("Margin: {} modules", options.margin), options, OptionField::Margin),
            slider(0..=MAX_MARGIN, options.margin, |v| Message::Option(OptionMessage::MarginChanged(v))),
        ]
        .spacing(4);

        let colors = row![
            color_field("Foreground", &self.fg_draft, options, OptionField::FgColor, |s| {
                Message::Option(OptionMessage::FgInput(s))
            }),
            color_field("Background", &self.bg_draft, options, OptionField::BgColor, |s| {
                Message::Option(OptionMessage::BgInput(s))
            }),
        ]
        .spacing(16);

        let error_correction = column![
            labeled("Error correction".to_string(), options, OptionField::ErrorCorrection),
            pick_list(EcLevel::ALL, Some(options.error_correction), |level| {
                Message::Option(OptionMessage::EcSelected(level))
            })
            .width(Length::Fill),
        ]
        .spacing(4);

        let mut panel = Column::new()
            .spacing(14)
            .push(header)
            .push(size)
            .push(margin)
            .push(colors)
            .push(presets(options));

        if let Some(advisory) = contrast_advisory(options) {
            panel = panel.push(advisory);
        }

        panel = panel.push(error_correction);
        if options.logo.is_some() {
            panel = panel.push(
                text("A logo is present, so maximum error correction (H) is used")
                    .size(12)
                    .color(HINT_GRAY),
            );
        }

        panel.push(logo_section(options)).into()
    }
}

/// Field label with a reset link shown only when the field differs from its default
fn labeled<'a>(label: String, options: &QrOptions, field: OptionField) -> Element<'a, Message> {
    let mut line = row![text(label).size(14)].spacing(8).align_y(Alignment::Center);
    if options.is_modified(field) {
        line = line.push(
            button(text("reset").size(12))
                .on_press(Message::Option(OptionMessage::Reset(field)))
                .style(button::text)
                .padding(0),
        );
    }
    line.into()
}

fn swatch<'a>(color: Rgb) -> Element<'a, Message> {
    container(text(""))
        .width(Length::Fixed(28.0))
        .height(Length::Fixed(28.0))
        .style(move |_theme| container::Style {
            background: Some(Background::Color(color.to_iced())),
            border: Border {
                color: Color::from_rgb(0.8, 0.8, 0.82),
                width: 1.0,
                radius: 4.0.into(),
            },
            ..container::Style::default()
        })
        .into()
}

fn color_field<'a>(
    label: &'a str,
    draft: &'a str,
    options: &QrOptions,
    field: OptionField,
    on_input: impl Fn(String) -> Message + 'a,
) -> Element<'a, Message> {
    let current = match field {
        OptionField::BgColor => options.bg(),
        _ => options.fg(),
    }
    .unwrap_or(Rgb::BLACK);

    let mut content = column![
        labeled(label.to_string(), options, field),
        row![swatch(current), text_input("#000000", draft).on_input(on_input).padding(6)]
            .spacing(8)
            .align_y(Alignment::Center),
    ]
    .spacing(4)
    .width(Length::Fill);

    if Rgb::from_hex(draft).is_err() {
        content = content.push(text("Use #RRGGBB or #RGB").size(12).color(HINT_GRAY));
    }
    content.into()
}

fn presets(options: &QrOptions) -> Element<'_, Message> {
    let chips = PRESETS
        .iter()
        .enumerate()
        .map(|(index, preset)| {
            let fill = preset.fg.to_iced();
            let ink = contrast_text_color(preset.fg).to_iced();
            let outline = if options.matches_preset(preset) {
                ACCENT
            } else {
                preset.bg.to_iced()
            };
            let chip = button(text(preset.name).size(13))
                .on_press(Message::Option(OptionMessage::PresetSelected(index)))
                .padding([6, 12])
                .style(move |_theme, _status| button::Style {
                    background: Some(Background::Color(fill)),
                    text_color: ink,
                    border: Border {
                        color: outline,
                        width: 2.0,
                        radius: 6.0.into(),
                    },
                    ..button::Style::default()
                });
            container(chip).padding(3).into()
        })
        .collect();

    column![text("Presets").size(14), Wrap::with_elements(chips)]
        .spacing(4)
        .into()
}

fn contrast_advisory(options: &QrOptions) -> Option<Element<'_, Message>> {
    let (ratio, level) = options.contrast()?;
    let tint = match level {
        ContrastLevel::Good => Color::from_rgb(0.09, 0.64, 0.29),
        ContrastLevel::Warning => Color::from_rgb(0.85, 0.47, 0.02),
        ContrastLevel::Poor => Color::from_rgb(0.86, 0.15, 0.15),
    };
    Some(
        text(format!("{} ({:.1}:1)", level.label(), ratio))
            .size(13)
            .color(tint)
            .into(),
    )
}

fn logo_section(options: &QrOptions) -> Element<'_, Message> {
    let Some(logo) = &options.logo else {
        return column![
            text("Logo").size(14),
            button(text("Choose image...").size(14)).on_press(Message::Option(OptionMessage::PickLogo)),
            text("PNG, JPG, GIF, WebP or BMP up to 2 MB").size(12).color(HINT_GRAY),
        ]
        .spacing(6)
        .into();
    };

    column![
        text("Logo").size(14),
        row![
            text(&logo.file_name).size(14).width(Length::Fill),
            button(text("Change").size(13))
                .on_press(Message::Option(OptionMessage::PickLogo))
                .style(button::secondary),
            button(text("Remove").size(13))
                .on_press(Message::Option(OptionMessage::RemoveLogo))
                .style(button::danger),
        ]
        .spacing(8)
        .align_y(Alignment::Center),
        labeled(format!("Logo size: {}%", options.logo_size), options, OptionField::LogoSize),
        slider(MIN_LOGO_SIZE..=MAX_LOGO_SIZE, options.logo_size, |v| {
            Message::Option(OptionMessage::LogoSizeChanged(v))
        }),
    ]
    .spacing(6)
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_hex_updates_options() {
        let mut options = QrOptions::default();
        let mut panel = CustomizationPanel::new(&options);

        assert!(panel.apply(&mut options, OptionMessage::FgInput("#2563eb".to_string())));
        assert_eq!(options.fg_color, "#2563EB");
        assert_eq!(panel.fg_draft, "#2563eb");
    }

    #[test]
    fn test_partial_hex_keeps_last_color() {
        let mut options = QrOptions::default();
        let mut panel = CustomizationPanel::new(&options);

        assert!(!panel.apply(&mut options, OptionMessage::BgInput("#FFF0".to_string())));
        assert_eq!(options.bg_color, "#FFFFFF");
        assert_eq!(panel.bg_draft, "#FFF0");
    }

    #[test]
    fn test_preset_and_reset_sync_drafts() {
        let mut options = QrOptions::default();
        let mut panel = CustomizationPanel::new(&options);

        assert!(panel.apply(&mut options, OptionMessage::PresetSelected(1)));
        assert_eq!(panel.fg_draft, "#FFFFFF");
        assert_eq!(panel.bg_draft, "#000000");

        assert!(panel.apply(&mut options, OptionMessage::ResetAll));
        assert_eq!(options, QrOptions::default());
        assert_eq!(panel.fg_draft, "#000000");
    }

    #[test]
    fn test_unchanged_value_reports_no_change() {
        let mut options = QrOptions::default();
        let mut panel = CustomizationPanel::new(&options);

        assert!(!panel.apply(&mut options, OptionMessage::SizeChanged(250)));
        assert!(!panel.apply(&mut options, OptionMessage::PresetSelected(99)));
        assert!(!panel.apply(&mut options, OptionMessage::PickLogo));
        assert!(panel.apply(&mut options, OptionMessage::MarginChanged(0)));
        assert!(panel.apply(&mut options, OptionMessage::Reset(OptionField::Margin)));
        assert_eq!(options.margin, 4);
    }
}
