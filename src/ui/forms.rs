//! Input forms, one per tab
//!
//! Each form owns its raw field text and inline errors. `submit` validates
//! and returns a payload, or records the errors and returns `None`.

use iced::widget::{button, checkbox, column, pick_list, row, text, text_input, Column};
use iced::{Alignment, Color, Element, Length};

use crate::payload::{
    build_link, build_review,
    link::is_valid_url,
    review::{is_valid_place_id, DEFAULT_REVIEW_NAME},
    wifi::WifiErrors,
    FieldError, Payload, Security, WifiCredentials,
};
use crate::Message;

const ERROR_RED: Color = Color::from_rgb(0.86, 0.15, 0.15);
const HINT_GRAY: Color = Color::from_rgb(0.45, 0.45, 0.5);

/// Messages for the form fields
#[derive(Debug, Clone)]
pub enum FormMessage {
    UrlChanged(String),
    PlaceIdChanged(String),
    BusinessNameChanged(String),
    SsidChanged(String),
    PasswordChanged(String),
    SecuritySelected(Security),
    HiddenToggled(bool),
    ShowPasswordToggled(bool),
}

fn field_error<'a>(error: &Option<FieldError>) -> Option<Element<'a, Message>> {
    error
        .as_ref()
        .map(|e| text(e.to_string()).size(13).color(ERROR_RED).into())
}

fn submit_button<'a>(label: &'a str, on_press: Message, is_generating: bool) -> Element<'a, Message> {
    let label = if is_generating { "Generating..." } else { label };
    button(text(label).size(16).width(Length::Fill).align_x(Alignment::Center))
        .on_press_maybe((!is_generating).then_some(on_press))
        .padding(12)
        .width(Length::Fill)
        .into()
}

#[derive(Debug, Clone, Default)]
pub struct LinkForm {
    pub url: String,
    pub error: Option<FieldError>,
}

impl LinkForm {
    pub fn update(&mut self, message: FormMessage) {
        if let FormMessage::UrlChanged(url) = message {
            // once an error is shown, re-check on every keystroke
            if self.error.is_some() {
                self.error = if url.trim().is_empty() || is_valid_url(&url) {
                    None
                } else {
                    Some(FieldError::InvalidUrl)
                };
            }
            self.url = url;
        }
    }

    pub fn submit(&mut self) -> Option<Payload> {
        match build_link(&self.url) {
            Ok(payload) => {
                self.error = None;
                Some(payload)
            }
            Err(e) => {
                self.error = Some(e);
                None
            }
        }
    }

    pub fn view(&self, is_generating: bool) -> Element<'_, Message> {
        let mut content = Column::new()
            .spacing(8)
            .push(text("Generate a QR code for a link").size(22))
            .push(text("Enter any URL, with or without https://").size(14).color(HINT_GRAY))
            .push(text("Link URL").size(14))
            .push(
                text_input("https://example.com or example.com", &self.url)
                    .on_input(|s| Message::Form(FormMessage::UrlChanged(s)))
                    .on_submit(Message::SubmitLink)
                    .padding(10),
            );

        if let Some(error) = field_error(&self.error) {
            content = content.push(error);
        }

        content
            .push(submit_button("Generate QR code", Message::SubmitLink, is_generating))
            .into()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReviewForm {
    pub place_id: String,
    pub business_name: String,
    pub error: Option<FieldError>,
}

impl ReviewForm {
    pub fn update(&mut self, message: FormMessage) {
        match message {
            FormMessage::PlaceIdChanged(place_id) => {
                if self.error.is_some() {
                    let trimmed = place_id.trim();
                    self.error = if trimmed.is_empty() || is_valid_place_id(trimmed) {
                        None
                    } else {
                        Some(FieldError::InvalidPlaceId)
                    };
                }
                self.place_id = place_id;
            }
            FormMessage::BusinessNameChanged(name) => self.business_name = name,
            _ => {}
        }
    }

    pub fn submit(&mut self) -> Option<Payload> {
        match build_review(&self.place_id, &self.business_name) {
            Ok(payload) => {
                self.error = None;
                Some(payload)
            }
            Err(e) => {
                self.error = Some(e);
                None
            }
        }
    }

    pub fn view(&self, is_generating: bool) -> Element<'_, Message> {
        let mut content = Column::new()
            .spacing(8)
            .push(text("Generate a QR code for Google Reviews").size(22))
            .push(
                text("Find your Place ID with Google's Place ID Finder, e.g. ChIJN1t_tDeuEmsRUsoyG83frY4")
                    .size(14)
                    .color(HINT_GRAY),
            )
            .push(text("Google Place ID").size(14))
            .push(
                text_input("ChIJN1t_tDeuEmsRUsoyG83frY4", &self.place_id)
                    .on_input(|s| Message::Form(FormMessage::PlaceIdChanged(s)))
                    .on_submit(Message::SubmitReview)
                    .padding(10),
            );

        if let Some(error) = field_error(&self.error) {
            content = content.push(error);
        }

        content
            .push(text("Business name (optional)").size(14))
            .push(
                text_input("Name shown in history", &self.business_name)
                    .on_input(|s| Message::Form(FormMessage::BusinessNameChanged(s)))
                    .on_submit(Message::SubmitReview)
                    .padding(10),
            )
            .push(text("Only used to label the code; it is not encoded").size(12).color(HINT_GRAY))
            .push(submit_button("Generate review QR code", Message::SubmitReview, is_generating))
            .into()
    }

    /// Pull the Place ID back out of a review URL
    pub fn fill_from_url(&mut self, url: &str, name: &str) {
        if let Some((_, place_id)) = url.split_once("placeid=") {
            self.place_id = place_id.to_string();
        }
        self.business_name = if name == DEFAULT_REVIEW_NAME {
            String::new()
        } else {
            name.to_string()
        };
        self.error = None;
    }
}

#[derive(Debug, Clone, Default)]
pub struct WifiForm {
    pub credentials: WifiCredentials,
    pub show_password: bool,
    pub errors: WifiErrors,
}

impl WifiForm {
    pub fn update(&mut self, message: FormMessage) {
        let credentials = &mut self.credentials;
        match message {
            FormMessage::SsidChanged(ssid) => {
                credentials.ssid = ssid;
                self.errors.ssid = None;
            }
            FormMessage::PasswordChanged(password) => {
                credentials.password = password;
                self.errors.password = None;
            }
            FormMessage::SecuritySelected(security) => {
                credentials.security = security;
                if !security.needs_password() {
                    credentials.password.clear();
                    self.errors.password = None;
                }
            }
            FormMessage::HiddenToggled(hidden) => credentials.hidden = hidden,
            FormMessage::ShowPasswordToggled(show) => self.show_password = show,
            _ => {}
        }
    }

    pub fn submit(&mut self) -> Option<Payload> {
        match self.credentials.build() {
            Ok(payload) => {
                self.errors = WifiErrors::default();
                Some(payload)
            }
            Err(errors) => {
                self.errors = errors;
                None
            }
        }
    }

    pub fn fill(&mut self, credentials: WifiCredentials) {
        self.credentials = credentials;
        self.errors = WifiErrors::default();
    }

    pub fn view(&self, is_generating: bool) -> Element<'_, Message> {
        let credentials = &self.credentials;
        let mut content = Column::new()
            .spacing(8)
            .push(text("Generate a QR code for WiFi").size(22))
            .push(
                text("Devices join the network automatically when they scan it")
                    .size(14)
                    .color(HINT_GRAY),
            )
            .push(text("Network name (SSID) *").size(14))
            .push(
                text_input("MyHomeWiFi", &credentials.ssid)
                    .on_input(|s| Message::Form(FormMessage::SsidChanged(s)))
                    .on_submit(Message::SubmitWifi)
                    .padding(10),
            );

        if let Some(error) = field_error(&self.errors.ssid) {
            content = content.push(error);
        }

        content = content.push(text("Security").size(14)).push(
            pick_list(Security::ALL, Some(credentials.security), |s| {
                Message::Form(FormMessage::SecuritySelected(s))
            })
            .width(Length::Fill),
        );

        if credentials.security.needs_password() {
            content = content.push(text("Password *").size(14)).push(
                row![
                    text_input("At least 8 characters", &credentials.password)
                        .on_input(|s| Message::Form(FormMessage::PasswordChanged(s)))
                        .on_submit(Message::SubmitWifi)
                        .secure(!self.show_password)
                        .padding(10),
                    checkbox("Show", self.show_password)
                        .on_toggle(|b| Message::Form(FormMessage::ShowPasswordToggled(b))),
                ]
                .spacing(10)
                .align_y(Alignment::Center),
            );
            if let Some(error) = field_error(&self.errors.password) {
                content = content.push(error);
            }
        }

        column![
            content,
            checkbox("Hidden network", credentials.hidden)
                .on_toggle(|b| Message::Form(FormMessage::HiddenToggled(b))),
            submit_button("Generate WiFi QR code", Message::SubmitWifi, is_generating),
        ]
        .spacing(10)
        .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::ContentKind;

    #[test]
    fn test_link_form_submit() {
        let mut form = LinkForm::default();
        form.update(FormMessage::UrlChanged("example.com".to_string()));
        let payload = form.submit().unwrap();
        assert_eq!(payload.content, "https://example.com");
        assert!(form.error.is_none());
    }

    #[test]
    fn test_link_form_error_clears_when_fixed() {
        let mut form = LinkForm::default();
        form.update(FormMessage::UrlChanged("bad url".to_string()));
        assert!(form.submit().is_none());
        assert_eq!(form.error, Some(FieldError::InvalidUrl));

        form.update(FormMessage::UrlChanged("good.example".to_string()));
        assert!(form.error.is_none());
    }

    #[test]
    fn test_review_form_round_trip() {
        let mut form = ReviewForm::default();
        form.update(FormMessage::PlaceIdChanged("ChIJN1t_tDeuEmsRUsoyG83frY4".to_string()));
        let payload = form.submit().unwrap();
        assert_eq!(payload.kind, ContentKind::Review);

        let mut restored = ReviewForm::default();
        restored.fill_from_url(&payload.content, "Harbour Cafe");
        assert_eq!(restored.place_id, "ChIJN1t_tDeuEmsRUsoyG83frY4");
        assert_eq!(restored.business_name, "Harbour Cafe");

        restored.fill_from_url(&payload.content, DEFAULT_REVIEW_NAME);
        assert!(restored.business_name.is_empty());
    }

    #[test]
    fn test_wifi_open_network_clears_password() {
        let mut form = WifiForm::default();
        form.update(FormMessage::SsidChanged("Lobby".to_string()));
        form.update(FormMessage::PasswordChanged("secret".to_string()));
        assert!(form.submit().is_none());
        assert!(form.errors.password.is_some());

        form.update(FormMessage::SecuritySelected(Security::NoPass));
        assert!(form.credentials.password.is_empty());
        assert!(form.errors.password.is_none());

        let payload = form.submit().unwrap();
        assert_eq!(payload.content, "WIFI:T:nopass;S:Lobby;H:false;;");
    }
}
