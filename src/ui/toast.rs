//! Transient notifications

use iced::widget::{button, container, row, text, Column};
use iced::{Alignment, Background, Border, Color, Element, Length};

use crate::Message;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub text: String,
}

/// Active toasts in display order, oldest first
#[derive(Debug, Default)]
pub struct Toasts {
    next_id: u64,
    items: Vec<Toast>,
}

impl Toasts {
    /// Queue a toast and return its id for later dismissal
    pub fn push(&mut self, kind: ToastKind, text: impl Into<String>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.items.push(Toast {
            id,
            kind,
            text: text.into(),
        });
        id
    }

    pub fn dismiss(&mut self, id: u64) {
        self.items.retain(|toast| toast.id != id);
    }

    pub fn items(&self) -> &[Toast] {
        &self.items
    }

    pub fn view(&self) -> Element<'_, Message> {
        self.items
            .iter()
            .fold(Column::new().spacing(6), |column, toast| {
                column.push(toast_card(toast))
            })
            .width(Length::Fill)
            .into()
    }
}

fn toast_card(toast: &Toast) -> Element<'_, Message> {
    let (fill, ink) = match toast.kind {
        ToastKind::Success => (Color::from_rgb(0.86, 0.99, 0.91), Color::from_rgb(0.08, 0.40, 0.20)),
        ToastKind::Error => (Color::from_rgb(1.0, 0.89, 0.89), Color::from_rgb(0.60, 0.11, 0.11)),
    };

    container(
        row![
            text(&toast.text).size(14).color(ink).width(Length::Fill),
            button(text("x").size(13))
                .on_press(Message::DismissToast(toast.id))
                .style(button::text)
                .padding([0, 6]),
        ]
        .align_y(Alignment::Center),
    )
    .padding([8, 12])
    .width(Length::Fill)
    .style(move |_theme| container::Style {
        background: Some(Background::Color(fill)),
        border: Border {
            color: ink,
            width: 1.0,
            radius: 6.0.into(),
        },
        ..container::Style::default()
    })
    .into()
}
