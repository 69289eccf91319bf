//! Recent codes list

use chrono::{DateTime, Local, TimeZone};
use iced::widget::{button, column, container, row, text, Column};
use iced::{Alignment, Color, Element, Length};
use std::fmt::Display;

use crate::state::data::HistoryEntry;
use crate::state::history::History;
use crate::Message;

const MAX_PREVIEW_CHARS: usize = 48;
const HINT_GRAY: Color = Color::from_rgb(0.45, 0.45, 0.5);

/// "Today at 14:05", "Yesterday at 09:30", otherwise the full date
pub fn format_timestamp<Tz: TimeZone>(at: &DateTime<Tz>, now: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    let day = at.date_naive();
    let today = now.date_naive();
    let time = at.format("%H:%M");

    if day == today {
        format!("Today at {}", time)
    } else if today.pred_opt() == Some(day) {
        format!("Yesterday at {}", time)
    } else {
        at.format("%b %d, %Y at %H:%M").to_string()
    }
}

/// Shorten long content for a single list line
pub fn truncate(content: &str, max_chars: usize) -> String {
    if content.chars().count() <= max_chars {
        return content.to_string();
    }
    let kept: String = content.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", kept)
}

pub fn view(history: &History) -> Element<'_, Message> {
    let clear = button(text("Clear").size(13))
        .on_press_maybe((!history.is_empty()).then_some(Message::ClearHistory))
        .style(button::danger);

    let header = row![
        text(format!("History ({}/{})", history.len(), history.limit()))
            .size(20)
            .width(Length::Fill),
        clear,
    ]
    .align_y(Alignment::Center);

    if history.is_empty() {
        return column![
            header,
            text("Generated codes will show up here").size(14).color(HINT_GRAY),
        ]
        .spacing(10)
        .into();
    }

    let now = Local::now();
    let entries = history
        .entries()
        .iter()
        .fold(Column::new().spacing(8), |list, entry| list.push(entry_row(entry, &now)));

    let mut content = column![header, entries].spacing(10);
    if history.len() >= history.limit() {
        content = content.push(
            text(format!("Only the last {} codes are kept", history.limit()))
                .size(12)
                .color(HINT_GRAY),
        );
    }
    content.into()
}

fn entry_row<'a>(entry: &'a HistoryEntry, now: &DateTime<Local>) -> Element<'a, Message> {
    let result = &entry.result;
    let created = result.created_at.with_timezone(&Local);

    let details = column![
        row![
            text(&result.name).size(15),
            text(result.kind.to_string()).size(12).color(HINT_GRAY),
        ]
        .spacing(8)
        .align_y(Alignment::Center),
        text(truncate(&result.content, MAX_PREVIEW_CHARS)).size(13),
        text(format_timestamp(&created, now)).size(12).color(HINT_GRAY),
    ]
    .spacing(2)
    .width(Length::Fill);

    let actions = row![
        button(text("Regenerate").size(13)).on_press(Message::RegenerateFromHistory(entry.id)),
        button(text("Copy").size(13))
            .on_press(Message::CopyFromHistory(entry.id))
            .style(button::secondary),
    ]
    .spacing(6);

    container(row![details, actions].spacing(10).align_y(Alignment::Center))
        .padding(10)
        .width(Length::Fill)
        .style(container::rounded_box)
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_format_timestamp() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 18, 0, 0).unwrap();

        let today = Utc.with_ymd_and_hms(2024, 5, 1, 14, 5, 0).unwrap();
        assert_eq!(format_timestamp(&today, &now), "Today at 14:05");

        let yesterday = Utc.with_ymd_and_hms(2024, 4, 30, 9, 30, 0).unwrap();
        assert_eq!(format_timestamp(&yesterday, &now), "Yesterday at 09:30");

        let older = Utc.with_ymd_and_hms(2024, 4, 2, 7, 45, 0).unwrap();
        assert_eq!(format_timestamp(&older, &now), "Apr 02, 2024 at 07:45");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 10), "abcdefghij");
        assert_eq!(truncate("abcdefghijk", 10), "abcdefg...");
        assert_eq!(truncate("ççççç", 4), "ç...");
    }
}
