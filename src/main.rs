use chrono::Utc;
use iced::widget::{button, column, container, row, scrollable, text, Row};
use iced::{Alignment, Color, Element, Length, Size, Task, Theme};
use log::{debug, error, info, warn};
use rfd::{FileDialog, MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};
use std::path::PathBuf;

mod color;
mod config;
mod error;
mod payload;
mod qr;
mod state;
mod ui;

#[cfg(test)]
mod test_utils;

use config::Config;
use error::AppResult;
use payload::{Payload, WifiCredentials};
use qr::export::{download_file_name, print_document, write_artifact};
use state::data::{ContentKind, QrResult};
use state::history::History;
use state::options::{Logo, QrOptions};
use state::storage::LocalStore;
use ui::customization::{CustomizationPanel, OptionMessage};
use ui::forms::{FormMessage, LinkForm, ReviewForm, WifiForm};
use ui::result::ResultView;
use ui::toast::{ToastKind, Toasts};
use ui::Tab;

/// File types accepted by the logo picker
const LOGO_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "gif", "webp", "bmp"];

/// Why a generation was started
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Form submission, recorded in history
    Submit,
    /// Option change on the displayed code
    Refresh,
}

/// Main application state
struct QrStudio {
    config: Config,
    tab: Tab,
    link_form: LinkForm,
    review_form: ReviewForm,
    wifi_form: WifiForm,
    /// Options as edited in the panel
    options: QrOptions,
    /// Options of the last successful generation, restored on failure
    committed: QrOptions,
    panel: CustomizationPanel,
    current: Option<ResultView>,
    history: History,
    is_generating: bool,
    is_refreshing: bool,
    /// Bumped on every option change; only the latest debounce timer fires a refresh
    refresh_seq: u64,
    /// Bumped whenever the displayed code is superseded; older refreshes are dropped
    generation_seq: u64,
    toasts: Toasts,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    TabSelected(Tab),
    Form(FormMessage),
    SubmitLink,
    SubmitReview,
    SubmitWifi,
    Option(OptionMessage),
    LogoLoaded(Result<Logo, String>),
    /// Debounce timer with the sequence number it was started for
    RefreshDue(u64),
    Generated {
        origin: Origin,
        /// `generation_seq` at the time the run was started
        seq: u64,
        options: QrOptions,
        result: Result<QrResult, String>,
    },
    DownloadPng,
    DownloadSvg,
    Print,
    CopyContent,
    ResetResult,
    Saved(Result<PathBuf, String>),
    RegenerateFromHistory(i64),
    CopyFromHistory(i64),
    ClearHistory,
    DismissToast(u64),
}

impl QrStudio {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let config = Config::init().unwrap_or_else(|e| {
            warn!("Ignoring invalid configuration: {}", e);
            let base = dirs::data_dir().unwrap_or_else(std::env::temp_dir);
            Config::with_data_dir(base.join("qr-studio"))
        });

        // fall back to memory so a bad data directory only loses persistence
        let store_path = config.store_path();
        let store = LocalStore::open(&store_path)
            .or_else(|e| {
                warn!(
                    "Could not open {} ({}), history will not be saved",
                    store_path.display(),
                    e
                );
                LocalStore::open_in_memory()
            })
            .expect("Failed to initialize an in-memory store");

        info!("Data directory: {}", config.data_dir().display());
        let history = History::load(store, config.history_limit());
        info!("QR Studio initialized with {} saved codes", history.len());

        (Self::with_history(config, history), Task::none())
    }

    fn with_history(config: Config, history: History) -> Self {
        let options = QrOptions::default();
        QrStudio {
            config,
            tab: Tab::default(),
            link_form: LinkForm::default(),
            review_form: ReviewForm::default(),
            wifi_form: WifiForm::default(),
            panel: CustomizationPanel::new(&options),
            committed: options.clone(),
            options,
            current: None,
            history,
            is_generating: false,
            is_refreshing: false,
            refresh_seq: 0,
            generation_seq: 0,
            toasts: Toasts::default(),
        }
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::TabSelected(tab) => {
                self.tab = tab;
                Task::none()
            }
            Message::Form(form_message) => {
                match self.tab {
                    Tab::Link => self.link_form.update(form_message),
                    Tab::Review => self.review_form.update(form_message),
                    Tab::Wifi => self.wifi_form.update(form_message),
                }
                Task::none()
            }
            Message::SubmitLink => {
                let payload = self.link_form.submit();
                self.submit(payload)
            }
            Message::SubmitReview => {
                let payload = self.review_form.submit();
                self.submit(payload)
            }
            Message::SubmitWifi => {
                let payload = self.wifi_form.submit();
                self.submit(payload)
            }
            Message::Option(OptionMessage::PickLogo) => {
                let picked = FileDialog::new()
                    .set_title("Choose a logo")
                    .add_filter("Images", &LOGO_EXTENSIONS)
                    .pick_file();

                match picked {
                    Some(path) => Task::perform(load_logo(path), Message::LogoLoaded),
                    None => Task::none(),
                }
            }
            Message::Option(option_message) => {
                if self.panel.apply(&mut self.options, option_message) {
                    self.schedule_refresh()
                } else {
                    Task::none()
                }
            }
            Message::LogoLoaded(Ok(logo)) => {
                let notice = format!("Logo '{}' added", logo.file_name);
                self.options.logo = Some(logo);
                let refresh = self.schedule_refresh();
                Task::batch([refresh, self.notify(ToastKind::Success, notice)])
            }
            Message::LogoLoaded(Err(e)) => self.notify(ToastKind::Error, e),
            Message::RefreshDue(seq) => {
                if seq != self.refresh_seq {
                    return Task::none();
                }
                match &self.current {
                    Some(view) => {
                        let payload = view.payload();
                        self.is_refreshing = true;
                        self.start_generation(payload, Origin::Refresh)
                    }
                    None => Task::none(),
                }
            }
            Message::Generated {
                origin,
                seq,
                options,
                result,
            } => self.finish_generation(origin, seq, options, result),
            Message::DownloadPng => self.export("png", "PNG image", |result| result.png_bytes()),
            Message::DownloadSvg => self.export("svg", "SVG image", |result| {
                qr::render_svg(result).map(String::into_bytes)
            }),
            Message::Print => self.export("html", "Print sheet", |result| {
                Ok(print_document(result).into_bytes())
            }),
            Message::CopyContent => match &self.current {
                Some(view) => {
                    let content = view.result().content.clone();
                    self.copy(content)
                }
                None => Task::none(),
            },
            Message::ResetResult => {
                self.current = None;
                self.is_refreshing = false;
                self.refresh_seq += 1;
                self.generation_seq += 1;
                Task::none()
            }
            Message::Saved(Ok(path)) => {
                let file = path
                    .file_name()
                    .map(|name| name.to_string_lossy().to_string())
                    .unwrap_or_else(|| path.display().to_string());
                self.notify(ToastKind::Success, format!("Saved {}", file))
            }
            Message::Saved(Err(e)) => {
                error!("{}", e);
                self.notify(ToastKind::Error, e)
            }
            Message::RegenerateFromHistory(id) => self.restore(id),
            Message::CopyFromHistory(id) => match self.history.get(id) {
                Some(entry) => {
                    let content = entry.result.content.clone();
                    self.copy(content)
                }
                None => Task::none(),
            },
            Message::ClearHistory => {
                let answer = MessageDialog::new()
                    .set_level(MessageLevel::Warning)
                    .set_title("Clear history")
                    .set_description("Remove every saved QR code? This cannot be undone.")
                    .set_buttons(MessageButtons::YesNo)
                    .show();

                if !matches!(answer, MessageDialogResult::Yes) {
                    return Task::none();
                }

                match self.history.clear() {
                    Ok(()) => self.notify(ToastKind::Success, "History cleared"),
                    Err(e) => {
                        error!("Failed to clear history: {}", e);
                        self.notify(ToastKind::Error, "Could not clear history")
                    }
                }
            }
            Message::DismissToast(id) => {
                self.toasts.dismiss(id);
                Task::none()
            }
        }
    }

    fn submit(&mut self, payload: Option<Payload>) -> Task<Message> {
        let Some(payload) = payload else {
            return self.notify(ToastKind::Error, "Please fix the highlighted fields");
        };
        if self.is_generating {
            return Task::none();
        }

        self.is_generating = true;
        // a pending refresh would only redo the old code
        self.refresh_seq += 1;
        self.start_generation(payload, Origin::Submit)
    }

    fn start_generation(&mut self, payload: Payload, origin: Origin) -> Task<Message> {
        self.generation_seq += 1;
        let seq = self.generation_seq;
        let requested = self.options.clone();
        Task::perform(
            qr::generate_async(payload, requested.clone()),
            move |result| Message::Generated {
                origin,
                seq,
                options: requested.clone(),
                result,
            },
        )
    }

    fn finish_generation(
        &mut self,
        origin: Origin,
        seq: u64,
        options: QrOptions,
        result: Result<QrResult, String>,
    ) -> Task<Message> {
        match origin {
            Origin::Submit => {
                self.is_generating = false;
                if seq == self.generation_seq {
                    self.is_refreshing = false;
                }
            }
            Origin::Refresh if seq != self.generation_seq => {
                debug!("Dropping refresh {} superseded by generation {}", seq, self.generation_seq);
                return Task::none();
            }
            Origin::Refresh => self.is_refreshing = false,
        }

        let view = result.and_then(|result| ResultView::new(result).map_err(|e| e.to_string()));
        let view = match view {
            Ok(view) => view,
            Err(e) => {
                self.options = self.committed.clone();
                self.panel.sync(&self.options);
                return self.notify(ToastKind::Error, format!("Failed to generate QR code: {}", e));
            }
        };

        self.committed = options;
        let mut tasks = Vec::new();

        if origin == Origin::Submit {
            // a refresh started while this ran would redraw the previous content
            self.generation_seq += 1;
            self.is_refreshing = false;
            let now_ms = Utc::now().timestamp_millis();
            match self.history.push(view.result().clone(), now_ms) {
                Ok(entry) => info!("Saved '{}' to history as {}", entry.result.name, entry.id),
                Err(e) => {
                    error!("Failed to save history: {}", e);
                    tasks.push(self.notify(ToastKind::Error, "Could not save to history"));
                }
            }
            tasks.push(self.notify(ToastKind::Success, "QR code generated"));
        }

        self.current = Some(view);
        if origin == Origin::Submit && self.options != self.committed {
            // options edited while the submission ran still apply to the new code
            tasks.push(self.schedule_refresh());
        }
        Task::batch(tasks)
    }

    /// Start the debounce timer for regenerating the displayed code
    fn schedule_refresh(&mut self) -> Task<Message> {
        if self.current.is_none() {
            return Task::none();
        }

        self.refresh_seq += 1;
        let seq = self.refresh_seq;
        let delay = self.config.debounce();
        Task::perform(async move { tokio::time::sleep(delay).await }, move |_| {
            Message::RefreshDue(seq)
        })
    }

    /// Bring a history entry back as the displayed code
    fn restore(&mut self, id: i64) -> Task<Message> {
        let Some(entry) = self.history.get(id) else {
            return Task::none();
        };
        let result = entry.result.clone();

        let view = match ResultView::new(result.clone()) {
            Ok(view) => view,
            Err(e) => {
                error!("History entry {} is unreadable: {}", id, e);
                return self.notify(ToastKind::Error, "This history entry can no longer be shown");
            }
        };

        self.options = result.options.clone();
        self.committed = result.options.clone();
        self.panel.sync(&self.options);
        self.tab = Tab::for_kind(result.kind);

        match result.kind {
            ContentKind::Link => {
                self.link_form = LinkForm {
                    url: result.content.clone(),
                    error: None,
                }
            }
            ContentKind::Review => self.review_form.fill_from_url(&result.content, &result.name),
            ContentKind::Wifi => match WifiCredentials::parse(&result.content) {
                Some(credentials) => self.wifi_form.fill(credentials),
                None => warn!("Could not parse WiFi payload of entry {}", id),
            },
        }

        self.current = Some(view);
        self.is_refreshing = false;
        self.refresh_seq += 1;
        self.generation_seq += 1;
        self.notify(ToastKind::Success, format!("Restored '{}'", result.name))
    }

    /// Render the displayed code into bytes and save them where the user picks
    fn export(
        &mut self,
        ext: &str,
        label: &str,
        render: fn(&QrResult) -> AppResult<Vec<u8>>,
    ) -> Task<Message> {
        let Some(view) = &self.current else {
            return Task::none();
        };
        let result = view.result();
        let file_name = download_file_name(&result.name, Utc::now().timestamp_millis(), ext);

        let bytes = match render(result) {
            Ok(bytes) => bytes,
            Err(e) => {
                error!("Failed to export {}: {}", ext, e);
                return self.notify(ToastKind::Error, format!("Could not create the {}", label));
            }
        };

        let picked = FileDialog::new()
            .set_title(format!("Save {}", label))
            .set_file_name(file_name)
            .add_filter(label, &[ext])
            .save_file();

        match picked {
            Some(path) => Task::perform(write_artifact(path, bytes), Message::Saved),
            None => Task::none(),
        }
    }

    fn copy(&mut self, content: String) -> Task<Message> {
        Task::batch([
            iced::clipboard::write(content),
            self.notify(ToastKind::Success, "Content copied to clipboard"),
        ])
    }

    /// Show a toast and schedule its dismissal
    fn notify(&mut self, kind: ToastKind, text: impl Into<String>) -> Task<Message> {
        let id = self.toasts.push(kind, text);
        let delay = self.config.toast();
        Task::perform(async move { tokio::time::sleep(delay).await }, move |_| {
            Message::DismissToast(id)
        })
    }

    /// Build the user interface
    fn view(&self) -> Element<'_, Message> {
        let tabs = Tab::ALL.iter().fold(Row::new().spacing(6), |tabs, &tab| {
            let style: fn(&Theme, button::Status) -> button::Style = if tab == self.tab {
                button::primary
            } else {
                button::secondary
            };
            tabs.push(
                button(text(tab.to_string()).size(15))
                    .on_press(Message::TabSelected(tab))
                    .style(style)
                    .padding([8, 16]),
            )
        });

        let form = match self.tab {
            Tab::Link => self.link_form.view(self.is_generating),
            Tab::Review => self.review_form.view(self.is_generating),
            Tab::Wifi => self.wifi_form.view(self.is_generating),
        };

        let left = column![tabs, card(form), card(self.panel.view(&self.options))]
            .spacing(16)
            .width(Length::FillPortion(1));

        let result: Element<'_, Message> = match &self.current {
            Some(view) => view.view(self.is_refreshing),
            None => column![
                text("No QR code yet").size(20),
                text("Fill in a form and press generate to see your code here")
                    .size(14)
                    .color(Color::from_rgb(0.45, 0.45, 0.5)),
            ]
            .spacing(8)
            .align_x(Alignment::Center)
            .width(Length::Fill)
            .into(),
        };

        let right = column![card(result), card(ui::history::view(&self.history))]
            .spacing(16)
            .width(Length::FillPortion(1));

        let content = column![
            text("QR Studio").size(32),
            self.toasts.view(),
            row![left, right].spacing(20),
        ]
        .spacing(16)
        .padding(24);

        scrollable(content).height(Length::Fill).into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Light
    }
}

fn card<'a>(content: impl Into<Element<'a, Message>>) -> Element<'a, Message> {
    container(content)
        .padding(20)
        .width(Length::Fill)
        .style(container::rounded_box)
        .into()
}

fn main() -> iced::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    iced::application("QR Studio", QrStudio::update, QrStudio::view)
        .theme(QrStudio::theme)
        .window_size(Size::new(1180.0, 860.0))
        .centered()
        .run_with(QrStudio::new)
}

/// Read a picked logo file off the UI thread and validate it
async fn load_logo(path: PathBuf) -> Result<Logo, String> {
    let supported = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| LOGO_EXTENSIONS.contains(&ext.as_str()));
    if !supported {
        return Err(format!("{} is not a supported image type", path.display()));
    }

    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "logo".to_string());

    Logo::from_bytes(file_name, &bytes).map_err(|e| {
        warn!("Rejected logo {}: {}", path.display(), e);
        e.to_string()
    })
}
