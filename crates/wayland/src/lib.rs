//! Wayland layer-shell panel for `panelfade`.
//!
//! Owns the Iced application loop and wires the background tasks into the
//! panel engine:
//! - Hyprland IPC event stream (focus, fullscreen, workspaces, windows)
//! - Settings file watcher (live reload on change)
//! - Frame timer, only while a transition is running

use fade_config::{
    default_path, load as load_settings, store::THEME_KEY, SettingsStore, SettingsWatcher,
};
use fade_core::{DesktopSignal, Shadow, WindowSource};
use fade_engine::{Extension, StartupTicket};
use fade_ipc::{fetch_active_window, ActiveWindowInfo, DesktopModel, HyprlandEvent, HyprlandIpc};
use fade_theme::{Foreground, NativeTheme, PanelStyle};
use futures::channel::mpsc::Sender;
use iced::{
    border::Radius,
    widget::{container, row, stack, text, Space},
    Background, Border, Element, Length, Padding, Subscription, Task,
};
use iced_layershell::{
    build_pattern::application,
    reexport::{Anchor, Layer},
    settings::{LayerShellSettings, Settings},
    to_layer_message,
};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Panel height in logical pixels, corners included.
const PANEL_HEIGHT: u32 = 32;
const CORNER_RADIUS: f32 = 8.0;
/// Delay before the theme is read and the panel is modified.
const STARTUP_DELAY: Duration = Duration::from_millis(100);
/// Animation frame interval (~60 Hz).
const FRAME_INTERVAL: Duration = Duration::from_millis(16);
const FONT_SIZE: f32 = 13.0;
/// Maximum number of characters shown before truncating with `…`.
const MAX_TITLE_CHARS: usize = 60;

// ── Entry point ───────────────────────────────────────────────────────────────

/// Start the panel.  Never returns under normal operation.
pub fn run() -> iced_layershell::Result {
    application(Panel::new, Panel::namespace, Panel::update, Panel::view)
        .subscription(Panel::subscription)
        .style(Panel::style)
        .settings(Settings {
            layer_settings: LayerShellSettings {
                size: Some((0, PANEL_HEIGHT)), // width=0 + L|R anchor = full-width stretch
                exclusive_zone: (PANEL_HEIGHT as f32 - CORNER_RADIUS) as i32,
                anchor: Anchor::Top | Anchor::Left | Anchor::Right,
                layer: Layer::Top,
                ..Default::default()
            },
            ..Default::default()
        })
        .run()
}

// ── Message ───────────────────────────────────────────────────────────────────

/// `#[to_layer_message]` injects layer-shell control variants; they are
/// handled by the backend and never reach `update()`.
#[to_layer_message]
#[derive(Debug, Clone)]
pub enum Message {
    Hypr(HyprlandEvent),
    /// Answer to an `activewindow` query.
    ActiveWindow(Result<Option<ActiveWindowInfo>, String>),
    SettingsReloaded(SettingsStore),
    /// The deferred startup task fired.
    Startup(StartupTicket),
    Frame(Instant),
}

// ── State ─────────────────────────────────────────────────────────────────────

struct Panel {
    style:     Rc<RefCell<PanelStyle>>,
    desktop:   Rc<RefCell<DesktopModel>>,
    extension: Extension,
    ipc:       Option<HyprlandIpc>,
}

impl Panel {
    fn new() -> (Self, Task<Message>) {
        let settings = load_settings(default_path()).unwrap_or_else(|e| {
            warn!("{e}; using default settings");
            SettingsStore::default()
        });

        let theme = NativeTheme::from_config(settings.theme());
        let style = Rc::new(RefCell::new(PanelStyle::new(theme)));
        let desktop = Rc::new(RefCell::new(DesktopModel::new()));
        let extension = Extension::new(settings, desktop.clone(), style.clone());

        let ipc = HyprlandIpc::new()
            .inspect_err(|e| warn!("Hyprland IPC unavailable (not under Hyprland?): {e}"))
            .ok();

        let mut panel = Self { style, desktop, extension, ipc };

        // Know the focused window before the first resolution.
        let query = panel.query_active_window();
        let startup = panel.enable();

        (panel, query.chain(startup))
    }

    fn namespace() -> String {
        String::from("panelfade")
    }

    fn enable(&mut self) -> Task<Message> {
        match self.extension.enable() {
            Ok(ticket) => Task::perform(tokio::time::sleep(STARTUP_DELAY), move |()| {
                Message::Startup(ticket)
            }),
            Err(e) => {
                warn!("Could not enable panel modifications: {e}");
                Task::none()
            }
        }
    }

    fn query_active_window(&self) -> Task<Message> {
        let Some(ipc) = self.ipc.clone() else {
            return Task::none();
        };
        Task::perform(
            async move { fetch_active_window(&ipc).await.map_err(|e| e.to_string()) },
            Message::ActiveWindow,
        )
    }

    fn emit(&mut self, signal: Option<DesktopSignal>) {
        if let Some(signal) = signal {
            let handlers = self.extension.signal(&signal);
            debug!("{signal:?} delivered to {handlers} handler(s)");
        }
    }

    // ── Update ────────────────────────────────────────────────────────────────

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Hypr(event) => {
                let signal = self.desktop.borrow_mut().apply(&event);
                self.emit(signal);
                if event.needs_refresh() {
                    return self.query_active_window();
                }
            }
            Message::ActiveWindow(Ok(info)) => {
                let signal = self.desktop.borrow_mut().sync(info);
                self.emit(signal);
            }
            Message::ActiveWindow(Err(e)) => {
                warn!("Active window query failed: {e}");
                let signal = self.desktop.borrow_mut().settle();
                self.emit(signal);
            }
            Message::SettingsReloaded(store) => {
                let changed = self.extension.reload_settings(store);
                if !changed.is_empty() {
                    info!("Settings reloaded; changed: {}", changed.join(", "));
                }
                if changed.iter().any(|key| key == THEME_KEY) {
                    warn!("[theme] changes take effect after a restart");
                }
            }
            Message::Startup(ticket) => {
                if let Err(e) = self.extension.run_startup(ticket) {
                    warn!("Startup aborted: {e}");
                }
            }
            Message::Frame(now) => {
                self.extension.tick(now);
            }
            // Layer-shell injected variants handled by the backend.
            _ => {}
        }
        Task::none()
    }

    // ── View ──────────────────────────────────────────────────────────────────

    fn view(&self) -> Element<'_, Message> {
        let style = self.style.borrow();
        let context = self.desktop.borrow().window_context();

        let title = match context.window_title {
            Some(title) if title.chars().count() > MAX_TITLE_CHARS => {
                let truncated: String = title.chars().take(MAX_TITLE_CHARS).collect();
                format!("{truncated}…")
            }
            Some(title) => title,
            None => String::from("Desktop"),
        };
        let app = context.app_id.unwrap_or_default();

        let content = row![
            shadowed(app, style.foreground(Foreground::Icon).to_iced(), style.icon_shadow()),
            shadowed(title, style.foreground(Foreground::Text).to_iced(), style.text_shadow()),
            shadowed("▾".to_string(), style.foreground(Foreground::Arrow).to_iced(), style.icon_shadow()),
        ]
        .spacing(12.0)
        .align_y(iced::Alignment::Center);

        let background = style.background().to_iced();
        let border = style.border().map(|c| c.to_iced());
        let bar = container(content)
            .width(Length::Fill)
            .height(Length::Fixed(PANEL_HEIGHT as f32 - CORNER_RADIUS))
            .padding([0, 12])
            .center_y(Length::Fixed(PANEL_HEIGHT as f32 - CORNER_RADIUS))
            .style(move |_: &iced::Theme| container::Style {
                background: Some(Background::Color(background)),
                border: Border {
                    color:  border.unwrap_or(iced::Color::TRANSPARENT),
                    width:  if border.is_some() { 1.0 } else { 0.0 },
                    radius: Radius {
                        top_left:     0.0,
                        top_right:    0.0,
                        bottom_right: CORNER_RADIUS,
                        bottom_left:  CORNER_RADIUS,
                    },
                },
                ..Default::default()
            });

        // The corner colour fills the rounded-off area under the bar.
        let corner = style.corner().to_iced();
        container(stack![
            container(Space::new())
                .width(Length::Fill)
                .height(Length::Fill)
                .style(move |_: &iced::Theme| container::Style {
                    background: Some(Background::Color(corner)),
                    ..Default::default()
                }),
            bar,
        ])
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
    }

    // ── Subscriptions ─────────────────────────────────────────────────────────

    fn subscription(&self) -> Subscription<Message> {
        let frames = if self.extension.is_animating() {
            iced::time::every(FRAME_INTERVAL).map(Message::Frame)
        } else {
            Subscription::none()
        };

        Subscription::batch([
            frames,
            Subscription::run(ipc_stream),
            Subscription::run(settings_stream),
        ])
    }

    // ── Style ─────────────────────────────────────────────────────────────────

    fn style(&self, _theme: &iced::Theme) -> iced::theme::Style {
        // The surface itself stays clear; `view` paints the panel.
        iced::theme::Style {
            background_color: iced::Color::TRANSPARENT,
            text_color: self.style.borrow().foreground(Foreground::Text).to_iced(),
        }
    }
}

impl Drop for Panel {
    fn drop(&mut self) {
        self.extension.disable();
    }
}

/// Text with an optional drop shadow drawn underneath.
fn shadowed<'a>(
    label: String,
    color: iced::Color,
    shadow: Option<Shadow>,
) -> Element<'a, Message> {
    let Some(shadow) = shadow else {
        return text(label).size(FONT_SIZE).color(color).into();
    };

    let offset = Padding {
        top:    shadow.offset_y.max(0) as f32,
        left:   shadow.offset_x.max(0) as f32,
        right:  0.0,
        bottom: 0.0,
    };
    let shade = fade_theme::Color::from(shadow.color).to_iced();

    stack![
        container(text(label.clone()).size(FONT_SIZE).color(shade)).padding(offset),
        text(label).size(FONT_SIZE).color(color),
    ]
    .into()
}

// ── Subscription streams ──────────────────────────────────────────────────────
//
// Each free function acts as both the stream builder AND the unique identity
// key for `Subscription::run(fn_ptr)`.

/// Streams live Hyprland events (auto-reconnects on drop).
fn ipc_stream() -> impl iced::futures::Stream<Item = Message> {
    iced::stream::channel(32, |mut sender: Sender<Message>| async move {
        match HyprlandIpc::new() {
            Ok(ipc) => {
                let mut rx = ipc.spawn_listener();
                while let Some(event) = rx.recv().await {
                    let _ = sender.try_send(Message::Hypr(event));
                }
            }
            // The panel still runs, it just never sees a window.
            Err(e) => warn!("Hyprland event stream unavailable: {e}"),
        }

        loop {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
    })
}

/// Watches the settings file and forwards every successful reload.
fn settings_stream() -> impl iced::futures::Stream<Item = Message> {
    iced::stream::channel(1, |mut sender: Sender<Message>| async move {
        let (_watcher, mut rx) = SettingsWatcher::spawn(default_path());

        while let Some(store) = rx.recv().await {
            let _ = sender.try_send(Message::SettingsReloaded(store));
        }

        loop {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
    })
}
