use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use iced::widget::{button, column, container, row, slider, text, text_input};
use iced::{application, window, Element, Length, Task, Theme};

use crate::config::SunburstConfig;

#[derive(Debug, Clone, PartialEq)]
pub struct DialogResult {
    /// Input tree file; `None` shows the bundled sample
    pub tree_path: Option<PathBuf>,
    pub config: SunburstConfig,
    pub label_font_path: String,
}

pub fn run_config_dialog(title: &str, initial: DialogResult) -> Option<DialogResult> {
    let output = Arc::new(Mutex::new(None));
    let output_for_app = output.clone();
    let initial_for_app = initial.clone();
    let title_owned = title.to_string();

    let run = application(
        move |_state: &ConfigDialog| title_owned.clone(),
        move |state: &mut ConfigDialog, message: Message| state.update(message),
        view,
    )
    .theme(|_| Theme::Dark)
    .window_size((760.0, 640.0))
    .run_with(move || (ConfigDialog::new(initial_for_app, output_for_app), Task::none()));

    if let Err(e) = run {
        tracing::warn!("Settings dialog failed: {}", e);
        return None;
    }
    output.lock().ok().and_then(|g| g.clone())
}

#[derive(Debug, Clone)]
enum Message {
    PathChanged(String),
    BrowsePath,
    ThresholdChanged(f32),
    ZoomMsChanged(f32),
    ResetMsChanged(f32),
    LowCutoffChanged(f32),
    DigitsChanged(f32),
    DimmedOpacityChanged(f32),
    ChartWidthChanged(f32),
    ChartHeightChanged(f32),
    LabelFontPathChanged(String),
    Apply,
    Cancel,
}

struct ConfigDialog {
    path_text: String,
    threshold: f32,
    zoom_ms: f32,
    reset_ms: f32,
    low_cutoff: f32,
    digits: f32,
    dimmed_opacity: f32,
    chart_width: f32,
    chart_height: f32,
    label_font_path: String,
    /// Options without a control pass through unchanged
    base: SunburstConfig,
    output: Arc<Mutex<Option<DialogResult>>>,
}

impl ConfigDialog {
    fn new(initial: DialogResult, output: Arc<Mutex<Option<DialogResult>>>) -> Self {
        let config = &initial.config;
        Self {
            path_text: initial
                .tree_path
                .as_ref()
                .map(|p| p.to_string_lossy().to_string())
                .unwrap_or_default(),
            threshold: config.visibility_threshold_radians as f32,
            zoom_ms: config.zoom_transition_ms as f32,
            reset_ms: config.reset_transition_ms as f32,
            low_cutoff: config.percentage_low_cutoff as f32,
            digits: config.percentage_significant_digits as f32,
            dimmed_opacity: config.dimmed_opacity,
            chart_width: config.chart_width,
            chart_height: config.chart_height,
            label_font_path: initial.label_font_path.clone(),
            base: initial.config,
            output,
        }
    }

    /// Current form contents as a validated result.
    fn result(&self) -> DialogResult {
        let path = self.path_text.trim();
        let config = SunburstConfig {
            visibility_threshold_radians: self.threshold as f64,
            zoom_transition_ms: self.zoom_ms.round().max(0.0) as u64,
            reset_transition_ms: self.reset_ms.round().max(0.0) as u64,
            percentage_low_cutoff: self.low_cutoff as f64,
            percentage_significant_digits: self.digits.round().max(1.0) as u32,
            dimmed_opacity: self.dimmed_opacity,
            chart_width: self.chart_width,
            chart_height: self.chart_height,
            ..self.base.clone()
        }
        .validated();

        DialogResult {
            tree_path: (!path.is_empty()).then(|| PathBuf::from(path)),
            config,
            label_font_path: self.label_font_path.trim().to_string(),
        }
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::PathChanged(value) => self.path_text = value,
            Message::BrowsePath => {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("Tree JSON", &["json"])
                    .pick_file()
                {
                    self.path_text = path.to_string_lossy().to_string();
                }
            }
            Message::ThresholdChanged(v) => self.threshold = v,
            Message::ZoomMsChanged(v) => self.zoom_ms = v,
            Message::ResetMsChanged(v) => self.reset_ms = v,
            Message::LowCutoffChanged(v) => self.low_cutoff = v,
            Message::DigitsChanged(v) => self.digits = v,
            Message::DimmedOpacityChanged(v) => self.dimmed_opacity = v,
            Message::ChartWidthChanged(v) => self.chart_width = v,
            Message::ChartHeightChanged(v) => self.chart_height = v,
            Message::LabelFontPathChanged(v) => self.label_font_path = v,
            Message::Apply => {
                if let Ok(mut guard) = self.output.lock() {
                    *guard = Some(self.result());
                }
                return close_window();
            }
            Message::Cancel => return close_window(),
        }
        Task::none()
    }
}

fn close_window() -> Task<Message> {
    window::get_latest().then(|id| match id {
        Some(id) => window::close::<Message>(id),
        None => Task::none(),
    })
}

fn setting_slider<'a>(
    label: &'a str,
    value: f32,
    range: std::ops::RangeInclusive<f32>,
    step: f32,
    on_change: impl Fn(f32) -> Message + 'a,
) -> Element<'a, Message> {
    let decimals = if step >= 1.0 { 0 } else { 3 };
    column![
        text(format!("{label}: {value:.decimals$}")).size(16),
        slider(range, value, on_change).step(step)
    ]
    .spacing(6)
    .into()
}

fn view(state: &ConfigDialog) -> Element<'_, Message> {
    let mut body = column![text("Sunburst Settings").size(26)].spacing(14);

    body = body.push(
        column![
            text("Tree file (empty = bundled sample)").size(18),
            row![
                text_input("data/tree.json", &state.path_text)
                    .on_input(Message::PathChanged)
                    .padding(8)
                    .width(Length::Fill),
                button("Browse").on_press(Message::BrowsePath)
            ]
            .spacing(8)
        ]
        .spacing(8),
    );

    let settings = column![
        text("Layout").size(18),
        setting_slider(
            "Visibility Threshold (rad)",
            state.threshold,
            0.0..=0.05,
            0.001,
            Message::ThresholdChanged
        ),
        setting_slider("Chart Width (px)", state.chart_width, 200.0..=1600.0, 10.0, Message::ChartWidthChanged),
        setting_slider("Chart Height (px)", state.chart_height, 200.0..=1200.0, 10.0, Message::ChartHeightChanged),
        text("Transitions").size(18),
        setting_slider("Zoom (ms)", state.zoom_ms, 0.0..=3000.0, 50.0, Message::ZoomMsChanged),
        setting_slider("Reset (ms)", state.reset_ms, 0.0..=3000.0, 50.0, Message::ResetMsChanged),
        setting_slider(
            "Dimmed Opacity",
            state.dimmed_opacity,
            0.0..=1.0,
            0.05,
            Message::DimmedOpacityChanged
        ),
        text("Percentages").size(18),
        setting_slider("Low Cutoff (%)", state.low_cutoff, 0.0..=5.0, 0.01, Message::LowCutoffChanged),
        setting_slider("Significant Digits", state.digits, 1.0..=6.0, 1.0, Message::DigitsChanged),
        text_input("Custom font path (optional, .ttf)", &state.label_font_path)
            .on_input(Message::LabelFontPathChanged)
            .padding(8)
    ]
    .spacing(10);

    body = body.push(container(settings).padding(12));

    body = body.push(
        row![
            button("Cancel").on_press(Message::Cancel),
            button("Apply Settings").on_press(Message::Apply)
        ]
        .spacing(10),
    );

    container(body)
        .padding(16)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}
