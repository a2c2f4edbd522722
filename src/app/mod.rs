use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Duration;

use eframe::egui::{self, Context, Rect, Vec2};
use thread_arcs::{RetainedSurface, SortStrategy, ThreadArcs, ThreadArcsOptions};

use crate::input::{self, Thread, ThreadNode};

mod graph;
mod render_utils;
mod ui;

type LoadResult = Result<(Thread, ThreadArcsOptions), String>;

/// Where the viewer reads its thread from; kept so it can reload.
#[derive(Clone, Debug)]
pub struct ThreadSource {
    pub input: PathBuf,
    pub config: Option<PathBuf>,
    pub overrides: ThreadArcsOptions,
}

impl ThreadSource {
    fn load(&self) -> LoadResult {
        input::load_with_overrides(&self.input, self.config.as_deref(), &self.overrides)
            .map_err(|error| format!("{error:#}"))
    }
}

pub struct ThreadArcsApp {
    source: ThreadSource,
    initial_sort: Option<SortStrategy>,
    state: AppState,
    reload_rx: Option<Receiver<LoadResult>>,
}

enum AppState {
    Loading { rx: Receiver<LoadResult> },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    diagram: ThreadArcs<RetainedSurface, ThreadNode>,
    options: ThreadArcsOptions,
    search: String,
    pan: Vec2,
    zoom: f32,
    fit_pending: bool,
    pointer_node: Option<usize>,
    pointer_on_tooltip: bool,
    tooltip_rect: Option<Rect>,
    focused: Option<usize>,
    last_error: Option<String>,
    /// Start time of each surface animation seen so far, by serial.
    animation_clock: HashMap<u64, Duration>,
}

impl ThreadArcsApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        source: ThreadSource,
        initial: (Thread, ThreadArcsOptions),
        initial_sort: Option<SortStrategy>,
    ) -> Self {
        let state = Self::ready_or_error(Ok(initial), initial_sort.as_ref());
        Self {
            source,
            initial_sort,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(source: ThreadSource) -> Receiver<LoadResult> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let _ = tx.send(source.load());
        });

        rx
    }

    fn start_load(source: ThreadSource) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(source),
        }
    }

    fn ready_or_error(result: LoadResult, sort: Option<&SortStrategy>) -> AppState {
        match result.and_then(|(thread, options)| ViewModel::new(thread, options, sort)) {
            Ok(model) => AppState::Ready(Box::new(model)),
            Err(error) => {
                tracing::error!(%error, "failed to load thread");
                AppState::Error(error)
            }
        }
    }
}

impl eframe::App for ThreadArcsApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                if let Ok(result) = rx.try_recv() {
                    transition = Some(Self::ready_or_error(result, self.initial_sort.as_ref()));
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading thread...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load thread");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(self.source.clone()));
                    }
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                let source_label = self.source.input.display().to_string();
                model.show(ctx, &source_label, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(self.source.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(result) => {
                            transition =
                                Some(Self::ready_or_error(result, self.initial_sort.as_ref()));
                        }
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                            ctx.request_repaint_after(Duration::from_millis(50));
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition =
                                Some(AppState::Error("Background load worker disconnected".to_owned()));
                        }
                    }
                }
            }
        }

        if let Some(next_state) = transition {
            self.reload_rx = None;
            self.state = next_state;
        }
    }
}
