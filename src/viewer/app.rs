use crate::settings::ViewerSettings;
use crate::viewer::messages::OverlayInbox;
use crate::viewer::model::SurfaceSize;
use crate::viewer::render;
use crate::viewer::state::ViewerState;
use anyhow::{anyhow, Result};
use eframe::egui;
use std::time::Duration;

pub const WINDOW_TITLE: &str = "Skyline viewer";

pub struct SkylineViewerApp {
    state: ViewerState,
    inbox: OverlayInbox,
    stroke_width: f32,
    repaint_interval: Duration,
    producer_gone: bool,
}

impl SkylineViewerApp {
    pub fn new(ctx: &egui::Context, inbox: OverlayInbox, settings: &ViewerSettings) -> Self {
        inbox.attach_context(ctx);
        Self {
            state: ViewerState::new(settings.palette.clone()),
            inbox,
            stroke_width: settings.stroke_width,
            repaint_interval: Duration::from_millis(settings.repaint_interval_ms),
            producer_gone: false,
        }
    }

    fn pump_inbox(&mut self) {
        let drained = self.inbox.drain();
        for task in drained.tasks {
            self.state.apply(task);
        }
        if drained.closed && !self.producer_gone {
            tracing::info!("producer disconnected; keeping current overlays on screen");
            self.producer_gone = true;
        }
    }
}

impl eframe::App for SkylineViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.pump_inbox();

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(egui::Color32::WHITE))
            .show(ctx, |ui| {
                let size = ui.available_size();
                let (response, painter) = ui.allocate_painter(size, egui::Sense::hover());
                let rect = response.rect;
                let surface = SurfaceSize::new(rect.width() as f64, rect.height() as f64);
                self.state.resize(surface);
                render::paint(
                    &painter,
                    rect.min,
                    &self.state.draw_lines(self.stroke_width),
                );

                painter.text(
                    rect.left_top() + egui::vec2(6.0, 6.0),
                    egui::Align2::LEFT_TOP,
                    format!("{} overlays", self.state.overlays().len()),
                    egui::FontId::proportional(12.0),
                    egui::Color32::DARK_GRAY,
                );
            });

        if !self.producer_gone {
            ctx.request_repaint_after(self.repaint_interval);
        }
    }
}

/// Runs one viewer window until it is closed. With `any_thread` the event
/// loop may live off the main thread.
pub fn run_window(settings: &ViewerSettings, inbox: OverlayInbox, any_thread: bool) -> Result<()> {
    let (width, height) = settings.window_size;
    let mut native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([width, height])
            .with_min_inner_size([160.0, 120.0]),
        ..Default::default()
    };
    if any_thread {
        allow_any_thread(&mut native_options);
    }

    let settings = settings.clone();
    tracing::info!("opening viewer window");
    eframe::run_native(
        WINDOW_TITLE,
        native_options,
        Box::new(move |cc| Box::new(SkylineViewerApp::new(&cc.egui_ctx, inbox, &settings))),
    )
    .map_err(|err| anyhow!("viewer window failed: {err}"))
}

// Only X11 and Windows can run the event loop off the main thread.
#[cfg(any(target_os = "linux", target_os = "windows"))]
fn allow_any_thread(options: &mut eframe::NativeOptions) {
    options.event_loop_builder = Some(Box::new(|builder| {
        #[cfg(target_os = "windows")]
        use winit::platform::windows::EventLoopBuilderExtWindows;
        #[cfg(target_os = "linux")]
        use winit::platform::x11::EventLoopBuilderExtX11;
        builder.with_any_thread(true);
    }));
}

#[cfg(not(any(target_os = "linux", target_os = "windows")))]
fn allow_any_thread(_options: &mut eframe::NativeOptions) {
    tracing::warn!("viewer windows can only open on the main thread on this platform");
}
