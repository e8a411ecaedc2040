use anyhow::Result;
use skyline_viewer::delivery::wire::read_overlays;
use skyline_viewer::logging;
use skyline_viewer::settings::{self, settings_arg};
use skyline_viewer::viewer::{run_window, task_channel, ViewerTask};
use std::thread;

/// Viewer process: overlays arrive on stdin, one window shows them all.
fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let settings = settings::load(settings_arg(&args)?.as_deref())?;
    logging::init(settings.debug_logging, settings.log_file.as_deref());

    let (sender, inbox) = task_channel();
    thread::Builder::new()
        .name("overlay-reader".to_string())
        .spawn(move || {
            let stdin = std::io::stdin();
            let result = read_overlays(stdin.lock(), |segments| {
                tracing::debug!(segments = segments.len(), "overlay received");
                if sender.post(ViewerTask::AddOverlay { segments }).is_err() {
                    tracing::warn!("viewer window is gone; overlay discarded");
                }
            });
            match result {
                Ok(()) => tracing::info!("overlay stream closed"),
                Err(err) => tracing::error!(?err, "overlay stream failed"),
            }
        })?;

    run_window(&settings, inbox, false)
}
