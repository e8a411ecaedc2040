use crate::settings::ViewerSettings;
use crate::viewer::app::run_window;
use crate::viewer::messages::OverlayInbox;
use anyhow::{anyhow, Result};
use once_cell::sync::Lazy;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{channel, Sender};
use std::sync::Mutex;
use std::thread;

/// Asks the renderer thread to open a window bound to `inbox`.
pub struct OpenRequest {
    pub inbox: OverlayInbox,
    pub settings: ViewerSettings,
}

impl OpenRequest {
    /// Gives up on this window after `open_window` already accepted it.
    /// Every later `open_window` call fails with `reason`.
    pub fn fail(self, reason: impl Into<String>) {
        record_failure(reason.into());
    }
}

pub type OpenHook = Box<dyn Fn(OpenRequest) -> Result<()> + Send + Sync>;

static RENDERER: Lazy<Mutex<Option<Sender<OpenRequest>>>> = Lazy::new(|| Mutex::new(None));
static OPEN_HOOK: Lazy<Mutex<Option<OpenHook>>> = Lazy::new(|| Mutex::new(None));
// Set once a window could not be shown; windows are not retried after that.
static RENDERER_FAILURE: Lazy<Mutex<Option<String>>> = Lazy::new(|| Mutex::new(None));

/// Replaces window creation, e.g. to run without a display. Clears any
/// recorded window failure.
pub fn set_open_hook(hook: Option<OpenHook>) {
    if let Ok(mut guard) = OPEN_HOOK.lock() {
        *guard = hook;
    }
    if let Ok(mut failure) = RENDERER_FAILURE.lock() {
        *failure = None;
    }
}

fn record_failure(reason: String) {
    tracing::error!(%reason, "viewer windows disabled");
    if let Ok(mut failure) = RENDERER_FAILURE.lock() {
        failure.get_or_insert(reason);
    }
}

fn recorded_failure() -> Option<String> {
    let failure = RENDERER_FAILURE.lock().ok()?;
    failure.clone()
}

/// Queues a window for `request`, starting the renderer thread on first use.
///
/// Fails once an earlier window could not be shown.
pub fn open_window(request: OpenRequest) -> Result<()> {
    if let Some(reason) = recorded_failure() {
        return Err(anyhow!("viewer window unavailable: {reason}"));
    }
    if let Ok(guard) = OPEN_HOOK.lock() {
        if let Some(ref hook) = *guard {
            return hook(request);
        }
    }

    let mut renderer = RENDERER
        .lock()
        .map_err(|_| anyhow!("renderer slot lock poisoned"))?;
    if renderer.is_none() {
        *renderer = Some(spawn_renderer_thread()?);
    }
    let Some(tx) = renderer.as_ref() else {
        return Err(anyhow!("renderer thread unavailable"));
    };
    if tx.send(request).is_err() {
        *renderer = None;
        return Err(anyhow!("renderer thread has exited"));
    }
    Ok(())
}

// The windowing event loop can only be created once per thread, so every
// window is opened from this one thread.
fn spawn_renderer_thread() -> Result<Sender<OpenRequest>> {
    let (tx, rx) = channel::<OpenRequest>();
    thread::Builder::new()
        .name("skyline-renderer".to_string())
        .spawn(move || {
            for OpenRequest { inbox, settings } in rx {
                let shown = AssertUnwindSafe(|| run_window(&settings, inbox, true));
                match panic::catch_unwind(shown) {
                    Ok(Ok(())) => tracing::info!("viewer window closed"),
                    Ok(Err(err)) => record_failure(format!("{err:#}")),
                    Err(payload) => {
                        let panic_message = if let Some(message) = payload.downcast_ref::<&str>() {
                            (*message).to_string()
                        } else if let Some(message) = payload.downcast_ref::<String>() {
                            message.clone()
                        } else {
                            "unknown panic payload".to_string()
                        };
                        tracing::error!(panic_message, "viewer window panicked");
                        record_failure(panic_message);
                    }
                }
            }
        })
        .map_err(|err| anyhow!("failed to spawn renderer thread: {err}"))?;
    Ok(tx)
}
