use serial_test::serial;
use skyline_viewer::delivery::{ChannelState, DeliveryChannel, DeliveryOutcome, InProcessFactory};
use skyline_viewer::settings::ViewerSettings;
use skyline_viewer::skyline::Segment;
use skyline_viewer::viewer::messages::OverlayInbox;
use skyline_viewer::viewer::runtime::{set_open_hook, OpenRequest};
use skyline_viewer::viewer::{SurfaceSize, ViewerState};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;

type Windows = Arc<Mutex<Vec<Option<OverlayInbox>>>>;

/// Every "window" is just its inbox; `None` marks a closed one.
fn install_fake_windows() -> Windows {
    let windows: Windows = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&windows);
    set_open_hook(Some(Box::new(move |request: OpenRequest| {
        sink.lock().expect("windows lock").push(Some(request.inbox));
        Ok(())
    })));
    windows
}

fn overlay(x: f64) -> Vec<Segment> {
    vec![Segment::new(x, 0.0, x + 1.0, 1.0).expect("segment")]
}

fn render_window(inbox: &OverlayInbox) -> ViewerState {
    let mut state = ViewerState::default();
    state.resize(SurfaceSize::new(200.0, 100.0));
    for task in inbox.drain().tasks {
        state.apply(task);
    }
    state
}

#[test]
#[serial]
fn first_delivery_opens_window_and_keeps_fifo_order() {
    let windows = install_fake_windows();
    let mut channel = DeliveryChannel::new(InProcessFactory::new(ViewerSettings::default()));
    assert_eq!(channel.state(), ChannelState::Disconnected);

    for x in [0.0, 1.0, 2.0] {
        assert_eq!(channel.deliver(&overlay(x)), DeliveryOutcome::Delivered);
    }
    let windows = windows.lock().expect("windows lock");
    assert_eq!(windows.len(), 1);

    let state = render_window(windows[0].as_ref().expect("open window"));
    let starts: Vec<f64> = state
        .overlays()
        .iter()
        .map(|o| o.segments[0].start().x)
        .collect();
    assert_eq!(starts, vec![0.0, 1.0, 2.0]);
    assert!(state.transform().is_some());
    set_open_hook(None);
}

#[test]
#[serial]
fn closed_window_is_reopened_on_next_delivery() {
    let windows = install_fake_windows();
    let mut channel = DeliveryChannel::new(InProcessFactory::new(ViewerSettings::default()));
    assert_eq!(channel.deliver(&overlay(0.0)), DeliveryOutcome::Delivered);

    // operator closes the window
    windows.lock().expect("windows lock")[0] = None;

    assert_eq!(channel.deliver(&overlay(5.0)), DeliveryOutcome::Recovered);
    let windows = windows.lock().expect("windows lock");
    assert_eq!(windows.len(), 2);
    let state = render_window(windows[1].as_ref().expect("reopened window"));
    assert_eq!(state.overlays().len(), 1);
    assert_eq!(state.overlays()[0].segments, overlay(5.0));
    set_open_hook(None);
}

#[test]
#[serial]
fn window_that_cannot_open_drops_overlay_without_error() {
    set_open_hook(Some(Box::new(|_request: OpenRequest| -> anyhow::Result<()> {
        anyhow::bail!("no display")
    })));
    let mut channel = DeliveryChannel::new(InProcessFactory::new(ViewerSettings::default()));
    assert_eq!(channel.deliver(&overlay(0.0)), DeliveryOutcome::Dropped);
    assert_eq!(channel.state(), ChannelState::Disconnected);
    set_open_hook(None);
}

#[test]
#[serial]
fn window_closed_again_before_retry_drops_overlay() {
    // the hook drops each inbox at once, as if every window closed immediately
    let opened = Arc::new(Mutex::new(0usize));
    let counter = Arc::clone(&opened);
    set_open_hook(Some(Box::new(move |_request: OpenRequest| {
        *counter.lock().expect("counter lock") += 1;
        Ok(())
    })));
    let mut channel = DeliveryChannel::new(InProcessFactory::new(ViewerSettings::default()));
    assert_eq!(channel.deliver(&overlay(0.0)), DeliveryOutcome::Dropped);
    assert_eq!(*opened.lock().expect("counter lock"), 2);
    set_open_hook(None);
}

#[test]
#[serial]
fn window_failing_after_open_drops_later_overlays() {
    // stands in for the renderer thread, which fails windows after queueing
    let (renderer, queued) = mpsc::channel::<OpenRequest>();
    let renderer = Mutex::new(renderer);
    set_open_hook(Some(Box::new(move |request: OpenRequest| {
        renderer
            .lock()
            .expect("renderer lock")
            .send(request)
            .map_err(|_| anyhow::anyhow!("renderer gone"))
    })));
    let mut channel = DeliveryChannel::new(InProcessFactory::new(ViewerSettings::default()));

    assert_eq!(channel.deliver(&overlay(0.0)), DeliveryOutcome::Delivered);
    let failing = thread::spawn(move || {
        let request = queued.recv().expect("queued window");
        request.fail("no display");
        queued
    });
    let queued = failing.join().expect("renderer stand-in");

    let outcomes: Vec<DeliveryOutcome> = (1..4)
        .map(|x| channel.deliver(&overlay(x as f64)))
        .collect();
    assert_eq!(outcomes, vec![DeliveryOutcome::Dropped; 3]);
    assert_eq!(channel.state(), ChannelState::Disconnected);
    assert!(queued.try_recv().is_err(), "window reopened");
    set_open_hook(None);
}
