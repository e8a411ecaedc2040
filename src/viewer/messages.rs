use crate::skyline::Segment;
use anyhow::{anyhow, Result};
use eframe::egui;
use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};
use std::sync::{Arc, Mutex};

/// Work posted to the renderer's loop. Applied in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewerTask {
    AddOverlay { segments: Vec<Segment> },
}

/// Lets a producer wake the window once it has a context to wake.
#[derive(Clone, Default)]
pub struct RepaintHandle {
    ctx: Arc<Mutex<Option<egui::Context>>>,
}

impl RepaintHandle {
    pub fn attach(&self, ctx: &egui::Context) {
        if let Ok(mut guard) = self.ctx.lock() {
            *guard = Some(ctx.clone());
        }
    }

    pub fn request(&self) {
        if let Ok(guard) = self.ctx.lock() {
            if let Some(ctx) = guard.as_ref() {
                ctx.request_repaint();
            }
        }
    }
}

/// Producer half. Posting never waits on the renderer.
#[derive(Clone)]
pub struct TaskSender {
    tx: Sender<ViewerTask>,
    repaint: RepaintHandle,
}

impl TaskSender {
    pub fn post(&self, task: ViewerTask) -> Result<()> {
        self.tx
            .send(task)
            .map_err(|_| anyhow!("viewer inbox closed"))?;
        self.repaint.request();
        Ok(())
    }
}

/// Renderer half, owned by exactly one window session.
pub struct OverlayInbox {
    rx: Receiver<ViewerTask>,
    repaint: RepaintHandle,
}

impl OverlayInbox {
    pub fn attach_context(&self, ctx: &egui::Context) {
        self.repaint.attach(ctx);
    }

    /// Everything queued so far; `closed` is set once every sender is gone.
    pub fn drain(&self) -> Drained {
        let mut drained = Drained::default();
        loop {
            match self.rx.try_recv() {
                Ok(task) => drained.tasks.push(task),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    drained.closed = true;
                    break;
                }
            }
        }
        drained
    }
}

#[derive(Debug, Default)]
pub struct Drained {
    pub tasks: Vec<ViewerTask>,
    pub closed: bool,
}

pub fn task_channel() -> (TaskSender, OverlayInbox) {
    let (tx, rx) = channel();
    let repaint = RepaintHandle::default();
    (
        TaskSender {
            tx,
            repaint: repaint.clone(),
        },
        OverlayInbox { rx, repaint },
    )
}
