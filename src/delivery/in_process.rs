use crate::delivery::{Endpoint, EndpointFactory};
use crate::settings::ViewerSettings;
use crate::skyline::Segment;
use crate::viewer::messages::{task_channel, TaskSender, ViewerTask};
use crate::viewer::runtime::{open_window, OpenRequest};
use anyhow::Result;

/// The inbox of one open viewer window. Sending fails once it was closed.
pub struct ViewerEndpoint {
    sender: TaskSender,
}

impl Endpoint for ViewerEndpoint {
    fn send(&mut self, overlay: &[Segment]) -> Result<()> {
        self.sender.post(ViewerTask::AddOverlay {
            segments: overlay.to_vec(),
        })
    }
}

/// Opens a fresh window on the renderer thread for every endpoint.
#[derive(Debug, Clone)]
pub struct InProcessFactory {
    settings: ViewerSettings,
}

impl InProcessFactory {
    pub fn new(settings: ViewerSettings) -> Self {
        Self { settings }
    }
}

impl EndpointFactory for InProcessFactory {
    type Endpoint = ViewerEndpoint;

    fn create(&mut self) -> Result<ViewerEndpoint> {
        let (sender, inbox) = task_channel();
        open_window(OpenRequest {
            inbox,
            settings: self.settings.clone(),
        })?;
        Ok(ViewerEndpoint { sender })
    }
}
