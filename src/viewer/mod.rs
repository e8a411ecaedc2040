pub mod app;
pub mod messages;
pub mod model;
pub mod render;
pub mod runtime;
pub mod state;
pub mod store;
pub mod viewport;

pub use app::{run_window, SkylineViewerApp};
pub use messages::{task_channel, OverlayInbox, TaskSender, ViewerTask};
pub use model::{Overlay, OverlayColor, SurfaceSize};
pub use state::ViewerState;
pub use store::{BoundingBox, OverlayStore};
pub use viewport::{rescale, ViewTransform, Viewport};
