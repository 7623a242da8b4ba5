pub mod controller;
pub mod state;

pub use controller::{TriggerResult, WindowController, WindowEvent, WindowSnapshot};
pub use state::{AcquisitionSession, WindowPhase, WindowState};
