pub mod config;
pub mod console;
pub mod gesture;
pub mod latents;
pub mod metrics;
pub mod midi;
pub mod params;
pub mod scheduler;
pub mod sensors;
pub mod shortcuts;
pub mod tracked;

pub use config::*;
pub use console::*;
pub use gesture::*;
pub use latents::*;
pub use metrics::*;
pub use midi::*;
pub use params::*;
pub use scheduler::*;
pub use sensors::*;
pub use shortcuts::*;
pub use tracked::*;

pub use glam;
