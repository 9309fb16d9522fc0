pub mod config;
pub mod control;
pub mod controller;
pub mod error;
pub mod events;
pub mod memory;
pub mod renderer;
pub mod reorder;

pub use config::*;
pub use controller::*;
pub use error::*;
pub use events::*;
pub use renderer::*;
