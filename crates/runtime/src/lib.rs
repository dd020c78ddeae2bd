pub mod event_bus;
pub mod navigation;
pub mod ticket;

pub use event_bus::*;
pub use navigation::*;
pub use ticket::*;
