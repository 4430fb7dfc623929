//! Domain events and the decide-then-evolve execution helper.

pub mod event;
pub mod handler;

pub use event::Event;
pub use handler::execute;
