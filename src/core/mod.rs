pub mod cal2grid;
pub mod event;
pub mod grid;
pub mod plan;
pub mod schedule;
pub mod settings;
pub mod window;
