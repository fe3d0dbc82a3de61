pub mod autopilot;
pub mod human;
pub mod terminal;

pub use autopilot::Autopilot;
pub use human::HumanMode;
