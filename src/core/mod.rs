pub mod clock;
pub mod efficiency;
pub mod garage_manager;
pub mod maintenance;
pub mod services;
pub mod session;

pub use garage_manager::GarageManager;
