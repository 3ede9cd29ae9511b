pub mod activity_tracker;
pub mod analytics_service;
pub mod developer_service;
pub mod identity_gate;
pub mod identity_service;
pub mod project_service;
pub mod system_service;

pub use activity_tracker::ActivityTracker;
