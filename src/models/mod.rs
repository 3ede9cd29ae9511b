pub mod analytics;
pub mod developer;
pub mod project;
pub mod user;

pub use analytics::*;
pub use developer::*;
pub use project::*;
pub use user::*;
