pub mod admin;
pub mod auth;
pub mod developers;
pub mod health;
pub mod metrics;
pub mod projects;
pub mod swagger;
pub mod system;
