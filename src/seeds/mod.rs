pub mod default_developers;
