pub mod content_controller;
pub mod file_controller;
pub mod health_controller;
