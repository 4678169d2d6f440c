pub mod controllers;
pub mod dto;
pub mod error;
pub mod router;
pub mod staging;
pub mod state;
