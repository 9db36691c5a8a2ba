pub mod home_handler;

pub use home_handler::*;
