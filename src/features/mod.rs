pub mod home;
pub mod issues;
