pub mod config;
pub mod role;
pub mod set_role;
pub mod validate;
