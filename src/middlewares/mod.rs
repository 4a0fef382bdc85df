pub mod auth_context;
pub mod authmw;
