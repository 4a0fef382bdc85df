pub mod redirect;
pub mod user_agent;
