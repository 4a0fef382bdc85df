pub mod generator_handlers;
pub mod health_handlers;
pub mod profile_handlers;
pub mod qr_handlers;
pub mod redirect_handlers;
