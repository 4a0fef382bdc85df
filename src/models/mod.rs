pub mod customization;
pub mod qr_code;
pub mod scan;
