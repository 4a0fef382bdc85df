#[cfg(test)]
pub mod memory;
pub mod mongodb;
pub mod store;
