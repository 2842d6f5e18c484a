pub mod cart_total_updater;
pub mod catalog_service;

pub use cart_total_updater::*;
pub use catalog_service::*;
