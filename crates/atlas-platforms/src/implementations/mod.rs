//! Concrete chain adapters.

pub mod binance;
pub mod stellar;
