pub mod oanda;
pub mod traits;
pub mod types;

#[cfg(test)]
mod types_tests;
