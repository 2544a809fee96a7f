#[macro_use]
extern crate anyhow;

pub mod engine;
pub mod error;
