pub mod cli;
pub mod command;
pub mod error;
pub mod forge;
pub mod release;
mod result;

pub use result::Result;
