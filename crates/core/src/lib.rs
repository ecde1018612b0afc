pub mod error;
pub mod family;
pub mod graph;
mod io;
pub mod viz;

pub use error::{PedigreeError, Result};
