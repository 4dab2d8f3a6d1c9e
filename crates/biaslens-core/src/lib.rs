pub mod analysis;
pub mod compare;
pub mod error;
pub mod evidence;
pub mod filter;
pub mod intake;
pub mod model;
pub mod report;
pub mod store;

pub use error::{Error, Result};
