pub mod angle;
pub mod codec;
pub mod error;
pub mod location;
pub mod shape;
pub mod snap;

pub use error::{GeoCoreError, Result};
