pub mod error;
pub mod types;
pub mod value;

pub use error::{BagError, Result};
pub use types::Key;
pub use value::Value;
