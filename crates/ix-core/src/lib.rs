pub mod class;
pub mod error;
pub mod shape;
pub mod types;
pub mod value;

pub use class::*;
pub use error::{HostError, HostErrorKind, IxError};
pub use shape::Shape;
pub use types::*;
pub use value::*;
