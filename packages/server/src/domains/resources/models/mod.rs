pub mod kind;
pub mod payload;
pub mod record;

pub use kind::*;
pub use payload::*;
pub use record::*;
