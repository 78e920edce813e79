pub mod base;
pub mod host;
pub mod logging;

pub use base::*;
pub use host::*;
pub use logging::*;
