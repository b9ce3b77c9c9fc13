pub mod error;
pub mod format;
pub mod interactive;
pub mod logging;
pub mod output;

pub use error::*;
pub use interactive::*;
pub use logging::init_tracing;
pub use output::*;
