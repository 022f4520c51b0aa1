pub mod env;
pub mod record;
pub mod free_key;
pub mod format;
pub mod output;
pub mod sink;
pub mod layer;
pub mod init;

pub use init::{init, init_with_config, InitError, LoggerConfig};
pub use layer::Logger;
pub use record::{ErrorValue, LogArg, LogRecord};
