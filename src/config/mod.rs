pub mod loader;
pub mod schema;
pub mod settings;

pub use loader::{load_from_path, load_from_str, ConfigError};
pub use schema::{ConfigDocument, ValidationError, ValidationIssue};
pub use settings::{MutationConfig, DEFAULT_TAB_WIDTH, MAX_TAB_WIDTH};
