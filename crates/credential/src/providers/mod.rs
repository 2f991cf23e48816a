//! Source and sink implementations

pub mod config;
mod iam;
mod memory;
mod parameter;
mod random;

pub use config::{ConfigError, ProviderConfig};
pub use iam::{ACCESS_KEY_ID, DEFAULT_MAX_AGE, IamKeySource, IamKeySourceConfig, SECRET_ACCESS_KEY};
pub use memory::MemorySink;
pub use parameter::ParameterSink;
pub use random::{
    DEFAULT_SECRET_KEY, DEFAULT_SECRET_LENGTH, MIN_SECRET_LENGTH, RandomSource, RandomSourceConfig,
};
