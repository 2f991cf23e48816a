//! Core traits: credential sources, sinks and the services behind them

mod backend;
mod sink;
mod source;

pub use backend::{IdentityService, ParameterStore};
pub use sink::{Sink, SinkKind};
pub use source::{Source, SourceKind};

#[cfg(test)]
pub use sink::MockSink;
#[cfg(test)]
pub use source::MockSource;
