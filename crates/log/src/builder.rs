//! Logger builder implementation

use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::{Layer, Layered, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry, fmt};

use crate::config::{Config, Format, WriterConfig};
use crate::{LogError, LogResult};

type Base = Layered<EnvFilter, Registry>;
type BoxedLayer = Box<dyn Layer<Base> + Send + Sync>;

/// Applies the shared display options to a fmt layer and boxes it.
/// `without_time` changes the layer type, so both arms are boxed here.
macro_rules! boxed_fmt_layer {
    ($layer:expr, $display:expr, $writer:expr) => {{
        let layer = $layer
            .with_writer($writer)
            .with_ansi($display.colors)
            .with_target($display.target)
            .with_file($display.source)
            .with_line_number($display.source);
        if $display.time {
            layer.boxed()
        } else {
            layer.without_time().boxed()
        }
    }};
}

/// Logger builder
#[derive(Debug)]
pub struct LoggerBuilder {
    config: Config,
}

impl LoggerBuilder {
    /// Create builder from config
    #[must_use]
    pub fn from_config(config: Config) -> Self {
        Self { config }
    }

    fn filter(&self) -> LogResult<EnvFilter> {
        EnvFilter::try_new(&self.config.level)
            .map_err(|e| LogError::Filter(format!("{}: {e}", self.config.level)))
    }

    fn writer(&self) -> BoxMakeWriter {
        match self.config.writer {
            WriterConfig::Stderr => BoxMakeWriter::new(std::io::stderr),
            WriterConfig::Stdout => BoxMakeWriter::new(std::io::stdout),
        }
    }

    fn fmt_layer(&self) -> BoxedLayer {
        let display = &self.config.display;
        let writer = self.writer();

        match self.config.format {
            Format::Pretty => boxed_fmt_layer!(fmt::layer().pretty(), display, writer),
            Format::Compact => boxed_fmt_layer!(fmt::layer().compact(), display, writer),
            Format::Json => boxed_fmt_layer!(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(display.span_list)
                    .flatten_event(display.flatten),
                display,
                writer
            ),
        }
    }

    /// Build and install the global subscriber
    ///
    /// Fails if the filter does not parse or a global subscriber is
    /// already installed.
    pub fn build(self) -> LogResult<()> {
        let filter = self.filter()?;
        let fmt_layer = self.fmt_layer();

        Registry::default()
            .with(filter)
            .with(fmt_layer)
            .try_init()
            .map_err(|e| LogError::Init(e.to_string()))
    }
}
