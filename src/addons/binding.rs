//! Applies logging configuration to a connection and owns the sink it opens.
//!
//! Loggers only keep weak sink references, so something on the caller side
//! has to hold the file open. On reload the new file is opened first, then
//! swapped in, then the old one is dropped.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use crate::addons::AddonHost;
use crate::config::LoggingConfig;
use crate::diagnostics::{SharedSink, StreamSink};

/// What to log into when the config names no file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Fallback {
    /// Detach.
    #[default]
    None,
    Stderr,
}

/// Caller-side owner of the sink currently attached to a host.
#[derive(Default)]
pub struct SinkBinding {
    fallback: Fallback,
    path: Option<PathBuf>,
    sink: Option<SharedSink>,
    /// Logger sink generation this binding attached, to spot swaps made
    /// behind its back.
    generation: Option<u64>,
}

impl SinkBinding {
    pub fn new(fallback: Fallback) -> Self {
        Self {
            fallback,
            path: None,
            sink: None,
            generation: None,
        }
    }

    /// File currently logged into, if any.
    pub fn path(&self) -> Option<&PathBuf> {
        self.path.as_ref()
    }

    pub fn is_attached(&self) -> bool {
        self.sink.is_some()
    }

    /// Apply `config` to `host`. On error the previous sink stays attached.
    ///
    /// A released host is left detached and the binding drops its sink.
    pub fn apply<H: AddonHost + ?Sized>(&mut self, host: &H, config: &LoggingConfig) -> io::Result<()> {
        let logger = host.logger();
        if logger.is_released() {
            self.clear();
            return Ok(());
        }

        logger.set_enable_logging(config.resolved_enabled());
        logger.set_format(config.format);

        let wanted = config
            .sink_path
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);

        let unchanged = wanted == self.path
            && logger.sink_generation() == self.generation
            && (self.sink.is_some() || (wanted.is_none() && self.fallback == Fallback::None));
        if unchanged {
            return Ok(());
        }

        let next: Option<SharedSink> = match &wanted {
            Some(path) => Some(Arc::new(StreamSink::append_to_file(path)?) as SharedSink),
            None => match self.fallback {
                Fallback::Stderr => Some(Arc::new(StreamSink::stderr()) as SharedSink),
                Fallback::None => None,
            },
        };

        host.log_into_stream(next.as_ref());
        if logger.is_released() {
            self.clear();
            return Ok(());
        }
        tracing::info!(
            connection_id = %logger.owner().connection,
            sink = ?wanted,
            "Diagnostic sink applied"
        );

        self.path = wanted;
        self.sink = next;
        self.generation = logger.sink_generation();
        Ok(())
    }

    /// Detach from `host` and drop the owned sink.
    pub fn detach<H: AddonHost + ?Sized>(&mut self, host: &H) {
        host.log_into_stream(None);
        self.clear();
    }

    fn clear(&mut self) {
        self.path = None;
        self.sink = None;
        self.generation = None;
    }
}

impl std::fmt::Debug for SinkBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SinkBinding")
            .field("fallback", &self.fallback)
            .field("path", &self.path)
            .field("attached", &self.sink.is_some())
            .finish()
    }
}
