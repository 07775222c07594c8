//! Host output sink
//!
//! The engine never prints. Warnings, verbose messages, errors and the
//! architecture prompt are routed through the [`Host`] of the session that
//! owns the operation, so the embedding shell decides how they surface.

use std::fmt::Display;
use std::path::PathBuf;
use std::sync::Arc;

/// Output and interaction surface of a hosting context.
pub trait Host: Send + Sync {
    /// Report a recoverable problem.
    fn warning(&self, msg: &str);

    /// Report detail only shown on request.
    fn verbose(&self, msg: &str);

    /// Report a failure.
    fn error(&self, msg: &str);

    /// Blocking single-choice prompt. Returns the index of the chosen option;
    /// `default` is the suggested one.
    fn choose(&self, caption: &str, message: &str, options: &[String], default: usize) -> usize;

    /// Ambient directory of the hosting context.
    fn current_location(&self) -> PathBuf {
        std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
    }
}

impl<T: Host + ?Sized> Host for Arc<T> {
    fn warning(&self, msg: &str) {
        (**self).warning(msg);
    }
    fn verbose(&self, msg: &str) {
        (**self).verbose(msg);
    }
    fn error(&self, msg: &str) {
        (**self).error(msg);
    }
    fn choose(&self, caption: &str, message: &str, options: &[String], default: usize) -> usize {
        (**self).choose(caption, message, options, default)
    }
    fn current_location(&self) -> PathBuf {
        (**self).current_location()
    }
}

/// A no-op host for silent operation. Prompts resolve to the default.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullHost;

impl Host for NullHost {
    fn warning(&self, _: &str) {}
    fn verbose(&self, _: &str) {}
    fn error(&self, _: &str) {}
    fn choose(&self, _: &str, _: &str, _: &[String], default: usize) -> usize {
        default
    }
}

/// Prompt for one of `options`. Answers out of range fall back to `default`.
pub fn prompt_for<T: Copy + PartialEq + Display>(
    host: &dyn Host,
    caption: &str,
    message: &str,
    options: &[T],
    default: T,
) -> T {
    let labels: Vec<String> = options.iter().map(ToString::to_string).collect();
    let default_index = options.iter().position(|o| *o == default).unwrap_or(0);
    let chosen = host.choose(caption, message, &labels, default_index);
    options.get(chosen).copied().unwrap_or(default)
}
