//! Adapter traits for math backends.
//!
//! The renderer reaches its backends only through these traits. Built-in
//! implementations live in [`plugins`](crate::plugins); pass your own in
//! [`Plugins`](crate::Plugins) to replace them.

use crate::error::RenderError;
use crate::options::LatexOptions;

/// A boxed future, as returned by [`TypstAdapter::ensure_ready`].
pub use futures_util::future::BoxFuture;

/// Implement this adapter to typeset LaTeX math.
pub trait LatexAdapter: Sync {
    /// Render `source` to an HTML fragment.
    ///
    /// `display_mode`: block rather than inline layout.
    /// `options`: configuration to forward to the engine as given.
    ///
    /// Implementations are expected to report malformed input inside the
    /// returned markup rather than as `Err`; an `Err` puts an error element
    /// in place of the math.
    fn render(
        &self,
        source: &str,
        display_mode: bool,
        options: &LatexOptions,
    ) -> Result<String, RenderError>;
}

/// Implement this adapter to typeset Typst math.
pub trait TypstAdapter: Sync {
    /// Prepare the backend. Awaited once per [`render_math`](crate::render_math)
    /// call, before the first [`render`](Self::render); may be called again
    /// by later calls.
    fn ensure_ready(&self) -> BoxFuture<'_, Result<(), RenderError>>;

    /// Render `source` to an HTML fragment. Malformed input is an `Err`.
    fn render(&self, source: &str, display_mode: bool) -> Result<String, RenderError>;
}
