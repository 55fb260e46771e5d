//! Built-in backend plugins.

#[cfg(feature = "katex")]
#[cfg_attr(docsrs, doc(cfg(feature = "katex")))]
pub mod katex;

#[cfg(feature = "typst")]
#[cfg_attr(docsrs, doc(cfg(feature = "typst")))]
pub mod typst;
