//! `mctools` is a semi-modular toolkit of fast and reliable parsers for Monte
//! Carlo transport outputs
//!
#![doc = include_str!("../readme.md")]
#![deny(missing_docs, missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

// Re-exports of toolkit crates.
#[doc(inline)]
pub use mctools_utils as utils;

#[doc(inline)]
pub use mctools_scan as scan;

#[cfg(feature = "mesh")]
#[cfg_attr(docsrs, doc(cfg(feature = "mesh")))]
#[doc(inline)]
pub use mctools_mesh as mesh;

#[cfg(feature = "output")]
#[cfg_attr(docsrs, doc(cfg(feature = "output")))]
#[doc(inline)]
pub use mctools_output as output;
