#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

//! Execution client connections used by the Taiko bindings tooling.

/// Execution layer client connection
pub mod execution;
