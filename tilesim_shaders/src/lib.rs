// Copyright 2026 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! CPU versions of the tilesim compute kernels.
//!
//! The kernels are written against a small simulation of a GPU compute dispatch
//! (see [`cpu::dispatch`]): a grid of workgroups, each a block of invocations
//! sharing workgroup memory and synchronizing at barriers. This keeps the code
//! shaped like the shader it models, so it can be used to check the
//! cooperative algorithm on ordinary hardware.

// LINEBENDER LINT SET - lib.rs - v2
// See https://linebender.org/wiki/canonical-lints/
// These lints aren't included in Cargo.toml because they
// shouldn't apply to examples and tests
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![forbid(unsafe_code)]

pub mod cpu;

#[cfg(feature = "image")]
pub use image;
