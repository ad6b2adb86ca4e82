#![cfg_attr(not(feature = "std"), no_std)]

//! Matrix multiply-accumulate microkernels for tiled GEMM where one operand
//! holds spikes (`bool`) and the other holds numbers.
//!
//! Two levels are provided:
//! - [thread](components::thread): the product of one lane's register fragments,
//! - [warp](components::warp): a warp tile split across lanes by a SIMT policy.
//!
//! Shapes, element types and layouts are type parameters, so every kernel is
//! resolved at build time. Each kernel can also describe itself as a runtime
//! descriptor that is validated and logged once per configuration, see
//! [ThreadMmaConfig](components::thread::ThreadMmaConfig) and
//! [WarpMmaConfig](components::warp::WarpMmaConfig).

extern crate alloc;

/// Kernels and the types they are built from.
pub mod components;

/// Global configuration and logging.
pub mod config;
