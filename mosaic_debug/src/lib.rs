// Copyright 2026 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pretty-printing and recording of mosaic frame traces.
//!
//! This crate provides [`TraceSink`](mosaic_core::trace::TraceSink)
//! implementations for development and post-mortem analysis:
//!
//! - [`pretty::PrettyPrintSink`]: human-readable one-line-per-event output.
//! - [`recorder::RecorderSink`]: in-memory event log with JSON-lines export
//!   and import.

pub mod pretty;
pub mod recorder;
