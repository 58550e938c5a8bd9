// Copyright 2026 the Plotscene Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trace printing, event recording, and scene dumps for plotscene
//! diagnostics.
//!
//! This crate provides [`TraceSink`](plotscene_core::trace::TraceSink)
//! implementations and inspection helpers for development:
//!
//! - [`pretty::PrettyPrintSink`]: human-readable one-line-per-event output.
//! - [`recorder::RecorderSink`]: records events into a shared
//!   [`recorder::EventLog`] that stays readable while the scene owns the sink.
//! - [`export::export`]: writes recorded events as Chrome Trace Event Format
//!   JSON.
//! - [`dump`]: indented text and JSON snapshots of a scene subtree.

pub mod dump;
pub mod export;
pub mod pretty;
pub mod recorder;
