// Copyright 2026 the Plotscene Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The attribute framework.
//!
//! An attribute is one named, typed property of a scene node. Its identity is
//! an [`AttributeSpec`], registered once per node kind in the
//! [`AttributeRegistry`]. Each node owns an [`AttributeBag`] holding one cell
//! per spec its kind carries:
//!
//! - [`VariableAttribute`]: stored, written by callers.
//! - [`DerivedAttribute`]: computed lazily from attributes of the same node;
//!   invalidated through the registry's static dependency graph.
//! - [`ResolvedAttribute`]: cascades down the parent chain (the current
//!   transform matrix is the canonical example) and memoizes by version
//!   numbers.
//!
//! Reads and writes go through [`Scene`](crate::scene::Scene), which owns the
//! registry and every bag and runs change propagation.

mod bag;
mod cell;
mod registry;
mod spec;

pub use bag::AttributeBag;
pub use cell::{DerivedAttribute, ResolvedAttribute, VariableAttribute};
pub use registry::{AttributeRegistry, RegistryError};
pub use spec::{
    AttributeKind, AttributeSpec, AttributeValue, Compute, KindId, Provider, SpecFlags, SpecId,
};
