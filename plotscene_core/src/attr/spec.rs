// Copyright 2026 the Plotscene Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Attribute and node-kind identity types.

use alloc::rc::Rc;
use core::fmt;
use core::marker::PhantomData;

use crate::scene::{NodeId, Scene};

/// Values that can be stored in an attribute.
///
/// Equality is used to suppress change notifications when a write or a
/// recomputation produces the value that is already stored.
pub trait AttributeValue: Clone + PartialEq + fmt::Debug + 'static {}

impl<T: Clone + PartialEq + fmt::Debug + 'static> AttributeValue for T {}

/// Computes a Derived attribute from other attributes of the same node.
pub type Provider<T> = Rc<dyn Fn(&mut Scene, NodeId) -> T>;

/// Computes a Resolved attribute from the parent's resolved value (if the
/// node has a parent carrying the same attribute) and the node's own
/// attributes.
pub type Compute<T> = Rc<dyn Fn(&mut Scene, NodeId, Option<&T>) -> T>;

/// Index of a registered attribute spec.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpecId(pub(crate) u32);

impl SpecId {
    /// Returns the raw registry index (for diagnostics only).
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for SpecId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SpecId({})", self.0)
    }
}

/// Index of a registered node kind.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KindId(pub(crate) u32);

impl KindId {
    /// Returns the raw registry index (for diagnostics only).
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for KindId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KindId({})", self.0)
    }
}

/// How an attribute obtains its value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    /// Stored; written by callers.
    Variable,
    /// Computed lazily from attributes of the same node.
    Derived,
    /// Computed by cascading the parent's resolved value with local
    /// attributes.
    Resolved,
}

impl AttributeKind {
    /// Returns a short lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Variable => "variable",
            Self::Derived => "derived",
            Self::Resolved => "resolved",
        }
    }
}

/// Metadata flags carried by an attribute spec.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SpecFlags {
    /// A change invalidates the node's geometry up the parent chain and marks
    /// the node dirty.
    pub affects_bbox: bool,
    /// A change only requires a repaint.
    pub repaint: bool,
    /// Containers push their value down to children that still hold a
    /// default value.
    pub inheritable: bool,
}

impl SpecFlags {
    /// No flags.
    pub const NONE: Self = Self {
        affects_bbox: false,
        repaint: false,
        inheritable: false,
    };

    /// Only [`affects_bbox`](Self::affects_bbox).
    pub const AFFECTS_BBOX: Self = Self {
        affects_bbox: true,
        repaint: false,
        inheritable: false,
    };

    /// Only [`repaint`](Self::repaint).
    pub const REPAINT: Self = Self {
        affects_bbox: false,
        repaint: true,
        inheritable: false,
    };

    /// [`repaint`](Self::repaint) and [`inheritable`](Self::inheritable).
    pub const INHERITED_PAINT: Self = Self {
        affects_bbox: false,
        repaint: true,
        inheritable: true,
    };
}

/// Typed handle to a registered attribute.
///
/// Handles are created by the [`AttributeRegistry`](super::AttributeRegistry)
/// once per node kind and never change afterwards. The built-in node
/// attributes are constants in [`node`](crate::node).
pub struct AttributeSpec<T> {
    id: SpecId,
    _value: PhantomData<fn() -> T>,
}

impl<T> AttributeSpec<T> {
    pub(crate) const fn from_raw(index: u32) -> Self {
        Self {
            id: SpecId(index),
            _value: PhantomData,
        }
    }

    /// Returns the untyped spec index.
    #[inline]
    #[must_use]
    pub const fn id(self) -> SpecId {
        self.id
    }
}

impl<T> Clone for AttributeSpec<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for AttributeSpec<T> {}

impl<T> PartialEq for AttributeSpec<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for AttributeSpec<T> {}

impl<T> fmt::Debug for AttributeSpec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AttributeSpec({})", self.id.0)
    }
}

impl<T> From<AttributeSpec<T>> for SpecId {
    fn from(spec: AttributeSpec<T>) -> Self {
        spec.id
    }
}
