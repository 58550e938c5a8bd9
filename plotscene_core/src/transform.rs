// Copyright 2026 the Plotscene Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry helpers over [`kurbo`] types.

use core::fmt;

use kurbo::{Affine, Rect};

/// Displays an [`Affine`] as a sequence of simple operations.
///
/// The identity prints as `identity`; anything else prints the non-trivial
/// parts of `translate(e, f) scale(a, d) skew(c, b)`, using kurbo's
/// `[a, b, c, d, e, f]` coefficient order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AffineRepr(pub Affine);

impl fmt::Display for AffineRepr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, f_] = self.0.as_coeffs();
        let mut sep = "";
        if e != 0.0 || f_ != 0.0 {
            write!(f, "translate({e}, {f_})")?;
            sep = " ";
        }
        if a != 1.0 || d != 1.0 {
            write!(f, "{sep}scale({a}, {d})")?;
            sep = " ";
        }
        if c != 0.0 || b != 0.0 {
            write!(f, "{sep}skew({c}, {b})")?;
            sep = " ";
        }
        if sep.is_empty() {
            f.write_str("identity")?;
        }
        Ok(())
    }
}

/// Whether `rect` covers no area in either direction.
///
/// Such boxes do not take part in container unions; a horizontal or vertical
/// line still does.
#[inline]
#[must_use]
pub fn is_empty(rect: Rect) -> bool {
    rect.width() == 0.0 && rect.height() == 0.0
}

/// Unions the non-empty rectangles of `rects`, or `None` if there are none.
#[must_use]
pub fn union_all(rects: impl IntoIterator<Item = Rect>) -> Option<Rect> {
    rects
        .into_iter()
        .filter(|r| !is_empty(*r))
        .reduce(|acc, r| acc.union(r))
}
