//! Size and value-range constraints, and index-fragment extraction.

use alloc::vec::Vec;

/// One element of a constraint: a single value or an inclusive range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Element {
    /// Inclusive lower bound.
    pub lo: i64,
    /// Inclusive upper bound.
    pub hi: i64,
}

impl Element {
    /// A single-value element.
    #[must_use]
    pub fn single(value: i64) -> Self {
        Self {
            lo: value,
            hi: value,
        }
    }

    /// An inclusive range element. Reversed bounds are swapped.
    #[must_use]
    pub fn range(lo: i64, hi: i64) -> Self {
        if lo <= hi {
            Self { lo, hi }
        } else {
            Self { lo: hi, hi: lo }
        }
    }

    /// Check whether the element contains a value.
    #[must_use]
    pub fn contains(&self, value: i64) -> bool {
        self.lo <= value && value <= self.hi
    }
}

/// The split produced by [`Constraint::extract`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Extracted {
    /// The leading content claimed by the constraint.
    pub content: Vec<u32>,
    /// The unconsumed remainder, `None` when nothing is left.
    pub next: Option<Vec<u32>>,
}

/// A `SIZE(…)` or value-range refinement attached to a type.
///
/// After parsing, [`Constraint::finish`] normalises the element set:
/// elements are sorted, overlapping and adjacent ranges merged, and
/// singletons absorbed into the ranges that contain them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Constraint {
    is_size: bool,
    elements: Vec<Element>,
}

impl Constraint {
    /// Create an empty constraint.
    #[must_use]
    pub fn new(is_size: bool) -> Self {
        Self {
            is_size,
            elements: Vec::new(),
        }
    }

    /// A fixed-size constraint `SIZE(n)`.
    #[must_use]
    pub fn fixed_size(n: u32) -> Self {
        let mut c = Self::new(true);
        c.push(Element::single(i64::from(n)));
        c
    }

    /// A ranged size constraint `SIZE(lo..hi)`.
    #[must_use]
    pub fn size_range(lo: u32, hi: u32) -> Self {
        let mut c = Self::new(true);
        c.push(Element::range(i64::from(lo), i64::from(hi)));
        c
    }

    /// A value range constraint `(lo..hi)`.
    #[must_use]
    pub fn value_range(lo: i64, hi: i64) -> Self {
        let mut c = Self::new(false);
        c.push(Element::range(lo, hi));
        c
    }

    /// Whether this is a `SIZE(…)` constraint.
    #[must_use]
    pub fn is_size(&self) -> bool {
        self.is_size
    }

    /// The normalised elements.
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Append an element.
    pub fn push(&mut self, element: Element) {
        self.elements.push(element);
    }

    /// Normalise the element set: sort, merge overlaps, absorb singletons.
    pub fn finish(&mut self) {
        if self.elements.len() < 2 {
            return;
        }
        self.elements.sort_by_key(|e| (e.lo, e.hi));
        let mut merged: Vec<Element> = Vec::with_capacity(self.elements.len());
        for e in self.elements.drain(..) {
            match merged.last_mut() {
                Some(last) if e.lo <= last.hi.saturating_add(1) => {
                    if e.hi > last.hi {
                        last.hi = e.hi;
                    }
                }
                _ => merged.push(e),
            }
        }
        self.elements = merged;
    }

    /// Check whether any element contains the value.
    #[must_use]
    pub fn contains(&self, value: i64) -> bool {
        self.elements.iter().any(|e| e.contains(value))
    }

    /// Split a leading index fragment off an OID array.
    ///
    /// For a value constraint the first element must be in range and is the
    /// content. For a size constraint, `SIZE(n)` claims exactly `n` arcs;
    /// a ranged size reads a leading length arc and claims that many arcs
    /// after it. Returns `None` when the array is too short or out of range.
    #[must_use]
    pub fn extract(&self, oid: &[u32]) -> Option<Extracted> {
        if !self.is_size {
            let (&first, rest) = oid.split_first()?;
            if !self.contains(i64::from(first)) {
                return None;
            }
            return Some(Extracted {
                content: alloc::vec![first],
                next: if rest.is_empty() {
                    None
                } else {
                    Some(rest.to_vec())
                },
            });
        }

        // Implied size of zero claims nothing.
        let Some(first) = self.elements.first() else {
            return Some(Extracted {
                content: Vec::new(),
                next: if oid.is_empty() {
                    None
                } else {
                    Some(oid.to_vec())
                },
            });
        };

        let fixed = self.elements.len() == 1 && first.lo == first.hi;
        let (content_start, len) = if fixed {
            (0, usize::try_from(first.lo).ok()?)
        } else {
            let (&length_arc, _) = oid.split_first()?;
            (1, length_arc as usize)
        };

        if oid.len() < content_start + len {
            return None;
        }
        let content = oid[content_start..content_start + len].to_vec();
        let rest = &oid[content_start + len..];
        Some(Extracted {
            content,
            next: if rest.is_empty() {
                None
            } else {
                Some(rest.to_vec())
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn rejoined(e: &Extracted) -> Vec<u32> {
        let mut all = e.content.clone();
        if let Some(next) = &e.next {
            all.extend_from_slice(next);
        }
        all
    }

    #[test]
    fn test_value_range_extract() {
        let c = Constraint::value_range(0, 255);
        let e = c.extract(&[42, 9]).unwrap();
        assert_eq!(e.content, vec![42]);
        assert_eq!(e.next, Some(vec![9]));
        assert_eq!(rejoined(&e), vec![42, 9]);
    }

    #[test]
    fn test_value_range_exhausts() {
        let c = Constraint::value_range(0, 255);
        let e = c.extract(&[7]).unwrap();
        assert_eq!(e.content, vec![7]);
        assert_eq!(e.next, None);
    }

    #[test]
    fn test_value_out_of_range() {
        let c = Constraint::value_range(0, 10);
        assert_eq!(c.extract(&[42]), None);
    }

    #[test]
    fn test_value_empty_oid() {
        let c = Constraint::value_range(0, 10);
        assert_eq!(c.extract(&[]), None);
    }

    #[test]
    fn test_fixed_size_extract() {
        let c = Constraint::fixed_size(4);
        let e = c.extract(&[10, 0, 0, 1, 99]).unwrap();
        assert_eq!(e.content, vec![10, 0, 0, 1]);
        assert_eq!(e.next, Some(vec![99]));
    }

    #[test]
    fn test_fixed_size_too_short() {
        let c = Constraint::fixed_size(4);
        assert_eq!(c.extract(&[10, 0]), None);
    }

    #[test]
    fn test_ranged_size_reads_length_arc() {
        let c = Constraint::size_range(0, 4);
        let e = c.extract(&[3, 65, 66, 67, 99]).unwrap();
        assert_eq!(e.content, vec![65, 66, 67]);
        assert_eq!(e.next, Some(vec![99]));
        assert_eq!(rejoined(&e), vec![3, 65, 66, 67, 99][1..].to_vec());
    }

    #[test]
    fn test_ranged_size_consumes_all() {
        let c = Constraint::size_range(0, 8);
        let e = c.extract(&[2, 5, 6]).unwrap();
        assert_eq!(e.content, vec![5, 6]);
        assert_eq!(e.next, None);
    }

    #[test]
    fn test_ranged_size_too_short() {
        let c = Constraint::size_range(0, 16);
        assert_eq!(c.extract(&[5, 1, 2]), None);
    }

    #[test]
    fn test_size_zero() {
        let c = Constraint::fixed_size(0);
        let e = c.extract(&[1, 2]).unwrap();
        assert!(e.content.is_empty());
        assert_eq!(e.next, Some(vec![1, 2]));
    }

    #[test]
    fn test_normalise_merges_overlaps() {
        let mut c = Constraint::new(false);
        c.push(Element::range(0, 10));
        c.push(Element::range(5, 20));
        c.push(Element::single(7));
        c.finish();
        assert_eq!(c.elements(), &[Element::range(0, 20)]);
    }

    #[test]
    fn test_normalise_keeps_disjoint() {
        let mut c = Constraint::new(false);
        c.push(Element::single(40));
        c.push(Element::range(0, 10));
        c.finish();
        assert_eq!(
            c.elements(),
            &[Element::range(0, 10), Element::single(40)]
        );
    }

    #[test]
    fn test_reversed_bounds_swapped() {
        assert_eq!(Element::range(9, 3), Element::range(3, 9));
    }
}
