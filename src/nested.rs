//! Nested literal input.
//!
//! [`Nested`] is a tree of values whose nesting depth and sibling counts
//! describe a shape. [`infer_shape`] validates that the tree is rectangular
//! and matches the requested rank before any buffer is populated.

use crate::{NdArrayError, Result};

/// A value or a sequence of nested literals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Nested<T> {
    Value(T),
    List(Vec<Nested<T>>),
}

impl<T> Nested<T> {
    pub fn value(value: T) -> Self {
        Nested::Value(value)
    }

    pub fn list(items: impl IntoIterator<Item = Nested<T>>) -> Self {
        Nested::List(items.into_iter().collect())
    }

    /// A flat sequence of values.
    pub fn values(items: impl IntoIterator<Item = T>) -> Self {
        Nested::List(items.into_iter().map(Nested::Value).collect())
    }

    #[inline]
    pub fn is_list(&self) -> bool {
        matches!(self, Nested::List(_))
    }
}

/// Build a [`Nested`] literal from bracketed syntax.
///
/// ```
/// use strided_ndarray::{nested, Nested};
///
/// let lit: Nested<i32> = nested!([[1, 2, 3], [4, 5, 6]]);
/// assert!(lit.is_list());
/// ```
#[macro_export]
macro_rules! nested {
    ([$($body:tt)*]) => {
        $crate::Nested::List($crate::nested!(@items [] $($body)*))
    };
    (@items [$($done:expr,)*]) => {
        vec![$($done),*]
    };
    (@items [$($done:expr,)*] [$($inner:tt)*] $(, $($rest:tt)*)?) => {
        $crate::nested!(@items [$($done,)* $crate::nested!([$($inner)*]),] $($($rest)*)?)
    };
    (@items [$($done:expr,)*] $value:expr $(, $($rest:tt)*)?) => {
        $crate::nested!(@items [$($done,)* $crate::Nested::Value($value),] $($($rest)*)?)
    };
    ($value:expr) => {
        $crate::Nested::Value($value)
    };
}

/// Infer the `N`-axis shape of `literal`.
///
/// Fails with [`NdArrayError::ShapeMismatch`] when siblings at one depth have
/// different lengths, when a value and a sequence are siblings, or when the
/// nesting depth differs from `N`.
pub fn infer_shape<T, const N: usize>(literal: &Nested<T>) -> Result<[usize; N]> {
    let mut extents: [Option<usize>; N] = [None; N];
    infer_axis(literal, 0, &mut extents)?;
    // Extents below an empty sequence are never observed.
    Ok(extents.map(|e| e.unwrap_or(0)))
}

fn infer_axis<T, const N: usize>(
    node: &Nested<T>,
    depth: usize,
    extents: &mut [Option<usize>; N],
) -> Result<()> {
    match node {
        Nested::Value(_) if depth == N => Ok(()),
        Nested::Value(_) => Err(NdArrayError::ShapeMismatch {
            depth,
            reason: format!("expected a sequence, found a value (rank {N})"),
        }),
        Nested::List(_) if depth == N => Err(NdArrayError::ShapeMismatch {
            depth,
            reason: format!("nesting deeper than rank {N}"),
        }),
        Nested::List(items) => {
            match extents[depth] {
                None => extents[depth] = Some(items.len()),
                Some(expected) if expected != items.len() => {
                    return Err(NdArrayError::ShapeMismatch {
                        depth,
                        reason: format!(
                            "sequence of length {} where {expected} was expected",
                            items.len()
                        ),
                    });
                }
                Some(_) => {}
            }
            if let Some(first) = items.first() {
                let is_list = first.is_list();
                if items.iter().any(|item| item.is_list() != is_list) {
                    return Err(NdArrayError::ShapeMismatch {
                        depth: depth + 1,
                        reason: "values and sequences mixed as siblings".to_string(),
                    });
                }
            }
            for item in items {
                infer_axis(item, depth + 1, extents)?;
            }
            Ok(())
        }
    }
}

/// Visit every leaf of a literal already validated by [`infer_shape`],
/// passing its zero-based coordinate.
pub(crate) fn for_each_leaf<T, const N: usize>(
    literal: Nested<T>,
    mut f: impl FnMut(&[usize; N], T),
) {
    let mut coords = [0usize; N];
    visit(literal, 0, &mut coords, &mut f);
}

fn visit<T, const N: usize>(
    node: Nested<T>,
    depth: usize,
    coords: &mut [usize; N],
    f: &mut impl FnMut(&[usize; N], T),
) {
    match node {
        Nested::Value(value) => f(coords, value),
        Nested::List(items) => {
            for (i, item) in items.into_iter().enumerate() {
                coords[depth] = i;
                visit(item, depth + 1, coords, f);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_macro_builds_tree() {
        let lit: Nested<i32> = nested!([[1, 2], [3, -4]]);
        assert_eq!(
            lit,
            Nested::list([Nested::values([1, 2]), Nested::values([3, -4])])
        );
        let scalar: Nested<i32> = nested!(7);
        assert_eq!(scalar, Nested::Value(7));
        let trailing: Nested<i32> = nested!([1, 2,]);
        assert_eq!(trailing, Nested::values([1, 2]));
    }

    #[test]
    fn test_infer_rectangular() {
        let lit: Nested<i32> = nested!([[1, 2, 3], [4, 5, 6]]);
        assert_eq!(infer_shape::<_, 2>(&lit).unwrap(), [2, 3]);
        let lit: Nested<i32> = nested!([[[1], [2]], [[3], [4]], [[5], [6]]]);
        assert_eq!(infer_shape::<_, 3>(&lit).unwrap(), [3, 2, 1]);
    }

    #[test]
    fn test_infer_ragged_rows() {
        let lit: Nested<i32> = nested!([[1, 2], [3, 4, 5]]);
        let err = infer_shape::<_, 2>(&lit).unwrap_err();
        assert!(matches!(err, NdArrayError::ShapeMismatch { depth: 1, .. }));
    }

    #[test]
    fn test_infer_mixed_siblings() {
        let lit = Nested::list([Nested::Value(1), Nested::values([2, 3])]);
        assert!(matches!(
            infer_shape::<_, 2>(&lit),
            Err(NdArrayError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_infer_depth_disagrees_with_rank() {
        let lit: Nested<i32> = nested!([[1, 2], [3, 4]]);
        assert!(infer_shape::<_, 1>(&lit).is_err());
        assert!(infer_shape::<_, 3>(&lit).is_err());
    }

    #[test]
    fn test_infer_rank_zero_and_empty() {
        let scalar: Nested<i32> = nested!(5);
        assert_eq!(infer_shape::<_, 0>(&scalar).unwrap(), []);
        let empty: Nested<i32> = Nested::List(vec![]);
        assert_eq!(infer_shape::<_, 2>(&empty).unwrap(), [0, 0]);
    }

    #[test]
    fn test_for_each_leaf_coordinates() {
        let lit: Nested<i32> = nested!([[1, 2, 3], [4, 5, 6]]);
        let mut seen = Vec::new();
        for_each_leaf::<_, 2>(lit, |c, v| seen.push((*c, v)));
        assert_eq!(seen[0], ([0, 0], 1));
        assert_eq!(seen[4], ([1, 1], 5));
        assert_eq!(seen.len(), 6);
    }
}
