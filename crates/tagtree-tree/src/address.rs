//! Resolving [`IndexPath`]s against nested collections
//!
//! Walks the first N-1 segments through successive child collections and
//! uses the last one to index the immediate parent's collection. Lookups
//! are total: an address that no longer fits the data resolves to `None`.

use crate::path::IndexPath;

/// Value owning an ordered collection of values of its own type
pub trait Nested: Sized {
    /// Child values in display order
    fn nested(&self) -> &[Self];

    /// Mutable child values; empty for values that cannot hold children
    fn nested_mut(&mut self) -> &mut [Self];
}

/// Read the element at `path`
#[must_use]
pub fn get<'a, T: Nested>(root: &'a [T], path: &IndexPath) -> Option<&'a T> {
    try_get(root, path).ok()
}

/// Read with a diagnostic on failure
///
/// # Errors
/// Returns [`AddressError`] if the path is the root path or leaves the
/// collection at some depth.
pub fn try_get<'a, T: Nested>(root: &'a [T], path: &IndexPath) -> Result<&'a T, AddressError> {
    let (last, parents) = path.segments().split_last().ok_or(AddressError::Root)?;
    let mut level = root;
    for (depth, &idx) in parents.iter().enumerate() {
        let len = level.len();
        level = level
            .get(idx)
            .ok_or_else(|| AddressError::OutOfRange {
                path: path.clone(),
                depth,
                index: idx,
                len,
            })?
            .nested();
    }
    let len = level.len();
    level.get(*last).ok_or_else(|| AddressError::OutOfRange {
        path: path.clone(),
        depth: parents.len(),
        index: *last,
        len,
    })
}

/// Mutable access to the element at `path`
#[must_use]
pub fn get_mut<'a, T: Nested>(root: &'a mut [T], path: &IndexPath) -> Option<&'a mut T> {
    try_get_mut(root, path).ok()
}

/// Mutable access with a diagnostic on failure
///
/// # Errors
/// Returns [`AddressError`] if the path is the root path or leaves the
/// collection at some depth.
pub fn try_get_mut<'a, T: Nested>(
    root: &'a mut [T],
    path: &IndexPath,
) -> Result<&'a mut T, AddressError> {
    let (last, parents) = path.segments().split_last().ok_or(AddressError::Root)?;
    let mut level = root;
    for (depth, &idx) in parents.iter().enumerate() {
        let len = level.len();
        level = level
            .get_mut(idx)
            .ok_or_else(|| AddressError::OutOfRange {
                path: path.clone(),
                depth,
                index: idx,
                len,
            })?
            .nested_mut();
    }
    let len = level.len();
    level.get_mut(*last).ok_or_else(|| AddressError::OutOfRange {
        path: path.clone(),
        depth: parents.len(),
        index: *last,
        len,
    })
}

/// Apply `f` to the element at `path`, returning whether it was found
pub fn modify<T: Nested, F>(root: &mut [T], path: &IndexPath, f: F) -> bool
where
    F: FnOnce(&mut T),
{
    match get_mut(root, path) {
        Some(value) => {
            f(value);
            true
        }
        None => false,
    }
}

/// Every element with its address, depth-first pre-order
#[must_use]
pub fn addresses<T: Nested>(root: &[T]) -> Vec<(IndexPath, &T)> {
    fn walk<'a, T: Nested>(level: &'a [T], prefix: &IndexPath, out: &mut Vec<(IndexPath, &'a T)>) {
        for (i, value) in level.iter().enumerate() {
            let path = prefix.child(i);
            out.push((path.clone(), value));
            walk(value.nested(), &path, out);
        }
    }

    let mut out = Vec::new();
    walk(root, &IndexPath::root(), &mut out);
    out
}

/// Errors resolving an address
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    /// The root path names a collection, not an element
    #[error("root path does not address an element")]
    Root,

    /// A segment is past the end of its collection
    #[error("address {path} out of range at depth {depth}: index {index}, len {len}")]
    OutOfRange {
        path: IndexPath,
        depth: usize,
        index: usize,
        len: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Field {
        name: String,
        tags: Vec<String>,
        fields: Vec<Field>,
    }

    impl Nested for Field {
        fn nested(&self) -> &[Self] {
            &self.fields
        }

        fn nested_mut(&mut self) -> &mut [Self] {
            &mut self.fields
        }
    }

    fn field(name: &str, fields: Vec<Field>) -> Field {
        Field {
            name: name.to_string(),
            tags: Vec::new(),
            fields,
        }
    }

    fn schema() -> Vec<Field> {
        vec![
            field("id", vec![]),
            field("email", vec![]),
            field(
                "address",
                vec![field("street", vec![]), field("city", vec![])],
            ),
        ]
    }

    #[test]
    fn read_nested_record_child() {
        let fields = schema();
        let path: IndexPath = "2.0".parse().unwrap();
        assert_eq!(get(&fields, &path).unwrap().name, "street");
    }

    #[test]
    fn write_touches_only_addressed_child() {
        let mut fields = schema();
        let path: IndexPath = "2.0".parse().unwrap();
        let found = modify(&mut fields, &path, |f| f.tags = vec!["pii".into()]);
        assert!(found);

        assert_eq!(fields[2].fields[0].tags, vec!["pii".to_string()]);
        assert!(fields[2].fields[1].tags.is_empty());
        assert_eq!(fields[2].fields[1], schema()[2].fields[1]);
    }

    #[test]
    fn out_of_range_is_none() {
        let mut fields = schema();
        assert!(get(&fields, &"7".parse().unwrap()).is_none());
        assert!(get(&fields, &"0.0".parse().unwrap()).is_none());
        assert!(get(&fields, &IndexPath::root()).is_none());
        assert!(!modify(&mut fields, &"2.5".parse().unwrap(), |_| {}));
    }

    #[test]
    fn try_get_mut_reports_depth() {
        let mut fields = schema();
        let err = try_get_mut(&mut fields, &"2.9".parse().unwrap()).unwrap_err();
        assert!(matches!(
            err,
            AddressError::OutOfRange { depth: 1, index: 9, len: 2, .. }
        ));

        let err = try_get_mut(&mut fields, &IndexPath::root()).unwrap_err();
        assert_eq!(err, AddressError::Root);
    }

    #[test]
    fn try_get_reports_real_position() {
        let fields = schema();
        assert_eq!(try_get(&fields, &"2.1".parse().unwrap()).unwrap().name, "city");

        let err = try_get(&fields, &"2.4".parse().unwrap()).unwrap_err();
        assert_eq!(
            err,
            AddressError::OutOfRange {
                path: "2.4".parse().unwrap(),
                depth: 1,
                index: 4,
                len: 2,
            }
        );

        // Descending through a leaf
        let err = try_get(&fields, &"0.0".parse().unwrap()).unwrap_err();
        assert!(matches!(
            err,
            AddressError::OutOfRange { depth: 1, index: 0, len: 0, .. }
        ));

        let err = try_get(&fields, &"5.0".parse().unwrap()).unwrap_err();
        assert!(matches!(
            err,
            AddressError::OutOfRange { depth: 0, index: 5, len: 3, .. }
        ));
        assert_eq!(try_get(&fields, &IndexPath::root()).unwrap_err(), AddressError::Root);
    }

    #[test]
    fn addresses_are_preorder() {
        let fields = schema();
        let listed: Vec<_> = addresses(&fields)
            .into_iter()
            .map(|(p, f)| (p.to_string(), f.name.clone()))
            .collect();
        assert_eq!(
            listed,
            vec![
                ("0".to_string(), "id".to_string()),
                ("1".to_string(), "email".to_string()),
                ("2".to_string(), "address".to_string()),
                ("2.0".to_string(), "street".to_string()),
                ("2.1".to_string(), "city".to_string()),
            ]
        );
    }
}
