//! Builder checks shared by several clause kinds.
//!
//! Each check returns the first violation it finds; callers chain them with
//! `?` so that later checks never see input an earlier one rejected.

use super::{ClauseName, Fragment};
use crate::dialect::{Backend, Feature};
use crate::error::{BuildError, BuildResult};
use crate::schema::{RequiredTables, TableSet, unknown_tables};

/// Every table `items` read must be in `provided`.
pub(crate) fn visible<F: RequiredTables>(
    clause: ClauseName,
    items: &[F],
    provided: &TableSet,
) -> BuildResult<()> {
    let required = items.required_tables();
    let unknown = unknown_tables(&required, provided);
    if unknown.is_empty() {
        Ok(())
    } else {
        Err(BuildError::UnknownTables {
            clause,
            tables: unknown,
        })
    }
}

/// `backend` must render every feature in `features`.
pub(crate) fn supports(features: &[Feature], backend: &Backend) -> BuildResult<()> {
    match features.iter().find(|f| !backend.supports(**f)) {
        Some(feature) => Err(BuildError::Unsupported {
            backend: backend.name(),
            construct: feature.name(),
        }),
        None => Ok(()),
    }
}

/// `backend` must render every fragment in `items`.
pub(crate) fn supported<'a, F: Fragment + 'a>(
    items: impl IntoIterator<Item = &'a F>,
    backend: &Backend,
) -> BuildResult<()> {
    items
        .into_iter()
        .try_for_each(|item| item.check_support(backend))
}

/// First element of `items` equal to an element of `existing` or to an
/// earlier element of `items`, compared by `key`.
pub(crate) fn first_duplicate<'a, T, K, F>(existing: &'a [T], items: &'a [T], key: F) -> Option<&'a T>
where
    K: PartialEq,
    F: Fn(&'a T) -> K,
{
    let mut seen: Vec<K> = existing.iter().map(&key).collect();
    for item in items {
        let k = key(item);
        if seen.contains(&k) {
            return Some(item);
        }
        seen.push(k);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Table;

    #[test]
    fn test_first_duplicate() {
        let existing = [1, 2];
        assert_eq!(first_duplicate(&existing, &[3, 4], |x| *x), None);
        assert_eq!(first_duplicate(&existing, &[3, 2], |x| *x), Some(&2));
        assert_eq!(first_duplicate(&[], &[5, 6, 5], |x| *x), Some(&5));
    }

    #[test]
    fn test_visible_names_unknown_tables() {
        let users = Table::new("users").unwrap();
        let orders = Table::new("orders").unwrap();
        let cols = [users.column("id").unwrap(), orders.column("id").unwrap()];
        let provided: TableSet = [users.clone()].into_iter().collect();

        let err = visible(ClauseName::Columns, &cols, &provided).unwrap_err();
        assert_eq!(
            err,
            BuildError::UnknownTables {
                clause: ClauseName::Columns,
                tables: vec!["orders".to_string()],
            }
        );
        assert!(visible(ClauseName::Columns, &cols[..1], &provided).is_ok());
    }

    #[test]
    fn test_supports() {
        assert!(supports(&[Feature::ILike], &Backend::postgres()).is_ok());
        let err = supports(&[Feature::ILike], &Backend::mysql()).unwrap_err();
        assert_eq!(err.to_string(), "ILIKE is not supported by the mysql backend");
    }
}
