//! Duplicate guard over logical identity.

use crate::model::Identity;

/// Returns `true` when `stored` holds a record other than `original` that shares
/// `candidate`'s identity.
///
/// `original` is the record being replaced (`None` for inserts); exactly one
/// structurally equal entry is skipped so an edit never collides with itself.
pub fn is_duplicate<'a, T>(
    candidate: &T,
    original: Option<&T>,
    stored: impl IntoIterator<Item = &'a T>,
) -> bool
where
    T: Identity + PartialEq + 'a,
{
    let mut original = original;
    stored.into_iter().any(|record| {
        if original.is_some_and(|target| target == record) {
            original = None;
            return false;
        }
        record.same_identity(candidate)
    })
}
