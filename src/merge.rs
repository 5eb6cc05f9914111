//! Merging of flat mappings.
//!
//! Inputs are applied in order and later values replace earlier ones key by
//! key. Merging never fails and never reports conflicts.

use crate::flatten::FlatMap;

/// Merge `overlay` into `base`, with `overlay` taking precedence.
pub fn merge_into(base: &mut FlatMap, overlay: FlatMap) {
    base.extend(overlay);
}

/// Merge multiple flat mappings in order, with later mappings taking precedence.
///
/// Equivalent to folding `merge_into` over the list.
pub fn merge_all(mappings: impl IntoIterator<Item = FlatMap>) -> FlatMap {
    mappings.into_iter().fold(FlatMap::new(), |mut acc, next| {
        merge_into(&mut acc, next);
        acc
    })
}
