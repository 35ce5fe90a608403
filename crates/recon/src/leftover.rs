use std::collections::BTreeSet;

use assetlink_core::{tag, ExternalRecord, InternalRecord};

use crate::session::PendingLink;

/// Tags already allocated: every real internal tag plus every tag staged in
/// a pending link. Normalized for set membership.
pub fn used_tags(internals: &[InternalRecord], pending: &[PendingLink]) -> BTreeSet<String> {
    let mut used = BTreeSet::new();
    for record in internals {
        if !record.is_untagged() {
            used.insert(tag::normalize(&record.tag));
        }
    }
    for link in pending {
        if link.external.has_real_tag() {
            used.insert(tag::normalize(&link.external.tag));
        }
    }
    used
}

/// Available registry records not yet allocated to any internal record.
///
/// Recomputed on every call: the used-tag set changes with every commit or
/// staged link, so the result is never cached.
pub fn leftovers<'a>(
    externals: &'a [ExternalRecord],
    internals: &[InternalRecord],
    pending: &[PendingLink],
) -> Vec<&'a ExternalRecord> {
    let used = used_tags(internals, pending);
    externals
        .iter()
        .filter(|e| {
            e.is_available() && e.has_real_tag() && !used.contains(&tag::normalize(&e.tag))
        })
        .collect()
}
