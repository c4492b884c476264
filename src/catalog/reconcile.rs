//! Merging the dynamic destinations with the bundled ones

use std::collections::HashSet;

use crate::destinations::Destination;

/// Which source wins when both have a destination with the same slug
///
/// The losing record is dropped completely, fields are never merged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MergePolicy {
    /// The dynamic (database) record wins
    #[default]
    DynamicWins,

    /// The bundled record wins
    #[cfg_attr(not(test), allow(dead_code))]
    StaticWins,
}

/// Reconcile dynamic destinations with the bundled fallback destinations
///
/// The winning source comes first, in its given order, followed by the active destinations of
/// the other source whose slug has not been seen yet.
///
/// Only the bundled destinations are checked for being active, the dynamic source is expected to
/// hand over the collection it wants listed.
pub fn reconcile(
    dynamic: &[Destination],
    fallback: &[Destination],
    policy: MergePolicy,
) -> Vec<Destination> {
    match policy {
        MergePolicy::DynamicWins => merge(dynamic, fallback, |destination| destination.active),
        MergePolicy::StaticWins => merge(
            &fallback
                .iter()
                .filter(|destination| destination.active)
                .cloned()
                .collect::<Vec<_>>(),
            dynamic,
            |_| true,
        ),
    }
}

fn merge<F>(winner: &[Destination], other: &[Destination], include: F) -> Vec<Destination>
where
    F: Fn(&Destination) -> bool,
{
    let mut seen = winner
        .iter()
        .map(|destination| destination.slug.as_str())
        .collect::<HashSet<_>>();

    let mut result = winner.to_vec();

    for destination in other {
        if include(destination) && seen.insert(destination.slug.as_str()) {
            result.push(destination.clone());
        }
    }

    result
}
