//! Ordering policies for destination listings
//!
//! Both policies are stable: destinations with equal keys keep their source order.

use std::borrow::Borrow;

use crate::destinations::Destination;

/// Maximum number of related destinations
pub const RELATED_LIMIT: usize = 4;

/// Catalog ordering: active destinations first, then by departure date
pub fn sort_catalog<D>(destinations: &mut [D])
where
    D: Borrow<Destination>,
{
    destinations.sort_by_key(|destination| {
        let destination = destination.borrow();

        (!destination.active, destination.date_score())
    });
}

/// Related destinations for "you might also like"
///
/// Skips the current destination and inactive ones, prefers the same region, then the closest
/// year, at most [`RELATED_LIMIT`] of them.
pub fn related<'a, I>(current: &Destination, candidates: I) -> Vec<&'a Destination>
where
    I: IntoIterator<Item = &'a Destination>,
{
    let mut related = candidates
        .into_iter()
        .filter(|candidate| candidate.active && candidate.id != current.id)
        .collect::<Vec<_>>();

    related.sort_by_key(|candidate| {
        (
            candidate.region != current.region,
            candidate.year.abs_diff(current.year),
        )
    });

    related.truncate(RELATED_LIMIT);

    related
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::destinations::Region;
    use crate::destinations::fixtures::destination;

    fn slugs(destinations: &[&Destination]) -> Vec<String> {
        destinations
            .iter()
            .map(|destination| destination.slug.clone())
            .collect()
    }

    #[test]
    fn test_catalog_ordering_scenario() {
        let a = destination("a", Region::Europa, 2026, "13 Ago", true);
        let b = destination("b", Region::Europa, 2026, "Consultar", true);
        let c = destination("c", Region::Europa, 2026, "5 Ene", false);

        let mut listing = vec![&c, &b, &a];
        sort_catalog(&mut listing);

        assert_eq!(vec!["a", "b", "c"], slugs(&listing));
    }

    #[test]
    fn test_active_always_first() {
        let collection = vec![
            destination("old-inactive", Region::Asia, 2020, "1 Ene", false),
            destination("late-active", Region::Asia, 2030, "Consultar", true),
            destination("soon-inactive", Region::Asia, 2026, "2 Feb", false),
            destination("soon-active", Region::Asia, 2026, "3 Feb", true),
        ];

        let mut listing = collection.iter().collect::<Vec<_>>();
        sort_catalog(&mut listing);

        assert_eq!(
            vec!["soon-active", "late-active", "old-inactive", "soon-inactive"],
            slugs(&listing)
        );

        let first_inactive = listing
            .iter()
            .position(|destination| !destination.active)
            .unwrap();
        assert!(listing[first_inactive..].iter().all(|d| !d.active));
    }

    #[test]
    fn test_catalog_ordering_is_stable() {
        let collection = vec![
            destination("first", Region::Europa, 2026, "Consultar", true),
            destination("second", Region::America, 2026, "", true),
            destination("third", Region::Asia, 2026, "consultar", true),
        ];

        let mut owned = collection.clone();
        sort_catalog(&mut owned);

        assert_eq!(collection, owned);
    }

    #[test]
    fn test_related_prefers_region_then_year() {
        let current = destination("current", Region::Europa, 2026, "13 Ago", true);

        let collection = vec![
            current.clone(),
            destination("asia-2026", Region::Asia, 2026, "Ago", true),
            destination("europa-2028", Region::Europa, 2028, "Ago", true),
            destination("europa-inactive", Region::Europa, 2026, "Ago", false),
            destination("europa-2027", Region::Europa, 2027, "Ago", true),
            destination("america-2025", Region::America, 2025, "Ago", true),
            destination("europa-2025", Region::Europa, 2025, "Ago", true),
            destination("oceania-2026", Region::Oceania, 2026, "Ago", true),
        ];

        let related = related(&current, &collection);

        assert_eq!(
            vec!["europa-2027", "europa-2025", "europa-2028", "asia-2026"],
            slugs(&related)
        );
    }

    #[test]
    fn test_related_never_includes_current_or_inactive() {
        let current = destination("current", Region::Asia, 2026, "Ago", true);

        let mut collection = vec![current.clone()];
        for index in 0..10 {
            collection.push(destination(
                &format!("trip-{index}"),
                Region::Asia,
                2026,
                "Ago",
                index % 2 == 0,
            ));
        }

        let related = related(&current, &collection);

        assert_eq!(RELATED_LIMIT, related.len());
        assert!(related.iter().all(|d| d.active && d.id != current.id));
    }

    #[test]
    fn test_related_of_empty_collection() {
        let current = destination("current", Region::Asia, 2026, "Ago", true);

        assert!(related(&current, &[]).is_empty());
    }
}
