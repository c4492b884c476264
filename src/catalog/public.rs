//! Public destination catalog
//!
//! Only active destinations are ever shown to visitors.

use std::collections::BTreeSet;

use crate::destinations::Destination;
use crate::destinations::Region;

use super::Filter;
use super::related;
use super::sort_catalog;

/// How the catalog is displayed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisplayMode {
    /// Section of another page: show at most `limit`, link to the full list
    Embedded { limit: usize },

    /// The full listing page
    FullPage,
}

impl DisplayMode {
    /// Display mode for an optional limit, no limit (or zero) is the full page
    pub fn from_limit(limit: Option<usize>) -> Self {
        match limit {
            Some(limit) if limit > 0 => DisplayMode::Embedded { limit },
            _ => DisplayMode::FullPage,
        }
    }
}

/// The public catalog over the active destinations
pub struct PublicCatalog<'a> {
    /// Active destinations, in source order
    destinations: Vec<&'a Destination>,
}

/// What the catalog shows for a filter
#[derive(Debug)]
pub struct CatalogView<'a> {
    /// Destinations to show
    pub destinations: Vec<&'a Destination>,

    /// Number of matching destinations, before any truncation
    pub total: usize,
}

impl CatalogView<'_> {
    /// Are there more matches than shown?
    pub fn has_more(&self) -> bool {
        self.total > self.destinations.len()
    }
}

impl<'a> PublicCatalog<'a> {
    /// Create the catalog, inactive destinations are left out
    pub fn new<I>(destinations: I) -> Self
    where
        I: IntoIterator<Item = &'a Destination>,
    {
        Self {
            destinations: destinations
                .into_iter()
                .filter(|destination| destination.active)
                .collect(),
        }
    }

    /// Number of active destinations
    pub fn available(&self) -> usize {
        self.destinations.len()
    }

    /// Distinct regions present, alphabetically by wire value
    pub fn regions(&self) -> Vec<Region> {
        let mut regions = self
            .destinations
            .iter()
            .map(|destination| destination.region)
            .collect::<Vec<_>>();

        regions.sort_unstable_by_key(|region| region.as_str());
        regions.dedup();

        regions
    }

    /// Distinct years present, ascending
    pub fn years(&self) -> Vec<i32> {
        self.destinations
            .iter()
            .map(|destination| destination.year)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Filter and order the catalog
    ///
    /// With a region selected, the source order is kept and no date ordering takes place.
    pub fn view(&self, filter: &Filter, mode: DisplayMode) -> CatalogView<'a> {
        let mut destinations = filter.apply(self.destinations.iter().copied());

        if !filter.has_region() {
            sort_catalog(&mut destinations);
        }

        let total = destinations.len();

        if let DisplayMode::Embedded { limit } = mode {
            destinations.truncate(limit);
        }

        CatalogView {
            destinations,
            total,
        }
    }

    /// Promoted destinations of the homepage, partner trips excluded
    pub fn featured(&self) -> Vec<&'a Destination> {
        self.destinations
            .iter()
            .copied()
            .filter(|destination| destination.featured && !destination.partner)
            .collect()
    }

    /// Related destinations for the given one
    pub fn related(&self, current: &Destination) -> Vec<&'a Destination> {
        related(current, self.destinations.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::destinations::fixtures::destination;

    fn catalog_data() -> Vec<Destination> {
        vec![
            destination("europa-consultar", Region::Europa, 2026, "Consultar", true),
            destination("asia-oct", Region::Asia, 2026, "4 Oct", true),
            destination("europa-hidden", Region::Europa, 2026, "1 Ene", false),
            destination("europa-may", Region::Europa, 2026, "20 May", true),
            destination("america-feb", Region::America, 2027, "Feb", true),
            destination("europa-mar", Region::Europa, 2026, "Mar", true),
        ]
    }

    fn slugs(view: &CatalogView) -> Vec<String> {
        view.destinations
            .iter()
            .map(|destination| destination.slug.clone())
            .collect()
    }

    #[test]
    fn test_full_page_sorts_by_date() {
        let data = catalog_data();
        let catalog = PublicCatalog::new(&data);

        let view = catalog.view(&Filter::default(), DisplayMode::FullPage);

        assert_eq!(
            vec![
                "europa-mar",
                "europa-may",
                "asia-oct",
                "america-feb",
                "europa-consultar"
            ],
            slugs(&view)
        );
        assert_eq!(5, view.total);
        assert!(!view.has_more());
        assert_eq!(5, catalog.available());
    }

    #[test]
    fn test_region_filter_keeps_source_order() {
        let data = catalog_data();
        let catalog = PublicCatalog::new(&data);

        let filter = Filter {
            region: Some(Region::Europa),
            ..Filter::default()
        };
        let view = catalog.view(&filter, DisplayMode::FullPage);

        assert_eq!(
            vec!["europa-consultar", "europa-may", "europa-mar"],
            slugs(&view)
        );
    }

    #[test]
    fn test_embedded_truncates_but_counts_everything() {
        let data = catalog_data();
        let catalog = PublicCatalog::new(&data);

        let view = catalog.view(&Filter::default(), DisplayMode::Embedded { limit: 2 });

        assert_eq!(vec!["europa-mar", "europa-may"], slugs(&view));
        assert_eq!(5, view.total);
        assert!(view.has_more());
    }

    #[test]
    fn test_display_mode_from_limit() {
        assert_eq!(DisplayMode::FullPage, DisplayMode::from_limit(None));
        assert_eq!(DisplayMode::FullPage, DisplayMode::from_limit(Some(0)));
        assert_eq!(
            DisplayMode::Embedded { limit: 8 },
            DisplayMode::from_limit(Some(8))
        );
    }

    #[test]
    fn test_view_is_recomputed_per_filter() {
        let data = catalog_data();
        let catalog = PublicCatalog::new(&data);

        let filter = Filter {
            year: Some(2027),
            ..Filter::default()
        };
        let first = catalog.view(&filter, DisplayMode::FullPage);
        let again = catalog.view(&filter, DisplayMode::FullPage);
        assert_eq!(slugs(&first), slugs(&again));
        assert_eq!(vec!["america-feb"], slugs(&first));

        let everything = catalog.view(&Filter::default(), DisplayMode::FullPage);
        assert_eq!(5, everything.total);
    }

    #[test]
    fn test_regions_and_years() {
        let data = catalog_data();
        let catalog = PublicCatalog::new(&data);

        assert_eq!(
            vec![Region::America, Region::Asia, Region::Europa],
            catalog.regions()
        );
        assert_eq!(vec![2026, 2027], catalog.years());
    }

    #[test]
    fn test_regions_sorted_by_wire_value_once_each() {
        let data = vec![
            destination("europa-a", Region::Europa, 2026, "1 Jun", true),
            destination("oceania", Region::Oceania, 2026, "1 Jun", true),
            destination("africa", Region::AfricaMo, 2026, "1 Jun", true),
            destination("europa-b", Region::Europa, 2026, "1 Jul", true),
            destination("hidden-asia", Region::Asia, 2026, "1 Jul", false),
        ];
        let catalog = PublicCatalog::new(&data);

        assert_eq!(
            vec![Region::AfricaMo, Region::Europa, Region::Oceania],
            catalog.regions()
        );
    }

    #[test]
    fn test_featured_excludes_partner_and_inactive() {
        let mut data = catalog_data();
        data[0].featured = true;
        data[1].featured = true;
        data[1].partner = true;
        data[2].featured = true;

        let catalog = PublicCatalog::new(&data);
        let featured = catalog.featured();

        assert_eq!(1, featured.len());
        assert_eq!("europa-consultar", featured[0].slug);
    }

    #[test]
    fn test_related_only_from_active() {
        let data = catalog_data();
        let catalog = PublicCatalog::new(&data);

        let related = catalog.related(&data[3]);

        assert_eq!(4, related.len());
        assert_eq!("europa-consultar", related[0].slug);
        assert_eq!("europa-mar", related[1].slug);
        assert!(related.iter().all(|d| d.slug != "europa-hidden"));
    }
}
