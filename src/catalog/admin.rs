//! Admin destination table
//!
//! Unlike the public catalog, the admin table lists inactive destinations as well.

use std::collections::BTreeSet;

use crate::destinations::Destination;

use super::Filter;
use super::sort_catalog;

/// The admin table over every stored destination
pub struct AdminTable<'a> {
    /// All destinations, inactive ones included
    destinations: &'a [Destination],
}

/// What the admin table shows for a filter
#[derive(Debug)]
pub struct AdminView<'a> {
    /// Filtered destinations in catalog order
    pub destinations: Vec<&'a Destination>,

    /// Number of filtered destinations
    pub count: usize,

    /// Distinct years of all destinations, ascending, for the year selector
    pub years: Vec<i32>,
}

/// Counters for the admin dashboard
#[derive(Debug, Default, PartialEq, Eq)]
pub struct AdminStats {
    pub total: usize,
    pub active: usize,
    pub featured: usize,
    pub partner: usize,
}

impl<'a> AdminTable<'a> {
    /// Create the table over the given destinations
    pub fn new(destinations: &'a [Destination]) -> Self {
        Self { destinations }
    }

    /// Distinct years present in the data, ascending
    pub fn years(&self) -> Vec<i32> {
        self.destinations
            .iter()
            .map(|destination| destination.year)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Filter and order the table
    pub fn view(&self, filter: &Filter) -> AdminView<'a> {
        let mut destinations = filter.apply(self.destinations);

        sort_catalog(&mut destinations);

        AdminView {
            count: destinations.len(),
            destinations,
            years: self.years(),
        }
    }

    /// Dashboard counters
    pub fn stats(&self) -> AdminStats {
        self.destinations
            .iter()
            .fold(AdminStats::default(), |mut stats, destination| {
                stats.total += 1;
                stats.active += usize::from(destination.active);
                stats.featured += usize::from(destination.featured);
                stats.partner += usize::from(destination.partner);
                stats
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::destinations::Region;
    use crate::destinations::fixtures::destination;

    fn table_data() -> Vec<Destination> {
        let mut data = vec![
            destination("inactive-soon", Region::Europa, 2026, "2 Ene", false),
            destination("consultar", Region::Europa, 2026, "Consultar", true),
            destination("later", Region::America, 2027, "5 Mar", true),
            destination("sooner", Region::Europa, 2026, "13 Ago", true),
            destination("earlier-year", Region::Asia, 2025, "Dic", true),
        ];
        data[3].featured = true;
        data[2].partner = true;

        data
    }

    #[test]
    fn test_view_orders_active_first_then_date() {
        let data = table_data();
        let table = AdminTable::new(&data);

        let view = table.view(&Filter::default());

        let slugs = view
            .destinations
            .iter()
            .map(|destination| destination.slug.as_str())
            .collect::<Vec<_>>();

        assert_eq!(
            vec!["earlier-year", "sooner", "later", "consultar", "inactive-soon"],
            slugs
        );
        assert_eq!(5, view.count);
    }

    #[test]
    fn test_view_filters_and_counts() {
        let data = table_data();
        let table = AdminTable::new(&data);

        let view = table.view(&Filter {
            region: Some(Region::Europa),
            ..Filter::default()
        });

        assert_eq!(3, view.count);
        assert_eq!("sooner", view.destinations[0].slug);
        assert_eq!("inactive-soon", view.destinations[2].slug);

        // the year selector still offers every year
        assert_eq!(vec![2025, 2026, 2027], view.years);
    }

    #[test]
    fn test_stats() {
        let data = table_data();

        assert_eq!(
            AdminStats {
                total: 5,
                active: 4,
                featured: 1,
                partner: 1,
            },
            AdminTable::new(&data).stats()
        );
    }
}
