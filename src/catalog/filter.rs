//! Destination filtering

use crate::destinations::Destination;
use crate::destinations::Region;

/// Constraints on a destination collection
///
/// Absent fields do not constrain anything, present fields are combined with AND
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Filter {
    /// Case-insensitive part of the title
    pub search: Option<String>,

    /// Exact region
    pub region: Option<Region>,

    /// Exact year
    pub year: Option<i32>,

    /// Month name, only its first three letters are compared against the departure date
    pub month: Option<String>,
}

impl Filter {
    /// Is a region selected?
    pub fn has_region(&self) -> bool {
        self.region.is_some()
    }

    /// Does the destination satisfy every constraint?
    pub fn matches(&self, destination: &Destination) -> bool {
        self.matches_search(destination)
            && self.matches_region(destination)
            && self.matches_year(destination)
            && self.matches_month(destination)
    }

    /// Matching destinations, in their original order
    pub fn apply<'a, I>(&self, destinations: I) -> Vec<&'a Destination>
    where
        I: IntoIterator<Item = &'a Destination>,
    {
        destinations
            .into_iter()
            .filter(|destination| self.matches(destination))
            .collect()
    }

    fn matches_search(&self, destination: &Destination) -> bool {
        match self.search.as_deref() {
            Some(search) if !search.trim().is_empty() => destination
                .title
                .to_lowercase()
                .contains(&search.to_lowercase()),
            _ => true,
        }
    }

    fn matches_region(&self, destination: &Destination) -> bool {
        self.region.is_none_or(|region| destination.region == region)
    }

    fn matches_year(&self, destination: &Destination) -> bool {
        self.year.is_none_or(|year| destination.year == year)
    }

    fn matches_month(&self, destination: &Destination) -> bool {
        match self.month.as_deref() {
            Some(month) if !month.is_empty() => {
                let key = month.to_lowercase().chars().take(3).collect::<String>();

                destination
                    .departure_label()
                    .to_lowercase()
                    .contains(key.as_str())
            }
            _ => true,
        }
    }
}
