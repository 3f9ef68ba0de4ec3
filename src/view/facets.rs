use super::sort::{sort, SortDirection, SortKey};
use crate::plants::Plant;

/// Distinct values present in a collection, in first-seen order. These feed
/// the owner / watering / year filter choices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Facets {
    pub owners: Vec<String>,
    pub watering_frequencies: Vec<String>,
    pub added_years: Vec<i32>,
}

fn push_unique<T: PartialEq>(values: &mut Vec<T>, value: T) {
    if !values.contains(&value) {
        values.push(value);
    }
}

impl Facets {
    pub fn collect(records: &[Plant]) -> Self {
        let mut facets = Facets::default();
        for plant in records {
            if let Some(owner) = plant.user_name.as_deref().filter(|s| !s.is_empty()) {
                push_unique(&mut facets.owners, owner.to_string());
            }
            if let Some(freq) = plant.watering_frequency.as_deref().filter(|s| !s.is_empty()) {
                push_unique(&mut facets.watering_frequencies, freq.to_string());
            }
            push_unique(&mut facets.added_years, plant.added_date.year());
        }
        facets
    }
}

/// The `limit` most recently added records, newest first.
pub fn recent(records: &[Plant], limit: usize) -> Vec<&Plant> {
    let mut all: Vec<&Plant> = records.iter().collect();
    sort(&mut all, SortKey::AddedDate, SortDirection::Desc);
    all.truncate(limit);
    all
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::fixtures::{added_on, names, plant};
    use time::Month;

    #[test]
    fn facets_are_distinct_and_skip_blanks() {
        let mut a = added_on(plant("A"), 2023, Month::May, 1);
        a.user_name = Some("Ana".into());
        a.watering_frequency = Some("weekly".into());
        let mut b = added_on(plant("B"), 2024, Month::May, 1);
        b.user_name = Some("Ben".into());
        b.watering_frequency = Some(String::new());
        let mut c = added_on(plant("C"), 2023, Month::June, 1);
        c.user_name = Some("Ana".into());
        c.watering_frequency = Some("daily".into());

        let facets = Facets::collect(&[a, b, c]);
        assert_eq!(facets.owners, vec!["Ana", "Ben"]);
        assert_eq!(facets.watering_frequencies, vec!["weekly", "daily"]);
        assert_eq!(facets.added_years, vec![2023, 2024]);
    }

    #[test]
    fn recent_returns_newest_first_up_to_limit() {
        let records: Vec<Plant> = (1..=8u8)
            .map(|d| added_on(plant(&format!("Day {d}")), 2024, Month::March, d))
            .collect();
        let newest = recent(&records, 6);
        assert_eq!(
            names(&newest),
            vec!["Day 8", "Day 7", "Day 6", "Day 5", "Day 4", "Day 3"]
        );
        assert_eq!(recent(&records[..2], 6).len(), 2);
    }
}
