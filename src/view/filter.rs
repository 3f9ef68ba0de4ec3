use crate::plants::Plant;

/// Active filter selections. `None` or an empty string disables a predicate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Predicates {
    /// Case-insensitive substring of name or description.
    pub search: Option<String>,
    pub category: Option<String>,
    pub care_level: Option<String>,
    /// Owner display name (`userName`).
    pub owner: Option<String>,
    pub watering_frequency: Option<String>,
    /// Calendar year of `addedDate`.
    pub added_year: Option<i32>,
}

fn active(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn equals(predicate: &Option<String>, value: &Option<String>) -> bool {
    match active(predicate) {
        Some(wanted) => value.as_deref() == Some(wanted),
        None => true,
    }
}

fn contains_folded(haystack: Option<&str>, needle: &str) -> bool {
    haystack
        .map(|h| h.to_lowercase().contains(needle))
        .unwrap_or(false)
}

impl Predicates {
    pub fn is_empty(&self) -> bool {
        active(&self.search).is_none()
            && active(&self.category).is_none()
            && active(&self.care_level).is_none()
            && active(&self.owner).is_none()
            && active(&self.watering_frequency).is_none()
            && self.added_year.is_none()
    }

    pub fn matches(&self, plant: &Plant) -> bool {
        if let Some(term) = active(&self.search) {
            let term = term.to_lowercase();
            if !contains_folded(plant.name.as_deref(), &term)
                && !contains_folded(plant.description.as_deref(), &term)
            {
                return false;
            }
        }
        if let Some(year) = self.added_year {
            if plant.added_date.year() != year {
                return false;
            }
        }
        equals(&self.category, &plant.category)
            && equals(&self.care_level, &plant.care_level)
            && equals(&self.owner, &plant.user_name)
            && equals(&self.watering_frequency, &plant.watering_frequency)
    }
}

/// Records passing every active predicate, in source order.
pub fn filter<'a>(records: &'a [Plant], predicates: &Predicates) -> Vec<&'a Plant> {
    records.iter().filter(|p| predicates.matches(p)).collect()
}
