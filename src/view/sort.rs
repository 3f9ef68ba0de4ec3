use std::cmp::Ordering;

use time::OffsetDateTime;

use super::parse_care_date;
use crate::plants::Plant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Name,
    Category,
    WateringFrequency,
    CareLevel,
    NextWatering,
    AddedDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggle(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

impl SortKey {
    /// Direction used when a key is first selected: newest first for
    /// `AddedDate`, ascending otherwise.
    pub fn default_direction(self) -> SortDirection {
        match self {
            SortKey::AddedDate => SortDirection::Desc,
            _ => SortDirection::Asc,
        }
    }
}

/// easy < moderate < difficult; anything else ranks 0.
pub fn care_rank(level: Option<&str>) -> u8 {
    match level.map(str::to_ascii_lowercase).as_deref() {
        Some("easy") => 1,
        Some("moderate") => 2,
        Some("difficult") => 3,
        _ => 0,
    }
}

/// Case-folded comparison, lowercase first on ties.
fn collate(a: Option<&str>, b: Option<&str>) -> Ordering {
    let a = a.unwrap_or("");
    let b = b.unwrap_or("");
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
        .then_with(|| b.cmp(a))
}

fn watering_instant(plant: &Plant) -> OffsetDateTime {
    plant
        .next_watering
        .as_deref()
        .and_then(parse_care_date)
        .unwrap_or(OffsetDateTime::UNIX_EPOCH)
}

/// Ascending order of two records under `key`.
pub fn compare(a: &Plant, b: &Plant, key: SortKey) -> Ordering {
    match key {
        SortKey::Name => collate(a.name.as_deref(), b.name.as_deref()),
        SortKey::Category => collate(a.category.as_deref(), b.category.as_deref()),
        SortKey::WateringFrequency => collate(
            a.watering_frequency.as_deref(),
            b.watering_frequency.as_deref(),
        ),
        SortKey::CareLevel => {
            care_rank(a.care_level.as_deref()).cmp(&care_rank(b.care_level.as_deref()))
        }
        SortKey::NextWatering => watering_instant(a).cmp(&watering_instant(b)),
        SortKey::AddedDate => a.added_date.cmp(&b.added_date),
    }
}

/// Stable sort: records that compare equal keep their relative order in
/// either direction.
pub fn sort(records: &mut [&Plant], key: SortKey, direction: SortDirection) {
    match direction {
        SortDirection::Asc => records.sort_by(|a, b| compare(a, b, key)),
        SortDirection::Desc => records.sort_by(|a, b| compare(b, a, key)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::fixtures::{added_on, names, plant};
    use time::Month;

    fn with_care(name: &str, level: Option<&str>) -> Plant {
        let mut p = plant(name);
        p.care_level = level.map(str::to_string);
        p
    }

    #[test]
    fn name_sort_folds_case() {
        let records = vec![plant("cactus"), plant("Basil"), plant("aloe")];
        let mut view: Vec<&Plant> = records.iter().collect();
        sort(&mut view, SortKey::Name, SortDirection::Asc);
        assert_eq!(names(&view), vec!["aloe", "Basil", "cactus"]);
    }

    #[test]
    fn descending_is_reverse_of_ascending_for_distinct_keys() {
        let records = vec![plant("Mint"), plant("Fern"), plant("Zebra"), plant("Aloe")];
        let mut asc: Vec<&Plant> = records.iter().collect();
        let mut desc = asc.clone();
        sort(&mut asc, SortKey::Name, SortDirection::Asc);
        sort(&mut desc, SortKey::Name, SortDirection::Desc);
        asc.reverse();
        assert_eq!(names(&asc), names(&desc));
    }

    #[test]
    fn ties_keep_source_order_in_both_directions() {
        let mut first = plant("First");
        first.category = Some("indoor".into());
        let mut second = plant("Second");
        second.category = Some("indoor".into());
        let mut other = plant("Other");
        other.category = Some("herbs".into());
        let records = vec![first, other, second];

        let mut asc: Vec<&Plant> = records.iter().collect();
        sort(&mut asc, SortKey::Category, SortDirection::Asc);
        assert_eq!(names(&asc), vec!["Other", "First", "Second"]);

        let mut desc: Vec<&Plant> = records.iter().collect();
        sort(&mut desc, SortKey::Category, SortDirection::Desc);
        assert_eq!(names(&desc), vec!["First", "Second", "Other"]);
    }

    #[test]
    fn care_level_uses_ordinal_with_unknown_as_zero() {
        let records = vec![
            with_care("Orchid", Some("difficult")),
            with_care("Mystery", Some("tricky")),
            with_care("Aloe", Some("easy")),
            with_care("Fern", Some("Moderate")),
            with_care("Blank", None),
        ];
        let mut asc: Vec<&Plant> = records.iter().collect();
        sort(&mut asc, SortKey::CareLevel, SortDirection::Asc);
        assert_eq!(names(&asc), vec!["Mystery", "Blank", "Aloe", "Fern", "Orchid"]);

        let mut desc: Vec<&Plant> = records.iter().collect();
        sort(&mut desc, SortKey::CareLevel, SortDirection::Desc);
        assert_eq!(names(&desc), vec!["Orchid", "Fern", "Aloe", "Mystery", "Blank"]);
    }

    #[test]
    fn next_watering_treats_empty_as_epoch() {
        let mut soon = plant("Soon");
        soon.next_watering = Some("2024-05-02".into());
        let mut later = plant("Later");
        later.next_watering = Some("2024-06-10T09:00:00Z".into());
        let mut unset = plant("Unset");
        unset.next_watering = Some(String::new());
        let records = vec![later, unset, soon];

        let mut view: Vec<&Plant> = records.iter().collect();
        sort(&mut view, SortKey::NextWatering, SortDirection::Asc);
        assert_eq!(names(&view), vec!["Unset", "Soon", "Later"]);
    }

    #[test]
    fn added_date_defaults_to_newest_first() {
        assert_eq!(SortKey::AddedDate.default_direction(), SortDirection::Desc);
        assert_eq!(SortKey::Name.default_direction(), SortDirection::Asc);

        let records = vec![
            added_on(plant("Old"), 2022, Month::January, 1),
            added_on(plant("New"), 2024, Month::January, 1),
            added_on(plant("Mid"), 2023, Month::January, 1),
        ];
        let mut view: Vec<&Plant> = records.iter().collect();
        sort(&mut view, SortKey::AddedDate, SortKey::AddedDate.default_direction());
        assert_eq!(names(&view), vec!["New", "Mid", "Old"]);
    }

    #[test]
    fn toggle_flips_direction() {
        assert_eq!(SortDirection::Asc.toggle(), SortDirection::Desc);
        assert_eq!(SortDirection::Desc.toggle(), SortDirection::Asc);
    }
}
