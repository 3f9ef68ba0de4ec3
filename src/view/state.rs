use super::filter::{filter, Predicates};
use super::paginate::{clamp_page, page_slice, total_pages, DEFAULT_PAGE_SIZE};
use super::sort::{sort, SortDirection, SortKey};
use crate::plants::Plant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub key: SortKey,
    pub direction: SortDirection,
}

/// Filter, sort and page selections of a collection view. Never mutated in
/// place: [`ViewState::reduce`] returns the next state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub predicates: Predicates,
    /// `None` keeps the order the records were fetched in.
    pub sort: Option<SortSpec>,
    /// 1-based.
    pub page: usize,
    pub page_size: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            predicates: Predicates::default(),
            sort: None,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewAction {
    Search(String),
    Category(Option<String>),
    CareLevel(Option<String>),
    Owner(Option<String>),
    WateringFrequency(Option<String>),
    AddedYear(Option<i32>),
    ClearFilters,
    /// Select a key with its default direction.
    SortBy(SortKey),
    SetDirection(SortDirection),
    ToggleDirection,
    ClearSort,
    NextPage,
    PrevPage,
    GoToPage(usize),
}

/// Displayed slice of a collection.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewPage<'a> {
    pub items: Vec<&'a Plant>,
    /// Page actually shown, clamped into range.
    pub page: usize,
    pub total_pages: usize,
    pub total_matches: usize,
}

impl ViewState {
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            ..Self::default()
        }
    }

    /// Next state after `action`. Filter and sort changes go back to page 1;
    /// page moves are clamped into `[1, max(total_pages, 1)]`. A direction
    /// change without an active sort is a no-op.
    pub fn reduce(&self, action: ViewAction, total_pages: usize) -> ViewState {
        let mut next = self.clone();
        match action {
            ViewAction::Search(term) => next.predicates.search = Some(term),
            ViewAction::Category(v) => next.predicates.category = v,
            ViewAction::CareLevel(v) => next.predicates.care_level = v,
            ViewAction::Owner(v) => next.predicates.owner = v,
            ViewAction::WateringFrequency(v) => next.predicates.watering_frequency = v,
            ViewAction::AddedYear(v) => next.predicates.added_year = v,
            ViewAction::ClearFilters => next.predicates = Predicates::default(),
            ViewAction::SortBy(key) => {
                next.sort = Some(SortSpec {
                    key,
                    direction: key.default_direction(),
                })
            }
            ViewAction::SetDirection(_) | ViewAction::ToggleDirection if self.sort.is_none() => {
                return next;
            }
            ViewAction::SetDirection(direction) => {
                if let Some(spec) = next.sort.as_mut() {
                    spec.direction = direction;
                }
            }
            ViewAction::ToggleDirection => {
                if let Some(spec) = next.sort.as_mut() {
                    spec.direction = spec.direction.toggle();
                }
            }
            ViewAction::ClearSort => next.sort = None,
            ViewAction::NextPage => {
                next.page = clamp_page(self.page.saturating_add(1), total_pages);
                return next;
            }
            ViewAction::PrevPage => {
                next.page = clamp_page(self.page.saturating_sub(1), total_pages);
                return next;
            }
            ViewAction::GoToPage(page) => {
                next.page = clamp_page(page, total_pages);
                return next;
            }
        }
        next.page = 1;
        next
    }
}

/// Filters, sorts and pages `records` according to `state`.
pub fn render<'a>(records: &'a [Plant], state: &ViewState) -> ViewPage<'a> {
    let mut matches = filter(records, &state.predicates);
    if let Some(spec) = state.sort {
        sort(&mut matches, spec.key, spec.direction);
    }
    let total_matches = matches.len();
    let total_pages = total_pages(total_matches, state.page_size);
    let page = clamp_page(state.page, total_pages);
    let items = page_slice(&matches, page, state.page_size).to_vec();
    ViewPage {
        items,
        page,
        total_pages,
        total_matches,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::fixtures::{names, plant};

    fn numbered(n: usize) -> Vec<Plant> {
        (1..=n).map(|i| plant(&format!("Plant {i:02}"))).collect()
    }

    #[test]
    fn default_state_shows_first_page_in_source_order() {
        let records = numbered(16);
        let view = render(&records, &ViewState::default());
        assert_eq!(view.items.len(), 15);
        assert_eq!(view.page, 1);
        assert_eq!(view.total_pages, 2);
        assert_eq!(view.total_matches, 16);
        assert_eq!(view.items[0].name.as_deref(), Some("Plant 01"));
    }

    #[test]
    fn navigation_clamps_at_both_ends() {
        let state = ViewState::default();
        let back = state.reduce(ViewAction::PrevPage, 2);
        assert_eq!(back.page, 1);

        let fwd = state.reduce(ViewAction::NextPage, 2);
        assert_eq!(fwd.page, 2);
        assert_eq!(fwd.reduce(ViewAction::NextPage, 2).page, 2);
        assert_eq!(state.reduce(ViewAction::GoToPage(40), 2).page, 2);
        assert_eq!(state.reduce(ViewAction::GoToPage(0), 2).page, 1);
    }

    #[test]
    fn filter_and_sort_changes_reset_page() {
        let on_page_two = ViewState::default().reduce(ViewAction::GoToPage(2), 3);
        assert_eq!(on_page_two.page, 2);

        for action in [
            ViewAction::Search("fern".into()),
            ViewAction::Category(Some("indoor".into())),
            ViewAction::AddedYear(Some(2024)),
            ViewAction::SortBy(SortKey::Name),
            ViewAction::ClearFilters,
        ] {
            assert_eq!(on_page_two.reduce(action, 3).page, 1);
        }

        let sorted_on_page_two = on_page_two
            .reduce(ViewAction::SortBy(SortKey::Name), 3)
            .reduce(ViewAction::GoToPage(2), 3);
        assert_eq!(sorted_on_page_two.page, 2);
        assert_eq!(sorted_on_page_two.reduce(ViewAction::ToggleDirection, 3).page, 1);
    }

    #[test]
    fn direction_change_without_sort_keeps_page() {
        let on_page_two = ViewState::default().reduce(ViewAction::GoToPage(2), 3);
        for action in [
            ViewAction::ToggleDirection,
            ViewAction::SetDirection(SortDirection::Desc),
        ] {
            assert_eq!(on_page_two.reduce(action, 3), on_page_two);
        }
    }

    #[test]
    fn reduce_leaves_previous_state_untouched() {
        let state = ViewState::default();
        let next = state.reduce(ViewAction::Owner(Some("Ana".into())), 1);
        assert_eq!(state.predicates.owner, None);
        assert_eq!(next.predicates.owner.as_deref(), Some("Ana"));
    }

    #[test]
    fn sort_by_uses_key_default_then_toggles() {
        let state = ViewState::default().reduce(ViewAction::SortBy(SortKey::AddedDate), 1);
        assert_eq!(
            state.sort,
            Some(SortSpec {
                key: SortKey::AddedDate,
                direction: SortDirection::Desc
            })
        );
        let toggled = state.reduce(ViewAction::ToggleDirection, 1);
        assert_eq!(toggled.sort.unwrap().direction, SortDirection::Asc);
        assert_eq!(toggled.reduce(ViewAction::ClearSort, 1).sort, None);
    }

    #[test]
    fn render_sorts_before_paging() {
        let records = numbered(16);
        let state = ViewState::default()
            .reduce(ViewAction::SortBy(SortKey::Name), 2)
            .reduce(ViewAction::SetDirection(SortDirection::Desc), 2);
        let view = render(&records, &state);
        assert_eq!(view.items[0].name.as_deref(), Some("Plant 16"));

        let last = render(&records, &state.reduce(ViewAction::NextPage, view.total_pages));
        assert_eq!(names(&last.items), vec!["Plant 01"]);
    }

    #[test]
    fn stale_page_is_clamped_when_matches_shrink() {
        let records = numbered(16);
        let state = ViewState {
            page: 2,
            ..ViewState::default()
        };
        let narrowed = ViewState {
            predicates: Predicates {
                search: Some("Plant 0".into()),
                ..Default::default()
            },
            ..state
        };
        let view = render(&records, &narrowed);
        assert_eq!(view.page, 1);
        assert_eq!(view.total_matches, 9);
    }

    #[test]
    fn empty_collection_renders_single_empty_page() {
        let view = render(&[], &ViewState::default());
        assert!(view.items.is_empty());
        assert_eq!(view.page, 1);
        assert_eq!(view.total_pages, 0);
    }

    #[test]
    fn custom_page_size() {
        let records = numbered(10);
        let view = render(&records, &ViewState::with_page_size(4));
        assert_eq!(view.total_pages, 3);
        assert_eq!(view.items.len(), 4);
    }
}
