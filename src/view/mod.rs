//! In-memory query layer over a fetched plant collection.
//!
//! Everything here is a pure function of the records and an immutable
//! [`ViewState`]: filtering, sorting and paging never touch the network.

mod facets;
mod filter;
mod paginate;
mod sort;
mod state;

pub use facets::{recent, Facets};
pub use filter::{filter, Predicates};
pub use paginate::{clamp_page, page_slice, total_pages, DEFAULT_PAGE_SIZE};
pub use sort::{care_rank, compare, sort, SortDirection, SortKey};
pub use state::{render, SortSpec, ViewAction, ViewPage, ViewState};

use time::{macros::format_description, Date, OffsetDateTime, PrimitiveDateTime};

/// Reads a care date the way clients submit them: RFC 3339, a bare
/// `YYYY-MM-DD`, or a `YYYY-MM-DDTHH:MM` local timestamp (taken as UTC).
pub fn parse_care_date(raw: &str) -> Option<OffsetDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = OffsetDateTime::parse(raw, &time::format_description::well_known::Rfc3339) {
        return Some(dt);
    }
    if let Ok(d) = Date::parse(raw, format_description!("[year]-[month]-[day]")) {
        return Some(d.midnight().assume_utc());
    }
    PrimitiveDateTime::parse(raw, format_description!("[year]-[month]-[day]T[hour]:[minute]"))
        .ok()
        .map(PrimitiveDateTime::assume_utc)
}
