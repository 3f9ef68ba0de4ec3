//! Client side of the plant service: a typed API over the HTTP routes, a
//! loaded collection with local filter/sort/paging, and the create, edit and
//! delete flows.

mod api;
mod collection;
mod mutations;

pub use api::{ClientError, HttpApi, PlantApi};
pub use collection::{CollectionView, LoadState, Scope};
pub use mutations::{
    request_delete, CreateForm, EditForm, EditOutcome, Notice, NoticeLevel, Owner, PendingDelete,
};
