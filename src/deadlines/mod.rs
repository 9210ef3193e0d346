pub mod drag;
pub mod list;
pub mod status;
pub mod store;

pub use drag::{DragReorder, NodeBox};
pub use list::{build_rows, DeadlineRow};
pub use status::UrgencyTier;
pub use store::{DeadlineStore, StoreError};
