// State management module.
// Loading state, collection paging, and global content views for page consumers.

pub mod collection;
pub mod global;
pub mod loading;

pub use collection::{CollectionPager, PagerConfig};
pub use global::GlobalView;
pub use loading::LoadingState;
