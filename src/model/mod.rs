// File: ./src/model/mod.rs
pub mod display;
pub mod item;
pub mod taxonomy;

pub use display::{ConferenceDisplay, countdown};
pub use item::{ConferenceInstance, DateField};
pub use taxonomy::{AreaEntry, OTHER_PARENT_AREA, ParentAreaEntry, TaxonomyIndex, TaxonomyRow};
