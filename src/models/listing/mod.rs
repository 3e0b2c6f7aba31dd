pub mod display;
pub mod raw;
pub mod transforms;

pub use display::DisplayItem;
pub use raw::{EventRecord, ItemKind, RawListing, SchoolPackage, SchoolRecord, TripRecord};
