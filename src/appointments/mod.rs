pub mod builder;
pub mod locale;
pub mod models;
pub mod render;

pub use builder::build;
pub use locale::{DisplayZone, FormatContext, Locale};
pub use models::*;
