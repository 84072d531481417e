pub use list::*;
pub use track::*;

mod list;
mod track;
