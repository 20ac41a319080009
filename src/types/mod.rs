//! Data types shared by the layout, selection and editing engines.

mod column;
mod selection;
mod sort;
mod update;

pub use column::*;
pub use selection::*;
pub use sort::*;
pub use update::*;
