//! A doubly linked list of type-erased, individually allocated elements.

mod item;
mod iter;
mod length;
mod list;
mod tests;

pub use iter::*;
pub(crate) use item::*;
pub(crate) use length::*;
pub use list::*;
