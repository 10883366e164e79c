//! Plain data carried through the catalog: stored records, request payloads and
//! the views handed back to callers.

pub mod cart;
pub mod product;

pub use cart::*;
pub use product::*;
