//! Properties of relational operators.
//!
//! [`LogicalProperty`] holds facts shared by logically equivalent plans, currently the ordered
//! output slots. It is derived bottom up, and plans that still reference raw names derive the
//! [`LogicalProperty::Unbound`] sentinel instead.

mod logical;
pub use logical::*;
