//! Two-variant result container and combinators for working with fallible
//! operations without panicking control flow.
//!
//! Build an [`Outcome`] through one of the guard functions around risky code,
//! chain transformations over the success or failure side, then resolve it
//! with an accessor or [`Outcome::fold`].

pub mod guard;
pub mod iter;
pub mod outcome;
pub mod stream;
pub mod testing;

pub use guard::{guard, guard_async, guard_async_with, guard_with};
pub use iter::{guard_iter, guard_iter_with, GuardedIter};
pub use outcome::Outcome;
pub use stream::{guard_stream, guard_stream_with, GuardedStream};
