//! mrk-source
//!
//! Collaborator boundary for marketplace data: the paged-source contract, the
//! sale-completion contract, the wall clock, wire-page decoding, and the
//! pagination loop that turns a source into one merged sequence of canonical
//! records.
//!
//! It does **not** talk to the network. Transport, authentication and request
//! signing are supplied by whatever implements [`PagedSource`] or
//! [`SaleCompleter`].

mod clock;
mod completer;
mod directory;
mod paginator;
mod source;
pub mod wire;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;

pub use clock::{Clock, FixedClock, SystemClock};
pub use completer::{Acknowledgement, SaleCompleter};
pub use directory::{DirectoryOutbox, DirectorySource};
pub use paginator::{fetch_all, FetchOutcome, Termination};
pub use source::{Ack, FetchError, Page, PageQuery, PageRequest, PagedSource};
