//! Search and detail fetch cycles with last-request-wins cancellation.

mod detail;
mod request;
mod search;
mod types;

pub use detail::DetailLoader;
pub use request::{RequestSlot, RequestStamp};
pub use search::{search_error_message, SearchSession};
pub use types::*;
