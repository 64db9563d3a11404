//! Session client for the YNAB v1 API.
//!
//! The session is a thin veneer over the vendor's REST endpoints: it holds
//! the credential artifacts derived from a personal access token and turns
//! each operation into one HTTP request with a fixed status check. Payload
//! shapes and their construction helpers live in [`ynab_types`]; error
//! handling is two-tier (see [`ApiError::is_fatal`]) and the library never
//! terminates the process. Callers decide when a failure is the end.

mod error;
mod session;

pub use error::ApiError;
pub use session::{BudgetSession, TransactionPayload, find_account_id};
