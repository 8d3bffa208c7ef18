//! Service layer for business logic
//!
//! Synchronous operations over a session's record store, shared by the HTML
//! pages and the JSON API.

pub mod redirect;
pub mod shortening_form;
pub mod statistics;
pub mod validator;

pub use redirect::{RedirectOutcome, resolve, resolve_link};
pub use shortening_form::{
    InputRow, NO_VALID_URL_MESSAGE, RejectedRow, RowField, ShortenForm, SubmitOutcome,
    parse_validity,
};
pub use statistics::{LinkStats, Statistics, StatisticsSummary};
pub use validator::{ValidationError, validate_row};
