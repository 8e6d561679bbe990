//! Voice-campaign retry: request validation, the retry client and
//! response interpretation.

mod client;
pub mod error;
mod request;
mod response;
pub mod validate;

pub use client::{DEFAULT_TIMEOUT, RETRY_PATH, RetryClient, RetryFailedCalls};
pub use error::{
    FALLBACK_MESSAGE, Field, FieldViolation, RetryError, ValidationError, ViolationKind,
};
pub use request::{RetryRequest, RetryResult};
pub use response::{SERVER_ERROR_THRESHOLD, interpret};

#[cfg(test)]
pub use client::MockRetryFailedCalls;
