pub mod classify;
pub mod controller;
pub mod policy;

pub use classify::{classify_payload, PayloadClass};
pub use controller::{AttemptState, RetryController};
pub use policy::RetryPolicy;
