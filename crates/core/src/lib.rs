#![forbid(unsafe_code)]

pub mod bank;
pub mod error;
pub mod model;
pub mod tickets;

pub use bank::{BankError, QuestionBank, RecordRejection, validate_record};
pub use error::Error;
