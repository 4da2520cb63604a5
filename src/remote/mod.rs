//! Remote record service used for email lookups and submissions

mod client;
mod traits;

pub use client::RecordClient;
pub use traits::RecordServiceTrait;

#[cfg(test)]
pub use traits::MockRecordServiceTrait;
