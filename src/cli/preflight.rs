//! Pre-flight checks before expensive operations.
//!
//! This is the single place the API credential is read from the process
//! environment; everything downstream receives it as an explicit value.
//! Checking up front avoids failing midway through an ingest.

use crate::config::Credentials;
use crate::error::Result;

/// Read the API credential required for ingesting and answering.
pub fn credentials() -> Result<Credentials> {
    Credentials::from_env()
}
