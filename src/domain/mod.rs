//! Core domain models for autobump
//!
//! This module contains the fundamental types used throughout the
//! application:
//! - Update proposals parsed from input lines
//! - Publish decision results with skip reasons
//! - Run summary structures

mod proposal;
mod publish_result;
mod summary;

pub use proposal::UpdateProposal;
pub use publish_result::{PublishOutcome, SkipReason};
pub use summary::RunSummary;
