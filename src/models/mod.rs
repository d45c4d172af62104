//! Data models for placescout.

mod place;

pub use place::{Availability, Place, NO_INTRODUCTION};
