//! Validator: per-entity invariant checks producing a [`Verdict`] per record.

mod validators;
mod verdict;

pub use validators::{
    BikeValidator, MaintenanceValidator, StationValidator, TripValidator, UserValidator,
    Validator,
};
pub use verdict::{Repair, Verdict};
