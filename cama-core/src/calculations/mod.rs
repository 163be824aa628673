//! Land valuation calculations.
//!
//! This module provides the pricing rules that turn land lines into
//! assessed values, organized by the stage of the valuation each performs.

pub mod acreage_discount;
pub mod calculator;
pub mod common;
pub mod current_use;
pub mod factors;
pub mod ladder;
pub mod totals;

pub use acreage_discount::{AcreageDiscountCurve, AppliedDiscount};
pub use calculator::{LandLineError, LandValuationCalculator, accumulated_after, effective_acreage};
pub use current_use::{CurrentUseValuation, value_current_use};
pub use factors::{FactorResolver, condition_factor};
pub use ladder::{LadderCurve, MonotoneCurve};
pub use totals::aggregate_totals;
