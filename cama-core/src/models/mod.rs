mod adjustment;
mod assessment;
mod current_use;
mod feature;
mod land_line;
pub mod lenient;
mod reference_data;
mod zone;

pub use adjustment::{AdjustmentFactor, FactorKind};
pub use assessment::{CalculatedLandAssessment, CalculatedTotals, LandAssessment, PropertyContext};
pub use current_use::{CurrentUseCategory, LandTaxationCategory};
pub use feature::{ViewEntry, WaterfrontEntry};
pub use land_line::{CalculatedLandLine, LandLine, LineFactors, SizeUnit};
pub use reference_data::{AcreageDiscountSettings, ReferenceData};
pub use zone::{LadderTier, Zone};
