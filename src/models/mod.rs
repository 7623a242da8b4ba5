pub mod trial;
pub mod verdict;

pub use trial::{Operator, Trial, TrialGenerator};
pub use verdict::{ClassLabel, ClassificationOutcome, SessionReport, Verdict};
