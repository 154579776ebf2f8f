pub mod admin;
pub mod candidate;
pub mod ledger;
pub mod status;

pub use candidate::Candidate;
pub use status::{CandidateStatus, EvalStatus, FormStatus, HiringStatus};
