mod cohort;
mod document;
mod prd;
mod roadmap;
mod stickiness;
mod uat;
mod user;

pub use cohort::*;
pub use document::*;
pub use prd::*;
pub use roadmap::*;
pub use stickiness::*;
pub use uat::*;
pub use user::*;
