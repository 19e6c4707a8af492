pub mod rank;
pub mod stats;
pub mod member;
pub mod report;
pub mod error;

pub use rank::*;
pub use stats::*;
pub use member::*;
pub use report::*;
pub use error::*;
