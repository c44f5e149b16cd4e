pub mod disbursement;
pub mod token;

pub use disbursement::*;
pub use token::*;
