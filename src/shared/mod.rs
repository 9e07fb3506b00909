pub mod errors;
pub mod money;
pub mod shutdown;

pub use errors::*;
pub use money::{Money, ParseMoneyError};
pub use shutdown::*;
