pub mod mention;
pub mod competitive;
pub mod grade;

pub use mention::*;
pub use competitive::*;
pub use grade::*;
