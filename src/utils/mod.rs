pub mod dates;
pub mod loose;
