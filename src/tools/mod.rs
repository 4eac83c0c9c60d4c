//! Small calculators that back the utility pages.

pub mod age;
pub mod text;
