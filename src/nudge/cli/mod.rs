//! Terminal rendering. Everything that decides how results look lives here.

pub mod print;
