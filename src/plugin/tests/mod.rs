//! Plugin tests

mod utils;
