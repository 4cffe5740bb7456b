pub mod extractor;
pub mod json;
pub mod jwt;
pub mod sql;
pub mod test_utils;
