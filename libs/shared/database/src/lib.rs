pub mod d1;

pub use d1::{D1Client, ExecMeta, QueryResult, Statement};
