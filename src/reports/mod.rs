mod tables;

pub use self::tables::{outcome as print_outcome, pairs as print_pair_table};
