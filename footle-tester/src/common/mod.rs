pub mod util;

pub use util::{parse_date, split_csv};
