pub mod reader;
pub mod values;

pub use reader::{decode_source, RawRow, RowParser, Rows};
pub use values::{parse_date, parse_decimal, parse_int, parse_optional_int};
