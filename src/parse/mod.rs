pub mod tag_parser;

pub use tag_parser::{parse_tag_args, parse_tag_string};
