//! Python parsing and class model extraction

pub mod builder;
pub mod local;
pub mod parser_pool;
pub mod syntax;


pub use builder::ClassModelBuilder;
pub use local::{analyze_source, analyze_tree, Analysis, LocalSource};
pub use parser_pool::{create_parser_pool, FileType, ParseRequest, ParseResult, ParserPool};
pub use syntax::{parse_python, SyntaxKind};
