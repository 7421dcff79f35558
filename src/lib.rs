pub mod error;
pub mod varint;
pub mod tag;
pub mod frame;
pub mod header;
pub mod registry;
pub mod entity;
pub mod debug;

pub use error::{Result, SioError};
pub use tag::{Kind, Tag, is_valid_tag, tag_name};
pub use varint::{read_length, write_length, MAX_LENGTH};
pub use frame::{read_frame, write_frame, encode_frame};
pub use header::{SioType, read_header, write_header, SIGNATURE};
pub use registry::{TypeRegistry, TypeResolver};
pub use entity::{Container, Decomposition, SioFile, decompose};
pub use debug::{Node, FileTree, WalkOptions, walk, walk_file};
