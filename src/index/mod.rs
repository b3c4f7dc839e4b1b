//! Persistent URL→filename index

mod store;

pub use store::{
    DELIMITER, INDEX_FILENAME, Index, IndexError, IndexResult, IndexStore, MalformedRecord,
    parse_record,
};
