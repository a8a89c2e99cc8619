//! Tag index adapters.

mod yaml_tag_index;

pub use yaml_tag_index::YamlTagIndex;
