pub mod json_file_adapter;
pub mod in_memory_adapter;
