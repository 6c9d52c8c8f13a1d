//! 临时文件存储适配器

mod temp_file_store;

pub use temp_file_store::TempFileStore;
