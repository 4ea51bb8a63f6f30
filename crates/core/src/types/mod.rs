pub mod page_size;
