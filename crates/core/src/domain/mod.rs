pub mod auth;
pub mod changes;
pub mod filter;
pub mod pager;
pub mod search;
pub mod sort;
pub mod tag_cloud;
