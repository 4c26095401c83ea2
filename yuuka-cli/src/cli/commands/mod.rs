pub mod fetch;
pub mod pick;
