pub mod fetch;
pub mod history;
pub mod layout;
pub mod process;
pub mod store;
