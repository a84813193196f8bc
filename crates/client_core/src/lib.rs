//! Client-side building blocks view: catalog access, navigation and the
//! view-state controller that ties them together.

pub mod blocks;
pub mod catalog;
pub mod controller;
pub mod navigation;
pub mod table;

pub use blocks::BlocksClient;
pub use catalog::{CatalogClient, EntitySource};
pub use controller::{ViewController, ViewSnapshot, ViewState};
pub use navigation::{entity_name_from_path, entity_path, MemoryNavigator, Navigator};
pub use table::{EntityDetail, TablePage, TableQuery, TableRow};

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
