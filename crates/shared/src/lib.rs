pub mod catalog;
pub mod controls;
pub mod coordinator;
pub mod diagram;
pub mod error;
pub mod geometry;
pub mod models;
pub mod selection;
pub mod svg;
pub mod table;
pub mod tooltip;

pub use catalog::Catalog;
pub use coordinator::{Coordinator, RenderPass, UiEvent};
pub use error::CatalogError;
pub use models::EntityRef;
pub use selection::SelectionState;
