pub mod catalog;
pub mod directive;

pub use catalog::{Catalog, PropertySpec, TaskCatalog, TaskConfig, TaskDefinition, TaskId, Wrapper};
pub use directive::{Directive, Properties, PropertyValue};
