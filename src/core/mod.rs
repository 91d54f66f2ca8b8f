/// Catalog entities handed to the generator
pub mod model;

/// Extension point supplying shop data
pub mod provider;

/// Handles for the open list elements
pub mod section;

/// Document assembly and output handling
pub mod generator;
