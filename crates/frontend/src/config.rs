/// Formats selected on first load. Ids missing from the catalog are skipped.
pub const DEFAULT_FORMATS: &[&str] = &["ff-35mm", "4perf-s35", "gfx-eterna-og", "imax", "6x7"];
pub const DEFAULT_CIRCLES: &[&str] = &[];

/// Same-origin GraphQL endpoint served by the backend.
pub const GRAPHQL_PATH: &str = "/graphql";

pub const DIAGRAM_CONTAINER_ID: &str = "diagram-container";
pub const TOOLTIP_ID: &str = "tooltip";
