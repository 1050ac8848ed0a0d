pub mod control_panel;
pub mod detail_table;
pub mod diagram_view;
pub mod reference_panel;
pub mod tooltip;
