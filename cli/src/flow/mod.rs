pub mod flow_standard;
pub mod flow_tui;

pub use flow_standard::run_standard_flow;
pub use flow_tui::run_tui_flow;
