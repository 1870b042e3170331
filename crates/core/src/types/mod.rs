pub mod output_format;
pub mod print_mode;

pub use output_format::OutputFormat;
pub use print_mode::ConfigPrintMode;
