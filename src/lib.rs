pub mod chart;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod form;
pub mod info;
pub mod pdf;
pub mod points;
pub mod render;
pub mod report;
pub mod table;
pub mod text;
pub mod theme;

pub use chart::{Chart, build_chart};
#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{ChartConfig, Config, ReportConfig, load_config, parse_config};
pub use error::{Error, Result};
pub use export::{CSV_FILE, PDF_FILE, export_csv};
pub use form::{CircleSpec, Color, FormInput, ReportMeta, Unit};
pub use pdf::export_pdf;
pub use points::{PointRecord, generate_points};
pub use render::render_svg;
pub use report::{Artifacts, generate};
pub use table::PointTable;
pub use theme::Theme;
