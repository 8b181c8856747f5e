use crate::config::load_config;
use crate::export::{CSV_FILE, PDF_FILE, PNG_FILE, SVG_FILE};
use crate::form::FormInput;
use crate::info::INFO_PAGE;
use crate::report::{Artifacts, generate};
use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "cpts", version, about = "Generate evenly spaced points on a circle")]
pub struct Args {
    /// Form values as JSON (file or '-' for stdin); flags override it
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Center X
    #[arg(long = "cx", allow_negative_numbers = true)]
    pub center_x: Option<f64>,

    /// Center Y
    #[arg(long = "cy", allow_negative_numbers = true)]
    pub center_y: Option<f64>,

    /// Radius (>= 0)
    #[arg(short = 'r', long = "radius", value_parser = parse_radius)]
    pub radius: Option<f64>,

    /// Number of points (3-500)
    #[arg(short = 'n', long = "points", value_parser = clap::value_parser!(u32).range(3..=500))]
    pub points: Option<u32>,

    /// Point color (#rrggbb)
    #[arg(long = "color")]
    pub color: Option<String>,

    /// Draw unconnected markers instead of a line
    #[arg(long = "no-line")]
    pub no_line: bool,

    /// Unit label
    #[arg(short = 'u', long = "unit", value_parser = ["m", "cm", "mm", "km"])]
    pub unit: Option<String>,

    /// Author name for the report cover
    #[arg(long = "name")]
    pub name: Option<String>,

    /// Contact for the report cover
    #[arg(long = "contact")]
    pub contact: Option<String>,

    /// Directory for points.csv, report.pdf and the chart
    #[arg(short = 'd', long = "out-dir")]
    pub out_dir: Option<PathBuf>,

    /// CSV output path
    #[arg(long = "csv")]
    pub csv: Option<PathBuf>,

    /// PDF output path
    #[arg(long = "pdf")]
    pub pdf: Option<PathBuf>,

    /// Chart output path (svg/png)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Chart output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON file (theme, chart and report settings)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Which view to show
    #[arg(long = "page", value_enum, default_value = "main")]
    pub page: Page,

    /// Do not print the coordinate table
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,

    /// Increase log verbosity
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Main,
    Info,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    run_with(args)
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    let _ = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(level)
        .try_init();
}

pub fn run_with(args: Args) -> Result<()> {
    if args.page == Page::Info {
        print!("{}", INFO_PAGE.to_text());
        return Ok(());
    }

    let config = load_config(args.config.as_deref())?;
    let base = match args.input.as_deref() {
        Some(path) => FormInput::from_json(&read_input(path)?)
            .with_context(|| format!("failed to parse form input {}", path.display()))?,
        None => FormInput::default(),
    };
    let form = base.merge(flag_overrides(&args));
    let (spec, meta) = form.collect()?;

    // Everything is built in memory first so a failure leaves no partial output.
    let artifacts = generate(&spec, &meta, &config)?;
    let chart_bytes = chart_bytes(&artifacts, args.output_format, &config)?;

    let out_dir = args.out_dir.clone().unwrap_or_else(|| PathBuf::from("."));
    if args.out_dir.is_some() {
        std::fs::create_dir_all(&out_dir)
            .with_context(|| format!("failed to create {}", out_dir.display()))?;
    }
    let chart_name = match args.output_format {
        OutputFormat::Svg => SVG_FILE.file_name,
        OutputFormat::Png => PNG_FILE.file_name,
    };
    let csv_path = resolve_output(args.csv.as_deref(), &out_dir, CSV_FILE.file_name);
    let pdf_path = resolve_output(args.pdf.as_deref(), &out_dir, PDF_FILE.file_name);
    let chart_path = resolve_output(args.output.as_deref(), &out_dir, chart_name);

    write_file(&csv_path, &artifacts.csv)?;
    write_file(&pdf_path, &artifacts.pdf)?;
    write_file(&chart_path, &chart_bytes)?;
    tracing::info!(
        csv = %csv_path.display(),
        pdf = %pdf_path.display(),
        chart = %chart_path.display(),
        "artifacts written"
    );

    if !args.quiet {
        print!("{}", artifacts.table.to_text());
    }
    Ok(())
}

fn flag_overrides(args: &Args) -> FormInput {
    FormInput {
        center_x: args.center_x,
        center_y: args.center_y,
        radius: args.radius,
        point_count: args.points.map(i64::from),
        color: args.color.clone(),
        connect_line: args.no_line.then_some(false),
        unit: args.unit.clone(),
        author_name: args.name.clone(),
        contact_info: args.contact.clone(),
    }
}

fn chart_bytes(artifacts: &Artifacts, format: OutputFormat, config: &crate::config::Config) -> Result<Vec<u8>> {
    match format {
        OutputFormat::Svg => Ok(artifacts.svg.clone().into_bytes()),
        #[cfg(feature = "png")]
        OutputFormat::Png => Ok(crate::render::rasterize_png(&artifacts.svg, &config.render)?),
        #[cfg(not(feature = "png"))]
        OutputFormat::Png => {
            let _ = config;
            Err(anyhow::anyhow!("PNG output requires the `png` feature"))
        }
    }
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn resolve_output(explicit: Option<&Path>, out_dir: &Path, default_name: &str) -> PathBuf {
    match explicit {
        Some(path) => path.to_path_buf(),
        None => out_dir.join(default_name),
    }
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display()))
}

fn parse_radius(raw: &str) -> std::result::Result<f64, String> {
    let value: f64 = raw.trim().parse().map_err(|_| format!("'{raw}' is not a number"))?;
    if !value.is_finite() || value < 0.0 {
        return Err(format!("radius must be a finite number >= 0, got {raw}"));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> std::result::Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("cpts").chain(argv.iter().copied()))
    }

    #[test]
    fn point_count_bounds_are_enforced() {
        assert!(parse(&["-n", "3"]).is_ok());
        assert!(parse(&["-n", "500"]).is_ok());
        assert!(parse(&["-n", "2"]).is_err());
        assert!(parse(&["-n", "501"]).is_err());
    }

    #[test]
    fn radius_must_be_non_negative() {
        assert!(parse(&["-r", "0"]).is_ok());
        assert!(parse(&["-r", "-1"]).is_err());
        assert!(parse(&["-r", "abc"]).is_err());
    }

    #[test]
    fn accepts_negative_centers_and_known_units() {
        let args = parse(&["--cx", "-3.5", "--cy", "-2", "-u", "km"]).unwrap();
        assert_eq!(args.center_x, Some(-3.5));
        assert_eq!(args.center_y, Some(-2.0));
        assert_eq!(args.unit.as_deref(), Some("km"));
        assert!(parse(&["-u", "ft"]).is_err());
    }

    #[test]
    fn flags_map_onto_form_fields() {
        let args = parse(&["--no-line", "-n", "12", "--name", "Ada"]).unwrap();
        let form = flag_overrides(&args);
        assert_eq!(form.connect_line, Some(false));
        assert_eq!(form.point_count, Some(12));
        assert_eq!(form.author_name.as_deref(), Some("Ada"));
        assert_eq!(form.radius, None);

        let connected = flag_overrides(&parse(&[]).unwrap());
        assert_eq!(connected.connect_line, None);
    }

    #[test]
    fn writes_all_artifacts_into_out_dir() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("run");
        let args = parse(&["-q", "-n", "8", "-d", out.to_str().unwrap()]).unwrap();
        run_with(args).unwrap();

        let csv = std::fs::read_to_string(out.join("points.csv")).unwrap();
        assert_eq!(csv.lines().count(), 9);
        assert!(std::fs::read(out.join("report.pdf")).unwrap().starts_with(b"%PDF"));
        assert!(std::fs::read_to_string(out.join("chart.svg")).unwrap().contains("<svg"));
    }

    #[test]
    fn explicit_paths_override_out_dir() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("coords.csv");
        let pdf = dir.path().join("summary.pdf");
        let svg = dir.path().join("circle.svg");
        let args = parse(&[
            "-q",
            "--csv",
            csv.to_str().unwrap(),
            "--pdf",
            pdf.to_str().unwrap(),
            "-o",
            svg.to_str().unwrap(),
        ])
        .unwrap();
        run_with(args).unwrap();
        assert!(csv.exists());
        assert!(pdf.exists());
        assert!(svg.exists());
    }

    #[test]
    fn form_file_is_overridden_by_flags() {
        let dir = tempfile::tempdir().unwrap();
        let form = dir.path().join("form.json");
        std::fs::write(&form, r#"{"pointCount": 5, "unit": "cm", "radius": 2}"#).unwrap();
        let args = parse(&[
            "-q",
            "-i",
            form.to_str().unwrap(),
            "-n",
            "6",
            "-d",
            dir.path().to_str().unwrap(),
        ])
        .unwrap();
        run_with(args).unwrap();
        let csv = std::fs::read_to_string(dir.path().join("points.csv")).unwrap();
        assert!(csv.starts_with("X (cm),Y (cm),angle_deg"));
        assert_eq!(csv.lines().count(), 7);
        assert!(csv.contains("2.000000,0.000000,0.000"));
    }

    #[test]
    fn info_page_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let args = parse(&["--page", "info", "-d", dir.path().to_str().unwrap()]).unwrap();
        run_with(args).unwrap();
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
