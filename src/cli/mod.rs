//! Command-line entry point and interactive menu.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};

use crate::config::InspectorConfig;
use crate::core::loaders;
use crate::core::point::Point;
use crate::core::writers;
use crate::processors::analysis::{self, BoundingCube, Sphere};
use crate::processors::catalog::{self, CatalogScan};

#[derive(Parser)]
#[command(name = "pointset-inspector")]
#[command(about = "Validate and analyze .pt point set files", version)]
pub struct Cli {
    /// Path to YAML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding the point files (overrides the config file)
    #[arg(short, long)]
    directory: Option<PathBuf>,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Menu entries, keyed by the number the user types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    ListFiles,
    CheckSuitability,
    ClosestAndFarthest,
    CubeCorners,
    SphereQuery,
    AverageDistance,
    Exit,
}

impl MenuChoice {
    /// Maps a typed number to its entry.
    pub fn from_number(n: u32) -> Option<Self> {
        match n {
            0 => Some(MenuChoice::ListFiles),
            1 => Some(MenuChoice::CheckSuitability),
            2 => Some(MenuChoice::ClosestAndFarthest),
            3 => Some(MenuChoice::CubeCorners),
            4 => Some(MenuChoice::SphereQuery),
            5 => Some(MenuChoice::AverageDistance),
            9 => Some(MenuChoice::Exit),
            _ => None,
        }
    }
}

const MENU_TEXT: &str = "Menu:\n\
0. List files present\n\
1. Check if point files are suitable in format\n\
2. Check the closest and farthest two points in each file\n\
3. Identify corner points of the smallest cube for all points\n\
4. Specify sphere and find points within sphere\n\
5. Calculate average distance between points\n\
9. Exit\n\
Enter your choice: ";

/// Create a spinner for indeterminate operations
fn create_spinner(message: &str, enabled: bool) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Write a summary box
fn write_summary<W: Write>(out: &mut W, title: &str, items: &[(&str, String)]) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "╔══════════════════════════════════════════════════════════════╗")?;
    writeln!(out, "║ {:<60} ║", title)?;
    writeln!(out, "╠══════════════════════════════════════════════════════════════╣")?;
    for (key, value) in items {
        let display_value = if value.chars().count() > 37 {
            format!("{}...", value.chars().take(34).collect::<String>())
        } else {
            value.clone()
        };
        writeln!(out, "║ {:<20}: {:<37} ║", key, display_value)?;
    }
    writeln!(out, "╚══════════════════════════════════════════════════════════════╝")?;
    writeln!(out)
}

/// Interactive menu session over arbitrary input and output streams.
///
/// Every action rescans the configured directory; nothing is cached between
/// selections.
pub struct Menu<R, W> {
    input: R,
    output: W,
    config: InspectorConfig,
    progress: bool,
}

impl<R: BufRead, W: Write> Menu<R, W> {
    pub fn new(input: R, output: W, config: InspectorConfig) -> Self {
        Self {
            input,
            output,
            config,
            progress: false,
        }
    }

    /// Show a spinner on stderr while files are scanned.
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    /// Consumes the session and returns the output sink.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Runs until the user exits, declines the menu, or input ends.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            write!(self.output, "{}", MENU_TEXT)?;
            self.output.flush()?;

            let Some(line) = self.read_line()? else {
                return Ok(());
            };

            let choice = line.trim().parse::<u32>().ok().and_then(MenuChoice::from_number);
            match choice {
                None => {
                    writeln!(self.output, "Invalid choice. Please try again.")?;
                    continue;
                }
                Some(MenuChoice::Exit) => {
                    writeln!(self.output, "Exiting the program.")?;
                    return Ok(());
                }
                Some(action) => self.dispatch(action)?,
            }

            if !self.prompt_repeat()? {
                return Ok(());
            }
        }
    }

    fn dispatch(&mut self, choice: MenuChoice) -> io::Result<()> {
        info!("Menu action: {:?}", choice);
        match choice {
            MenuChoice::ListFiles => self.list_files(),
            MenuChoice::CheckSuitability => self.check_suitability(),
            MenuChoice::ClosestAndFarthest => self.closest_and_farthest(),
            MenuChoice::CubeCorners => self.cube_corners(),
            MenuChoice::SphereQuery => self.sphere_query(),
            MenuChoice::AverageDistance => self.average_distance(),
            MenuChoice::Exit => Ok(()),
        }
    }

    /// Undecodable input is replaced rather than failing the session, so it
    /// reaches the usual invalid-input handling.
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut raw = Vec::new();
        if self.input.read_until(b'\n', &mut raw)? == 0 {
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&raw).into_owned()))
    }

    fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;
        self.read_line()
    }

    fn prompt_repeat(&mut self) -> io::Result<bool> {
        let answer = self.prompt("\nWould you like to see the menu again? (y/n): ")?;
        Ok(answer.is_some_and(|a| a.trim_start().starts_with(['y', 'Y'])))
    }

    fn list_files(&mut self) -> io::Result<()> {
        match catalog::list_entries(&self.config.catalog.directory) {
            Ok(names) => {
                for name in names {
                    writeln!(self.output, "{}", name)?;
                }
            }
            Err(e) => writeln!(self.output, "Error: {}", e)?,
        }
        Ok(())
    }

    /// Scans the directory, reporting each file, and prints the overall verdict.
    fn check_suitability(&mut self) -> io::Result<()> {
        let start = Instant::now();
        let dir = self.config.catalog.directory.clone();

        let spinner = create_spinner("Validating point files...", self.progress);
        let result = catalog::scan(&dir, &self.config.catalog.extension);
        spinner.finish_and_clear();

        let scan = match result {
            Ok(scan) => scan,
            Err(e) => {
                writeln!(self.output, "Error: {}", e)?;
                return writeln!(self.output, "Point files are not suitable in format.");
            }
        };

        for file in &scan.suitable {
            writeln!(self.output, "File {} is suitable.", file.name())?;
        }
        for rejection in &scan.rejected {
            writeln!(self.output, "Error: {}", rejection)?;
        }

        if scan.all_suitable() {
            writeln!(self.output, "Point files are suitable in format.")?;
        } else {
            writeln!(self.output, "Point files are not suitable in format.")?;
        }

        write_summary(
            &mut self.output,
            "Validation Complete",
            &[
                ("Directory", dir.display().to_string()),
                ("Suitable files", scan.suitable.len().to_string()),
                ("Rejected entries", scan.rejected.len().to_string()),
                ("Duration", format!("{:.2?}", start.elapsed())),
            ],
        )
    }

    /// Loads the current suitable set, reporting every rejected entry.
    ///
    /// An unreadable directory yields an empty scan.
    fn load_suitable(&mut self) -> io::Result<CatalogScan> {
        let spinner = create_spinner("Loading point files...", self.progress);
        let result = catalog::scan(
            &self.config.catalog.directory,
            &self.config.catalog.extension,
        );
        spinner.finish_and_clear();

        let scan = match result {
            Ok(scan) => scan,
            Err(e) => {
                writeln!(self.output, "Error: {}", e)?;
                return Ok(CatalogScan::default());
            }
        };

        for rejection in &scan.rejected {
            writeln!(self.output, "Skipping: {}", rejection)?;
        }
        if scan.suitable.is_empty() {
            writeln!(self.output, "No suitable point files found.")?;
        }

        Ok(scan)
    }

    fn closest_and_farthest(&mut self) -> io::Result<()> {
        let scan = self.load_suitable()?;
        if scan.suitable.is_empty() {
            return Ok(());
        }

        let extremes = analysis::closest_and_farthest(scan.point_sets());
        writers::write_pair_extremes(
            &mut self.output,
            extremes.as_ref(),
            self.config.report.precision,
        )
    }

    fn cube_corners(&mut self) -> io::Result<()> {
        let precision = self.config.report.precision;
        for file in self.load_suitable()?.suitable {
            let cube = BoundingCube::from_points(&file.points);
            writers::write_cube_corners(&mut self.output, &file.name(), cube.as_ref(), precision)?;
        }
        Ok(())
    }

    fn sphere_query(&mut self) -> io::Result<()> {
        let files = self.load_suitable()?.suitable;
        if files.is_empty() {
            return Ok(());
        }

        let Some(center) = self.prompt_center()? else {
            return Ok(());
        };
        let Some(diameter) = self.prompt_diameter()? else {
            return Ok(());
        };
        let sphere = Sphere::from_diameter(center, diameter);

        let precision = self.config.report.precision;
        for file in &files {
            let hits = analysis::points_in_sphere(&file.points, &sphere);
            writers::write_sphere_hits(&mut self.output, &file.name(), &hits, precision)?;
        }
        Ok(())
    }

    fn prompt_center(&mut self) -> io::Result<Option<Point>> {
        loop {
            let Some(line) = self.prompt("Enter sphere center (x y z): ")? else {
                return Ok(None);
            };
            match loaders::parse_point_line(&line) {
                Some(center) => return Ok(Some(center)),
                None => writeln!(self.output, "Invalid center, expected three numbers.")?,
            }
        }
    }

    fn prompt_diameter(&mut self) -> io::Result<Option<f64>> {
        loop {
            let Some(line) = self.prompt("Enter sphere diameter: ")? else {
                return Ok(None);
            };
            match line.trim().parse::<f64>() {
                Ok(d) if d.is_finite() && d >= 0.0 => return Ok(Some(d)),
                _ => writeln!(self.output, "Invalid diameter, expected a non-negative number.")?,
            }
        }
    }

    fn average_distance(&mut self) -> io::Result<()> {
        let precision = self.config.report.precision;
        for file in self.load_suitable()?.suitable {
            let average = analysis::average_distance(&file.points);
            writers::write_average_distance(&mut self.output, &file.name(), average, precision)?;
        }
        Ok(())
    }
}

pub fn run() {
    let cli = Cli::parse();

    // Initialize logging based on verbosity (must come first)
    env_logger::Builder::new()
        .filter_level(match cli.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        })
        .format_timestamp_secs()
        .init();

    let mut config = match &cli.config {
        Some(path) => match InspectorConfig::from_yaml(path) {
            Ok(cfg) => {
                info!("Loaded config from: {}", path.display());
                cfg
            }
            Err(e) => {
                warn!("{:#}, using defaults", e);
                InspectorConfig::default()
            }
        },
        None => InspectorConfig::default(),
    };

    if let Some(directory) = cli.directory {
        config.catalog.directory = directory;
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut menu = Menu::new(stdin.lock(), stdout.lock(), config).with_progress(true);

    if let Err(e) = menu.run() {
        error!("Console I/O failed: {}", e);
        std::process::exit(1);
    }
}
