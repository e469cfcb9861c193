use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
/// Trajectory Plot - Render GPX trajectories as SVG figures or on an interactive map
pub struct Settings {
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Draw the trajectories into an SVG figure
    Static {
        /// GPX files to plot, one trajectory per track
        #[clap(required = true, value_name = "FILE")]
        files: Vec<PathBuf>,

        /// Output SVG file
        #[clap(short, long, default_value = "trajectories.svg")]
        output: PathBuf,

        /// Styling option as key=value, e.g. `-O column=speed -O figsize=8,6`
        #[clap(short = 'O', long = "option", value_name = "KEY=VALUE")]
        options: Vec<String>,
    },

    /// Show the trajectories on a slippy map
    Interactive {
        /// GPX files to plot, one trajectory per track
        #[clap(required = true, value_name = "FILE")]
        files: Vec<PathBuf>,

        /// Also write the rendered overlay as JSON
        #[clap(short, long, value_name = "FILE")]
        export: Option<PathBuf>,

        /// Only export the overlay, without opening a window
        #[clap(long, default_value = "false", requires = "export")]
        headless: bool,

        /// Styling option as key=value, e.g. `-O column=speed -O tiles=otm`
        #[clap(short = 'O', long = "option", value_name = "KEY=VALUE")]
        options: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_consistent() {
        Settings::command().debug_assert();
    }

    #[test]
    fn test_parse_static() {
        let settings = Settings::try_parse_from([
            "trajectory-plot",
            "static",
            "a.gpx",
            "b.gpx",
            "-o",
            "out.svg",
            "-O",
            "column=speed",
        ])
        .unwrap();
        match settings.command {
            Command::Static {
                files,
                output,
                options,
            } => {
                assert_eq!(files.len(), 2);
                assert_eq!(output, PathBuf::from("out.svg"));
                assert_eq!(options, vec!["column=speed"]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_headless_requires_export() {
        assert!(
            Settings::try_parse_from(["trajectory-plot", "interactive", "a.gpx", "--headless"])
                .is_err()
        );
        assert!(
            Settings::try_parse_from([
                "trajectory-plot",
                "interactive",
                "a.gpx",
                "--headless",
                "--export",
                "overlay.json"
            ])
            .is_ok()
        );
    }
}
