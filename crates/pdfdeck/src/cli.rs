use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pdfdeck")]
#[command(author, version, about)]
#[command(long_about = "A slide and PDF presentation viewer.\n\n\
    Shows a built-in text deck, or the pages of a PDF, with keyboard\n\
    navigation, fullscreen and a timed slideshow.\n\n\
    Examples:\n  \
    pdfdeck                        Launch with the built-in slides\n  \
    pdfdeck talk.pdf               Present a PDF (fullscreen)\n  \
    pdfdeck talk.pdf --windowed    Present in a window\n  \
    pdfdeck talk.pdf --interval 20 Advance every 20 seconds in slideshow mode")]
#[command(propagate_version = true)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// PDF file to present
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Launch in a window instead of fullscreen
    #[arg(long, global = false)]
    pub windowed: bool,

    /// Seconds between slideshow advances
    #[arg(long, global = false, value_parser = clap::value_parser!(u32).range(1..=3600))]
    pub interval: Option<u32>,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// View and modify configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Export the pages of a PDF as PNG images
    Export {
        /// PDF file to export
        file: PathBuf,

        /// Output directory for PNG files
        #[arg(short, long, default_value = "export")]
        output_dir: PathBuf,

        /// Multiplier applied to each page's natural size
        #[arg(long, default_value = "2.0")]
        scale: f32,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Display current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g. defaults.theme, defaults.slideshow_interval)
        key: String,

        /// Value to set
        value: String,
    },
}

#[derive(Clone, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

impl Cli {
    /// Log level implied by `-v`/`-q`.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            return tracing::Level::ERROR;
        }
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }

    pub fn run(self) -> anyhow::Result<()> {
        match self.command {
            Some(Commands::Config { command }) => crate::commands::config::run(command),
            Some(Commands::Completion { shell }) => {
                crate::commands::completion::run(shell);
                Ok(())
            }
            Some(Commands::Export {
                file,
                output_dir,
                scale,
            }) => crate::commands::export::run(file, output_dir, scale),
            Some(Commands::Version) => {
                println!("pdfdeck {}", env!("CARGO_PKG_VERSION"));
                Ok(())
            }
            None => {
                if let Some(file) = &self.file {
                    if !file.exists() {
                        anyhow::bail!("File not found: {}", file.display());
                    }
                }
                crate::app::run(self.file, self.windowed, self.interval)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_file_and_flags() {
        let cli = Cli::try_parse_from(["pdfdeck", "talk.pdf", "--windowed", "--interval", "20"])
            .unwrap();
        assert_eq!(cli.file, Some(PathBuf::from("talk.pdf")));
        assert!(cli.windowed);
        assert_eq!(cli.interval, Some(20));
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_interval_range() {
        assert!(Cli::try_parse_from(["pdfdeck", "--interval", "0"]).is_err());
        assert!(Cli::try_parse_from(["pdfdeck", "--interval", "3601"]).is_err());
    }

    #[test]
    fn test_log_level() {
        let cli = Cli::try_parse_from(["pdfdeck"]).unwrap();
        assert_eq!(cli.log_level(), tracing::Level::WARN);
        let cli = Cli::try_parse_from(["pdfdeck", "-vv"]).unwrap();
        assert_eq!(cli.log_level(), tracing::Level::TRACE);
        let cli = Cli::try_parse_from(["pdfdeck", "-v", "-q"]).unwrap();
        assert_eq!(cli.log_level(), tracing::Level::ERROR);
    }

    #[test]
    fn test_export_subcommand() {
        let cli = Cli::try_parse_from(["pdfdeck", "export", "talk.pdf", "-o", "out"]).unwrap();
        match cli.command {
            Some(Commands::Export {
                file,
                output_dir,
                scale,
            }) => {
                assert_eq!(file, PathBuf::from("talk.pdf"));
                assert_eq!(output_dir, PathBuf::from("out"));
                assert_eq!(scale, 2.0);
            }
            _ => panic!("expected export"),
        }
    }
}
