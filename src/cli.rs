use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Default, Parser)]
#[command(name = "drafty")]
#[command(version = "0.1.0")]
#[command(about = "A formatted-text document backend with a console driver")]
pub struct CliArgs {
    /// Path to a TOML config file
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Directory for saved document snapshots (overrides the config file)
    #[arg(long, short = 's')]
    pub saves_dir: Option<PathBuf>,

    /// Start with an empty document instead of the sample text
    #[arg(long)]
    pub empty: bool,
}

pub fn parse_args() -> Result<CliArgs, Box<dyn std::error::Error>> {
    Ok(CliArgs::parse())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_no_args() {
        let args = CliArgs::parse_from(["drafty"]);
        assert!(args.config.is_none());
        assert!(args.saves_dir.is_none());
        assert!(!args.empty);
    }

    #[test]
    fn test_parse_saves_dir() {
        let args = CliArgs::parse_from(["drafty", "--saves-dir", "/tmp/saves"]);
        assert_eq!(args.saves_dir, Some(PathBuf::from("/tmp/saves")));
    }

    #[test]
    fn test_parse_empty_flag() {
        let args = CliArgs::parse_from(["drafty", "--empty"]);
        assert!(args.empty);
    }
}
