use clap::Parser;

/// Run a batch of delayed tasks through the timed scheduler.
///
/// Without `--delays`, prompts for the number of tasks and then for each
/// task's delay in seconds.
#[derive(Parser, Debug)]
#[command(name = "tempo", version, about = "Run delayed tasks through the timed scheduler")]
pub struct CliArgs {
    /// Path to config file (default: ~/.config/tempo/config.toml)
    #[arg(long, env = "TEMPO_CONFIG")]
    pub config: Option<String>,

    /// Comma-separated task delays in seconds (skips the interactive prompts)
    #[arg(long, value_delimiter = ',')]
    pub delays: Option<Vec<u64>>,

    /// Make task number N fail (1-based, repeatable)
    #[arg(long = "fail", value_name = "N")]
    pub fail: Vec<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_delays_and_failures() {
        let args = CliArgs::try_parse_from(["tempo", "--delays", "3,1,2", "--fail", "2", "--fail", "3"])
            .unwrap();
        assert_eq!(args.delays, Some(vec![3, 1, 2]));
        assert_eq!(args.fail, vec![2, 3]);
    }

    #[test]
    fn interactive_by_default() {
        let args = CliArgs::try_parse_from(["tempo"]).unwrap();
        assert!(args.delays.is_none());
        assert!(args.fail.is_empty());
    }

    #[test]
    fn rejects_negative_delay() {
        assert!(CliArgs::try_parse_from(["tempo", "--delays", "1,-2"]).is_err());
    }
}
