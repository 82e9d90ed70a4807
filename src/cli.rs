use std::error::Error;
use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::debug;

use crate::file;
use crate::report::error_json;
use crate::{evaluate_measurement, LossError, MeasurementInput};

/// What the command line asked for.
#[derive(Debug, PartialEq)]
pub enum Action {
    Help,
    Version,
    Evaluate(Config),
}

#[derive(Debug, Default, PartialEq)]
pub struct Config {
    /// Measurement given by flags, before any measurement file is merged in.
    pub measurement: MeasurementInput,
    pub config_path: Option<PathBuf>,
    pub json: bool,
}

impl Action {
    pub fn parse(args: &[String]) -> Result<Action, Box<dyn Error>> {
        if args.len() < 2 {
            return Err("not enough arguments".into());
        }

        let mut config = Config::default();
        let mut rest = args[1..].iter();

        while let Some(arg) = rest.next() {
            // accept both `--flag value` and `--flag=value`
            let (flag, inline_value) = match arg.split_once('=') {
                Some((flag, value)) if flag.starts_with("--") => (flag, Some(value.to_string())),
                _ => (arg.as_str(), None),
            };
            let mut value = || -> Result<String, Box<dyn Error>> {
                match inline_value.clone() {
                    Some(value) => Ok(value),
                    None => rest
                        .next()
                        .cloned()
                        .ok_or_else(|| format!("missing value for {flag}").into()),
                }
            };

            let measurement = &mut config.measurement;
            match flag {
                "--help" | "-h" => return Ok(Action::Help),
                "--version" | "-v" => return Ok(Action::Version),
                "--json" => config.json = true,
                "--single-tier" | "--single_tier" => measurement.single_tier = Some(true),
                "--two-tier" | "--two_tier" => measurement.single_tier = Some(false),
                "--config" => config.config_path = Some(PathBuf::from(value()?)),
                "--tx" => measurement.tx_mw = Some(parse_value(flag, &value()?)?),
                "--rx" => measurement.rx_mw = Some(parse_value(flag, &value()?)?),
                "--tx_dbm" => measurement.tx_dbm = Some(parse_value(flag, &value()?)?),
                "--rx_dbm" => measurement.rx_dbm = Some(parse_value(flag, &value()?)?),
                "--rx_target_min_dbm" | "--min_rx_dbm" => {
                    measurement.rx_target_min_dbm = Some(parse_value(flag, &value()?)?)
                }
                "--rx_target_max_dbm" | "--max_rx_dbm" => {
                    measurement.rx_target_max_dbm = Some(parse_value(flag, &value()?)?)
                }
                "--fiber_type" => measurement.fiber_type = Some(parse_value(flag, &value()?)?),
                "--wavelength" => measurement.wavelength_nm = Some(parse_value(flag, &value()?)?),
                "--fiber_length" => {
                    measurement.fiber_length_m = Some(parse_value(flag, &value()?)?)
                }
                "--num_connectors" => measurement.connectors = Some(parse_value(flag, &value()?)?),
                "--num_splices" => measurement.splices = Some(parse_value(flag, &value()?)?),
                other => return Err(format!("unknown argument `{other}`").into()),
            }
        }

        Ok(Action::Evaluate(config))
    }
}

fn parse_value<T>(flag: &str, raw: &str) -> Result<T, Box<dyn Error>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|err| format!("invalid value `{raw}` for {flag}: {err}").into())
}

impl Config {
    /// Merge the measurement file, if any, under the command-line flags.
    pub fn measurement(&self) -> Result<MeasurementInput, Box<dyn Error>> {
        match &self.config_path {
            Some(path) => {
                let from_file = file::load_measurement(path)?;
                Ok(from_file.overlay(self.measurement.clone()))
            }
            None => Ok(self.measurement.clone()),
        }
    }

    /// Evaluate the measurement and write the report to `out`.
    ///
    /// A rejected measurement is returned as a [`LossError`] inside the boxed
    /// error. In JSON mode its error object has already been written to `out`.
    pub fn run(&self, out: &mut dyn Write) -> Result<(), Box<dyn Error>> {
        let measurement = self.measurement()?;
        debug!(%measurement, json = self.json, "evaluating measurement");

        match evaluate_measurement(&measurement) {
            Ok(report) => {
                if self.json {
                    writeln!(out, "{}", report.to_json()?)?;
                } else {
                    write!(out, "{}", report.to_text())?;
                }
                Ok(())
            }
            Err(err) => {
                if self.json {
                    writeln!(out, "{}", error_json(&err)?)?;
                }
                Err(err.into())
            }
        }
    }
}

/// Process exit code for a failed run: 1 when the measurement itself was
/// rejected, 2 for anything else (bad flags, unreadable files).
pub fn exit_code(err: &(dyn Error + 'static)) -> i32 {
    if err.downcast_ref::<LossError>().is_some() {
        1
    } else {
        2
    }
}

pub fn print_version() {
    println!("fiberloss {}", env!("CARGO_PKG_VERSION"));
}

pub fn print_error(error: &str) {
    const RED: &str = "\x1b[31m";
    const RESET: &str = "\x1b[0m";
    eprintln!("{}Problem parsing arguments: {error}{}", RED, RESET);
}

pub fn print_rejected(error: &str) {
    const RED: &str = "\x1b[31m";
    const RESET: &str = "\x1b[0m";
    eprintln!("{}Measurement rejected: {error}{}", RED, RESET);
}

pub fn print_help() {
    // ANSI color codes
    const BOLD: &str = "\x1b[1m";
    const CYAN: &str = "\x1b[36m";
    const GREEN: &str = "\x1b[32m";
    const YELLOW: &str = "\x1b[33m";
    const RESET: &str = "\x1b[0m";

    println!("🔦 Optical fiber attenuation and loss budget calculator{}", RESET);
    println!();
    println!("{}{}VERSION:{}", BOLD, YELLOW, RESET);
    println!("    {}{}{}", GREEN, env!("CARGO_PKG_VERSION"), RESET);
    println!();
    println!("{}{}USAGE:{}", BOLD, YELLOW, RESET);
    println!("    {} fiberloss [OPTIONS]{}", GREEN, RESET);
    println!();
    println!("     Power is given per endpoint in mW or dBm, the other form is derived.");
    println!("     With fiber type, wavelength and length the attenuation is evaluated");
    println!("     against a typical and a TIA-568 maximum loss budget.");
    println!();
    println!("     RX Attenuation mW is rx - tx, negative for a real loss.");
    println!("     RX Attenuation dB is 10 log10(tx / rx), positive for a real loss.");
    println!();
    println!("     Ratios are labelled dB, so JSON keys read RX_Attenuation_dB,");
    println!("     Typical_Loss_Budget_dB and TIA-568_Max_Loss_Budget_dB where older");
    println!("     versions of this report used RX_Attenuation_dBm and ..._Loss_Budget_dBm.");
    println!();
    println!("{}{}POWER:{}", BOLD, YELLOW, RESET);
    println!("    {}  --tx <mW>{}                  TX power in mW", GREEN, RESET);
    println!("    {}  --tx_dbm <dBm>{}             TX power in dBm", GREEN, RESET);
    println!("    {}  --rx <mW>{}                  RX power in mW", GREEN, RESET);
    println!("    {}  --rx_dbm <dBm>{}             RX power in dBm", GREEN, RESET);
    println!(
        "    {}  --rx_target_min_dbm <dBm>{}  Target minimum RX power, default -5 dBm",
        GREEN, RESET
    );
    println!(
        "    {}  --rx_target_max_dbm <dBm>{}  Target maximum RX power, default +1 dBm",
        GREEN, RESET
    );
    println!();
    println!("{}{}FIBER:{}", BOLD, YELLOW, RESET);
    println!(
        "    {}  --fiber_type <s|m>{}         s = singlemode (1310, 1550), m = multimode (850, 1300)",
        GREEN, RESET
    );
    println!("    {}  --wavelength <nm>{}          850, 1300, 1310 or 1550", GREEN, RESET);
    println!("    {}  --fiber_length <m>{}         Total fiber length in meters, at least 1", GREEN, RESET);
    println!("    {}  --num_connectors <n>{}       Mated connector pairs, default 0", GREEN, RESET);
    println!("    {}  --num_splices <n>{}          Splices, default 0", GREEN, RESET);
    println!(
        "    {}  --single-tier{}              Evaluate against the TIA-568 maximum only",
        GREEN, RESET
    );
    println!(
        "    {}  --two-tier{}                 Typical and TIA-568 maximum tiers (default), overrides a file's single_tier",
        GREEN, RESET
    );
    println!();
    println!("{}{}OPTIONS:{}", BOLD, YELLOW, RESET);
    println!("    {}  --config <FILE_PATH>{}       Read the measurement from a toml file", GREEN, RESET);
    println!("    {}  --json{}                     Output as JSON", GREEN, RESET);
    println!("    {}  -v, --version{}              Print version information", GREEN, RESET);
    println!("    {}  -h, --help{}                 Print help information", GREEN, RESET);
    println!();
    println!("{}{}EXAMPLES:{}", BOLD, YELLOW, RESET);
    println!("    {} # 1 km singlemode run, two connector pairs, one splice{}", CYAN, RESET);
    println!(
        "    {} fiberloss --tx 1.5 --rx 0.5 --fiber_type s --wavelength 1310 --fiber_length 1000 --num_connectors 2 --num_splices 1{}",
        GREEN, RESET
    );
    println!();
    println!("    {} # Measurement file, JSON output{}", CYAN, RESET);
    println!("    {} fiberloss --config files/link.toml --json{}", GREEN, RESET);
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Field, FiberType};

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("fiberloss")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    fn config(list: &[&str]) -> Config {
        match Action::parse(&args(list)).unwrap() {
            Action::Evaluate(config) => config,
            other => panic!("expected an evaluation, got {other:?}"),
        }
    }

    fn run(config: &Config) -> (Result<(), Box<dyn Error>>, String) {
        let mut out = Vec::new();
        let result = config.run(&mut out);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_not_enough_args() {
        assert!(Action::parse(&args(&[])).is_err());
    }

    #[test]
    fn test_help_and_version_flags() {
        for flag in ["--help", "-h"] {
            assert_eq!(Action::parse(&args(&[flag])).unwrap(), Action::Help);
        }
        for flag in ["--version", "-v"] {
            assert_eq!(Action::parse(&args(&[flag])).unwrap(), Action::Version);
        }
    }

    #[test]
    fn test_version_output_format() {
        let version = env!("CARGO_PKG_VERSION");
        let parts: Vec<&str> = version.split('.').collect();
        assert_eq!(parts.len(), 3, "Version should be in X.Y.Z format");
    }

    #[test]
    fn test_parse_full_measurement() {
        let config = config(&[
            "--tx", "1.5", "--rx", "0.5", "--fiber_type", "s", "--wavelength", "1310",
            "--fiber_length", "1000", "--num_connectors", "2", "--num_splices", "1", "--json",
        ]);
        assert!(config.json);
        let measurement = config.measurement;
        assert_eq!(measurement.tx_mw, Some(1.5));
        assert_eq!(measurement.rx_mw, Some(0.5));
        assert_eq!(measurement.fiber_type, Some(FiberType::Singlemode));
        assert_eq!(measurement.wavelength_nm, Some(1310));
        assert_eq!(measurement.fiber_length_m, Some(1000.0));
        assert_eq!(measurement.connectors, Some(2));
        assert_eq!(measurement.splices, Some(1));
    }

    #[test]
    fn test_inline_values_and_negative_numbers() {
        let config = config(&["--tx_dbm=-2.5", "--rx_dbm", "-7", "--min_rx_dbm", "-9"]);
        assert_eq!(config.measurement.tx_dbm, Some(-2.5));
        assert_eq!(config.measurement.rx_dbm, Some(-7.0));
        assert_eq!(config.measurement.rx_target_min_dbm, Some(-9.0));
    }

    #[test]
    fn test_bad_values_are_usage_errors() {
        let err = Action::parse(&args(&["--tx", "lots"])).unwrap_err();
        assert!(err.to_string().contains("--tx"));
        assert_eq!(exit_code(err.as_ref()), 2);

        assert!(Action::parse(&args(&["--num_splices", "-1"])).is_err());
        assert!(Action::parse(&args(&["--fiber_type", "x"])).is_err());
        assert!(Action::parse(&args(&["--rx"])).is_err());
        assert!(Action::parse(&args(&["--frequency", "6e9"])).is_err());
    }

    #[test]
    fn test_run_text_output() {
        let (result, output) = run(&config(&["--tx", "10", "--rx", "5"]));
        assert!(result.is_ok());
        assert!(output.starts_with("\nSummary of Inputs and Attenuation:\n"));
        assert!(output.contains("    RX Attenuation dB: 3.01\n"));
        assert!(!output.contains("Loss Budget Evaluation"));
    }

    #[test]
    fn test_run_json_output() {
        let (result, output) = run(&config(&[
            "--tx", "1.5", "--rx", "0.5", "--fiber_type", "s", "--wavelength", "1310",
            "--fiber_length", "1000", "--num_connectors", "2", "--num_splices", "1", "--json",
        ]));
        assert!(result.is_ok());
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["power_eval"]["TX_dBm"], "1.76");
        assert_eq!(value["loss_eval"]["Result"], "FAIL");
    }

    #[test]
    fn test_run_rejected_measurement_json() {
        let (result, output) = run(&config(&["--tx", "1.5", "--rx", "0.5", "--fiber_length", "1000", "--json"]));
        let err = result.unwrap_err();
        assert_eq!(exit_code(err.as_ref()), 1);
        assert_eq!(
            err.downcast_ref::<LossError>(),
            Some(&LossError::MissingInput(vec![Field::FiberType, Field::Wavelength]))
        );
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(
            value["error"]["missing_input"],
            serde_json::json!(["--fiber_type", "--wavelength"])
        );
    }

    #[test]
    fn test_run_rejected_measurement_text_writes_nothing() {
        let (result, output) = run(&config(&["--tx", "1.5"]));
        assert!(result.is_err());
        assert!(output.is_empty());
    }

    #[test]
    fn test_two_tier_flag_overrides_file() {
        let overridden = config(&["--config", "tests/files/multimode_dbm.toml", "--two-tier"]);
        let measurement = overridden.measurement().unwrap();
        assert_eq!(measurement.budget_mode(), crate::BudgetMode::TwoTier);

        let from_file = config(&["--config", "tests/files/multimode_dbm.toml"]);
        let measurement = from_file.measurement().unwrap();
        assert_eq!(measurement.budget_mode(), crate::BudgetMode::SingleTier);
    }

    #[test]
    fn test_run_rejects_incompatible_pair_without_length() {
        let (result, output) = run(&config(&[
            "--tx", "1.5", "--rx", "0.5", "--fiber_type", "s", "--wavelength", "850", "--json",
        ]));
        assert_eq!(exit_code(result.unwrap_err().as_ref()), 1);
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["error"]["missing_input"], serde_json::json!(["--fiber_length"]));
        assert_eq!(
            value["error"]["invalid_input"],
            serde_json::json!(["Singlemode fiber does not support 850nm wavelength."])
        );
    }

    #[test]
    fn test_config_file_under_flags() {
        let config = config(&["--config", "tests/files/singlemode_link.toml", "--rx", "1.0"]);
        let measurement = config.measurement().unwrap();
        assert_eq!(measurement.tx_mw, Some(1.5));
        assert_eq!(measurement.rx_mw, Some(1.0));
        assert_eq!(measurement.connectors, Some(2));
    }

    #[test]
    fn test_missing_config_file_is_a_usage_error() {
        let (result, _) = run(&config(&["--config", "tests/files/nope.toml"]));
        assert_eq!(exit_code(result.unwrap_err().as_ref()), 2);
    }
}
