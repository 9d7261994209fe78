//! Utility to run a single conversion from the command line
//!
//! Usage: convert_temperature <value> <unit> <target_unit> [precision]

use std::process::ExitCode;

use serde::Serialize;
use tempconv::config::ServiceConfig;
use tempconv::conversion::ConversionError;
use tempconv::tools::convert::convert_temperature;

const USAGE: &str = "Usage: convert_temperature <value> <unit> <target_unit> [precision]";

fn print_json<T: Serialize>(value: &T) -> bool {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{}", json);
            true
        }
        Err(e) => {
            eprintln!("Serialization error: {}", e);
            false
        }
    }
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 3 || args.len() > 4 {
        eprintln!("{}", USAGE);
        return ExitCode::from(2);
    }

    let config = match ServiceConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::from(2);
        }
    };

    let value = match args[0].trim().parse::<f64>() {
        Ok(v) => v,
        Err(_) => {
            let mut problem = ConversionError::InvalidValue {
                field: "value",
                value: f64::NAN,
            }
            .to_problem();
            problem.detail = format!("Invalid value: '{}' is not a number", args[0]);
            problem.value = Some(args[0].clone());
            print_json(&problem);
            return ExitCode::FAILURE;
        }
    };

    let precision = args.get(3).map(String::as_str);
    let printed = match convert_temperature(&config, value, &args[1], &args[2], precision) {
        Ok(result) => print_json(&result),
        Err(e) => {
            print_json(&e.to_problem());
            false
        }
    };

    if printed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
