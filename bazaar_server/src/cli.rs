use std::{env, env::VarError};

const HELP: &str = include_str!("./cli-help.txt");

/// The environment variables the server reads. None of them hold secrets.
pub const CONFIG_ENVS: [&str; 6] =
    ["RUST_LOG", "BZR_HOST", "BZR_PORT", "BZR_NETWORK", "BZR_NOTIFICATION_BUFFER", "BZR_LOG_NOTIFICATIONS"];

/// There's no real CLI for the server. Any argument at all prints the help text and the current environment.
///
/// Returns true if the help was printed, in which case the caller should exit.
pub fn handle_command_line_args() -> bool {
    if env::args().len() <= 1 {
        return false;
    }
    println!("\n{HELP}\n");
    println!("Current environment values:");
    env_report().iter().for_each(|line| println!("{line}"));
    true
}

pub fn env_report() -> Vec<String> {
    CONFIG_ENVS
        .iter()
        .map(|&name| {
            let val = describe(env::var(name));
            format!("  {name:<35} {val:<15}")
        })
        .collect()
}

fn describe(value: Result<String, VarError>) -> String {
    match value {
        Ok(s) => s,
        Err(VarError::NotPresent) => "Not set".into(),
        Err(VarError::NotUnicode(s)) => format!("Invalid value: {}", s.to_string_lossy()),
    }
}
