use std::io::{self, Write};

use crate::io::{config_io, paths};
use crate::jql::scope_to_project;
use crate::model::{Config, ViewConfig};
use crate::remote::JiraClient;

/// Error type for CLI commands
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Config(#[from] config_io::ConfigError),
    #[error("{0}")]
    Remote(#[from] crate::remote::RemoteError),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("{0}")]
    Aborted(String),
    #[error("{failures} of {total} queries failed validation")]
    QueriesInvalid { failures: usize, total: usize },
}

fn prompt(label: &str) -> Result<String, CliError> {
    print!("{}: ", label);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn prompt_required(label: &str) -> Result<String, CliError> {
    loop {
        let value = prompt(label)?;
        if !value.is_empty() {
            return Ok(value);
        }
        println!("a value is required");
    }
}

/// `jw init`: prompt-based first-run setup
pub fn cmd_init(config_dir: Option<&str>) -> Result<(), CliError> {
    let dir = paths::config_dir(config_dir);
    let path = paths::config_path(&dir);
    if path.exists() {
        let answer = prompt(&format!("{} exists, overwrite? [y/N]", path.display()))?;
        if !answer.eq_ignore_ascii_case("y") {
            return Err(CliError::Aborted("keeping the existing config".into()));
        }
    }

    let domain = prompt_required("Jira domain (e.g. example.atlassian.net)")?;
    let project = prompt_required("project key (e.g. PROJ)")?;
    let name = prompt_required("first view name")?;
    let jql = prompt_required("first view query (JQL, without the project clause)")?;

    let config = Config {
        project,
        domain,
        views: vec![ViewConfig { name, jql }],
        activity: None,
    };
    config_io::save_config(&path, &config)?;
    println!("wrote {}", path.display());
    println!("set JIRA_EMAIL and JIRA_API_TOKEN, then run `jw`");
    Ok(())
}

/// `jw check`: validate config locally and every scoped query remotely.
/// Exits non-zero (via the returned error) when any query has errors.
pub async fn cmd_check(config_dir: Option<&str>) -> Result<(), CliError> {
    let dir = paths::config_dir(config_dir);
    let config = config_io::load_config(&paths::config_path(&dir))?;
    let client = JiraClient::from_env(&config.domain)?;

    let mut names: Vec<String> = config.views.iter().map(|v| v.name.clone()).collect();
    let mut scoped: Vec<String> = config
        .views
        .iter()
        .map(|v| scope_to_project(&v.jql, &config.project))
        .collect();
    if let Some(activity) = config.activity.as_ref().filter(|a| a.enabled) {
        names.push("Activity".into());
        scoped.push(scope_to_project(&activity.jql, &config.project));
    }

    let checks = client.validate_batch(&scoped).await?;
    let mut failures = 0;
    for (name, check) in names.iter().zip(&checks) {
        if check.valid {
            println!("ok   {}", name);
        } else {
            failures += 1;
            println!("FAIL {}", name);
        }
        for error in &check.errors {
            println!("       error: {}", error);
        }
        for warning in &check.warnings {
            println!("       warning: {}", warning);
        }
    }
    if failures > 0 {
        return Err(CliError::QueriesInvalid {
            failures,
            total: checks.len(),
        });
    }
    Ok(())
}
