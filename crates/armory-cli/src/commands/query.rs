//! Read-only commands: list and search

use colored::Colorize;
use serde_json::json;

use armory_core::{ListFilter, Orchestrator};

use crate::error::Result;

pub fn run_list(
    orchestrator: &Orchestrator<'_>,
    installed: bool,
    uninstalled: bool,
    json: bool,
) -> Result<i32> {
    let filter = if installed {
        ListFilter::InstalledOnly
    } else if uninstalled {
        ListFilter::UninstalledOnly
    } else {
        ListFilter::All
    };

    let names = orchestrator.list(filter)?;

    if json {
        let mut entries = Vec::new();
        for name in &names {
            let tool = orchestrator.require_tool(name)?;
            entries.push(json!({
                "name": name,
                "installed": tool.installed(),
            }));
        }
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(0);
    }

    for name in &names {
        if matches!(filter, ListFilter::All) {
            let marker = if orchestrator.require_tool(name)?.installed() {
                "*".green()
            } else {
                " ".normal()
            };
            println!("{} {}", marker, name);
        } else {
            println!("{}", name);
        }
    }
    if names.is_empty() {
        println!("{}", "no tools found".dimmed());
    }
    Ok(0)
}

pub fn run_search(orchestrator: &Orchestrator<'_>, query: &str) -> Result<i32> {
    let outcome = orchestrator.search(query)?;
    let armory_core::Outcome::Matches(lines) = outcome else {
        return Ok(0);
    };

    if lines.is_empty() {
        println!("{}", "no catalog entries match".dimmed());
        return Ok(0);
    }
    for line in lines {
        println!("{}", line);
    }
    Ok(0)
}
