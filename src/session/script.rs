// SPDX-License-Identifier: PMPL-1.0-or-later

//! Line-oriented interaction scripts replayed against a session.
//!
//! ```text
//! # comments and blank lines are skipped
//! select p1
//! lang en
//! toggle infrastructure
//! clear
//! summary
//! ```

use crate::i18n::Lang;
use anyhow::{anyhow, bail, Context, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptCommand {
    Select(String),
    Clear,
    Lang(Lang),
    Toggle(String),
    /// Print the current page.
    Show,
    /// Print the session summary.
    Summary,
}

impl ScriptCommand {
    pub fn parse(line: &str) -> Result<Self> {
        let mut words = line.split_whitespace();
        let verb = words.next().ok_or_else(|| anyhow!("empty command"))?;
        let argument = words.next();
        if words.next().is_some() {
            bail!("too many arguments to '{}'", verb);
        }

        let command = match (verb, argument) {
            ("select", Some(id)) => ScriptCommand::Select(id.to_string()),
            ("toggle", Some(id)) => ScriptCommand::Toggle(id.to_string()),
            ("lang", Some(code)) => ScriptCommand::Lang(
                Lang::from_code(code).ok_or_else(|| anyhow!("unsupported language '{}'", code))?,
            ),
            ("clear", None) => ScriptCommand::Clear,
            ("show", None) => ScriptCommand::Show,
            ("summary", None) => ScriptCommand::Summary,
            ("select" | "toggle" | "lang", None) => bail!("'{}' needs an argument", verb),
            ("clear" | "show" | "summary", Some(_)) => bail!("'{}' takes no argument", verb),
            _ => bail!("unknown command '{}'", verb),
        };
        Ok(command)
    }
}

/// Parse a whole script. Errors name the offending line.
pub fn parse_script(source: &str) -> Result<Vec<ScriptCommand>> {
    source
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(number, line)| {
            ScriptCommand::parse(line).with_context(|| format!("script line {}", number))
        })
        .collect()
}
