//! Interactive prompts for `graft new`.
//!
//! Backed by `dialoguer` when the `interactive` feature is on. Every prompt
//! refuses to run without a terminal on stdin so scripted use fails fast
//! instead of hanging.

use std::io::IsTerminal as _;

use crate::error::{CliError, CliResult};

/// Whether prompts can be shown at all.
pub fn is_interactive() -> bool {
    cfg!(feature = "interactive") && std::io::stdin().is_terminal()
}

fn require_terminal(what: &str) -> CliResult<()> {
    if !cfg!(feature = "interactive") {
        return Err(CliError::FeatureNotAvailable {
            feature: "interactive",
        });
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::InvalidInput {
            message: format!("{what} is required when stdin is not a terminal"),
        });
    }
    Ok(())
}

#[cfg(feature = "interactive")]
mod imp {
    use dialoguer::{Confirm, FuzzySelect, Input, theme::ColorfulTheme};

    use crate::error::{CliError, CliResult};

    fn prompt_error(e: dialoguer::Error) -> CliError {
        CliError::Prompt {
            reason: e.to_string(),
        }
    }

    pub fn select(prompt: &str, items: &[String], default: usize) -> CliResult<usize> {
        FuzzySelect::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .items(items)
            .default(default)
            .interact()
            .map_err(prompt_error)
    }

    pub fn input(
        prompt: &str,
        validate: impl Fn(&str) -> Result<(), String>,
    ) -> CliResult<String> {
        Input::<String>::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .validate_with(|value: &String| validate(value.trim()))
            .interact_text()
            .map(|value| value.trim().to_owned())
            .map_err(prompt_error)
    }

    pub fn confirm(prompt: &str) -> CliResult<bool> {
        Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .default(true)
            .interact()
            .map_err(prompt_error)
    }
}

#[cfg(not(feature = "interactive"))]
mod imp {
    use crate::error::{CliError, CliResult};

    fn unavailable<T>() -> CliResult<T> {
        Err(CliError::FeatureNotAvailable {
            feature: "interactive",
        })
    }

    pub fn select(_prompt: &str, _items: &[String], _default: usize) -> CliResult<usize> {
        unavailable()
    }

    pub fn input(
        _prompt: &str,
        _validate: impl Fn(&str) -> Result<(), String>,
    ) -> CliResult<String> {
        unavailable()
    }

    pub fn confirm(_prompt: &str) -> CliResult<bool> {
        unavailable()
    }
}

/// Pick one of `items`; returns its index.
pub fn select(prompt: &str, items: &[String], default: usize) -> CliResult<usize> {
    require_terminal("--template")?;
    imp::select(prompt, items, default)
}

/// Free-text input, re-asked until `validate` accepts it.
pub fn input(
    prompt: &str,
    what: &str,
    validate: impl Fn(&str) -> Result<(), String>,
) -> CliResult<String> {
    require_terminal(what)?;
    imp::input(prompt, validate)
}

/// Yes/no question defaulting to yes.
pub fn confirm(prompt: &str) -> CliResult<bool> {
    require_terminal("--yes")?;
    imp::confirm(prompt)
}
