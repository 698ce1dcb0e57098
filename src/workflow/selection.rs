//! Parsing of the user's answers at the Select and Decide prompts

use crate::error::{BrandForgeError, Result};
use std::collections::HashSet;

/// Answer at the Select prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionInput {
    /// Zero-based batch indices, in the order given
    Indices(Vec<usize>),
    /// The whole batch, no bounds check
    All,
    Regenerate,
    Abort,
}

/// Answer at the Decide prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Accept,
    Regenerate,
    Abort,
}

fn is_abort(input: &str) -> bool {
    matches!(input, "abort" | "quit" | "q")
}

/// Parse `"1, 3, 5"`-style input against a batch of `batch_len` names.
///
/// Indices are 1-based, must be unique and in range, and their count must lie
/// within `min..=max`.
pub fn parse_selection(input: &str, batch_len: usize, min: usize, max: usize) -> Result<SelectionInput> {
    let input = input.trim().to_lowercase();

    match input.as_str() {
        "" => return Err(BrandForgeError::invalid_input("No selection entered")),
        "all" => return Ok(SelectionInput::All),
        "regenerate" => return Ok(SelectionInput::Regenerate),
        other if is_abort(other) => return Ok(SelectionInput::Abort),
        _ => {}
    }

    let mut seen = HashSet::new();
    let mut indices = Vec::new();

    for token in input.split(',').map(str::trim) {
        let number: usize = token.parse().map_err(|_| {
            BrandForgeError::invalid_input(format!(
                "'{}' is not a number; enter comma-separated numbers like 1,3,5",
                token
            ))
        })?;

        if number == 0 || number > batch_len {
            return Err(BrandForgeError::invalid_input(format!(
                "{} is out of range; pick numbers between 1 and {}",
                number, batch_len
            )));
        }
        if !seen.insert(number) {
            return Err(BrandForgeError::invalid_input(format!("{} was selected twice", number)));
        }
        indices.push(number - 1);
    }

    if indices.len() < min || indices.len() > max {
        return Err(BrandForgeError::invalid_input(format!(
            "Select between {} and {} names (got {})",
            min,
            max,
            indices.len()
        )));
    }

    Ok(SelectionInput::Indices(indices))
}

/// Parse the answer to "are you satisfied with these names?"
pub fn parse_decision(input: &str) -> Result<Decision> {
    match input.trim().to_lowercase().as_str() {
        "y" | "yes" => Ok(Decision::Accept),
        "n" | "no" | "regenerate" => Ok(Decision::Regenerate),
        other if is_abort(other) => Ok(Decision::Abort),
        other => Err(BrandForgeError::invalid_input(format!(
            "'{}' is not a valid answer; enter yes, no or regenerate",
            other
        ))),
    }
}
