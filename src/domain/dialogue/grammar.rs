//! Input parser for free-text dialogue input.
//!
//! Account flows expect every field in one whitespace-separated message.
//! Each `(action, captcha present)` pair maps to a [`Grammar`]: a fixed
//! number of single-token fields at the front, one joined field in the
//! middle, and a fixed number of single-token fields at the end. Boundaries
//! are purely positional; no field is validated beyond its token count.
//!
//! Multistep flows take one field per message; see [`parse_step_input`].

use chrono::DateTime;
use std::collections::BTreeMap;
use thiserror::Error;

use super::action::AccountAction;
use super::state::Step;

/// Errors produced while parsing user input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("malformed input, expected: {expected}")]
    MalformedInput { expected: String },
}

impl ParseError {
    fn malformed(expected: impl Into<String>) -> Self {
        ParseError::MalformedInput {
            expected: expected.into(),
        }
    }
}

/// A named field of an account request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    CaptchaAnswer,
    Username,
    Password,
    Mnemonic,
    NewPassword,
}

/// Positional layout of one account message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grammar {
    leading: &'static [Field],
    joined: Field,
    trailing: &'static [Field],
    format: &'static str,
}

const CREDENTIALS_WITH_CAPTCHA: Grammar = Grammar {
    leading: &[Field::CaptchaAnswer, Field::Username],
    joined: Field::Password,
    trailing: &[],
    format: "<captcha> <username> <password>",
};

const CREDENTIALS: Grammar = Grammar {
    leading: &[Field::Username],
    joined: Field::Password,
    trailing: &[],
    format: "<username> <password>",
};

const RESTORE_WITH_CAPTCHA: Grammar = Grammar {
    leading: &[Field::CaptchaAnswer, Field::Username],
    joined: Field::Mnemonic,
    trailing: &[Field::NewPassword],
    format: "<captcha> <username> <mnemonic> <new_password>",
};

const RESTORE: Grammar = Grammar {
    leading: &[Field::Username],
    joined: Field::Mnemonic,
    trailing: &[Field::NewPassword],
    format: "<username> <mnemonic> <new_password>",
};

/// Selects the grammar for an account action.
pub fn grammar_for(action: AccountAction, captcha_present: bool) -> &'static Grammar {
    match (action, captcha_present) {
        (AccountAction::Register | AccountAction::Auth, true) => &CREDENTIALS_WITH_CAPTCHA,
        (AccountAction::Register | AccountAction::Auth, false) => &CREDENTIALS,
        (AccountAction::Restore, true) => &RESTORE_WITH_CAPTCHA,
        (AccountAction::Restore, false) => &RESTORE,
    }
}

impl Grammar {
    /// Fewest tokens that satisfy this grammar.
    pub fn min_tokens(&self) -> usize {
        self.leading.len() + 1 + self.trailing.len()
    }

    /// Placeholder layout shown to the user, e.g. `<username> <password>`.
    pub fn format(&self) -> &'static str {
        self.format
    }

    /// Splits `raw` on whitespace and assigns tokens to fields by position.
    pub fn parse(&self, raw: &str) -> Result<ParsedInput, ParseError> {
        let tokens: Vec<&str> = raw.split_whitespace().collect();
        if tokens.len() < self.min_tokens() {
            return Err(ParseError::malformed(self.format));
        }

        let mut fields = BTreeMap::new();
        let (head, rest) = tokens.split_at(self.leading.len());
        let (middle, tail) = rest.split_at(rest.len() - self.trailing.len());

        for (field, token) in self.leading.iter().zip(head) {
            fields.insert(*field, (*token).to_string());
        }
        fields.insert(self.joined, middle.join(" "));
        for (field, token) in self.trailing.iter().zip(tail) {
            fields.insert(*field, (*token).to_string());
        }

        Ok(ParsedInput { fields })
    }
}

/// Fields extracted from one account message.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedInput {
    fields: BTreeMap<Field, String>,
}

impl ParsedInput {
    pub fn get(&self, field: Field) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    /// Removes and returns a field, or an empty string if the grammar did
    /// not produce it.
    pub fn take(&mut self, field: Field) -> String {
        self.fields.remove(&field).unwrap_or_default()
    }
}

/// Placeholder layout for a multistep prompt.
pub fn step_format(step: Step) -> &'static str {
    match step {
        Step::WalletAddress => "<btc_address>",
        Step::WalletAmount => "<amount in BTC>",
        Step::TaskTitle => "<title>",
        Step::TaskDesc => "<description>",
        Step::TaskPrice => "<price in BTC, e.g. 0.0015>",
        Step::TaskDeadline => "YYYY-MM-DDTHH:MM:SSZ",
    }
}

/// Parses the single field a multistep step expects.
///
/// Input is trimmed and must be non-empty. Prices must be finite,
/// non-negative numbers and deadlines RFC 3339 timestamps.
pub fn parse_step_input(step: Step, raw: &str) -> Result<String, ParseError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(ParseError::malformed(step_format(step)));
    }

    match step {
        Step::TaskPrice => {
            parse_price(value)?;
        }
        Step::TaskDeadline => {
            DateTime::parse_from_rfc3339(value)
                .map_err(|_| ParseError::malformed(step_format(step)))?;
        }
        _ => {}
    }

    Ok(value.to_string())
}

/// Parses a task price.
pub fn parse_price(value: &str) -> Result<f64, ParseError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|price| price.is_finite() && *price >= 0.0)
        .ok_or_else(|| ParseError::malformed(step_format(Step::TaskPrice)))
}
