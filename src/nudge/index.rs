//! # Selectors
//!
//! Users refer to reminders either by their position in the list they were
//! just shown (`nudge done 2`) or by id. Ids are UUIDs, so any unique prefix
//! is accepted too (`nudge done 3f2a`).
//!
//! Positions are 1-based and always relative to a specific view (mode and
//! sort), so resolution takes the already-filtered list.

use crate::error::{NudgeError, Result};
use crate::model::Reminder;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    Position(usize),
    Id(String),
}

impl FromStr for Selector {
    type Err = NudgeError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(NudgeError::Validation("Empty selector".to_string()));
        }
        match s.parse::<usize>() {
            Ok(0) => Err(NudgeError::Validation(
                "Positions start at 1".to_string(),
            )),
            Ok(n) => Ok(Selector::Position(n)),
            Err(_) => Ok(Selector::Id(s.to_string())),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Position(n) => write!(f, "{}", n),
            Selector::Id(id) => write!(f, "{}", id),
        }
    }
}

/// Find the reminder a selector points at within `view`.
pub fn resolve<'a>(view: &'a [Reminder], selector: &Selector) -> Result<&'a Reminder> {
    match selector {
        Selector::Position(n) => n
            .checked_sub(1)
            .and_then(|i| view.get(i))
            .ok_or_else(|| NudgeError::NotFound(selector.to_string())),
        Selector::Id(id) => {
            if let Some(exact) = view.iter().find(|r| &r.id == id) {
                return Ok(exact);
            }
            let mut matches = view.iter().filter(|r| r.id.starts_with(id.as_str()));
            match (matches.next(), matches.next()) {
                (Some(found), None) => Ok(found),
                (Some(_), Some(_)) => Err(NudgeError::Ambiguous(id.clone())),
                (None, _) => Err(NudgeError::NotFound(id.clone())),
            }
        }
    }
}
