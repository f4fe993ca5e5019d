//! Composite variable code parsing
//!
//! Clients name a variable as `code`, `code::unitid` or
//! `code::unitid-medium`. The same shape is produced by
//! [`crate::model::variable_key`].

use regex::Regex;
use std::sync::OnceLock;

fn separator() -> &'static Regex {
    static SEPARATOR: OnceLock<Regex> = OnceLock::new();
    SEPARATOR.get_or_init(|| Regex::new("::|-").expect("compile variable separator"))
}

/// A variable code with its optional unit and sample medium filters
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VariableToken {
    pub code: String,
    pub units_id: Option<String>,
    pub medium: Option<String>,
}

/// How a token's unit segment restricts `results.unitsid`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitFilter {
    /// No unit segment
    Any,
    Id(i64),
    /// Unit segment is not an integer: nothing can match
    Unmatchable,
}

impl VariableToken {
    /// Split on `::` or `-`
    ///
    /// One to three segments fill code, unit and medium in order. Any other
    /// count keeps the whole string as the code with no filters.
    pub fn parse(raw: &str) -> Self {
        let parts: Vec<&str> = separator().split(raw).collect();
        match parts.as_slice() {
            [code] => Self::bare(code),
            [code, unit] => Self {
                code: code.to_string(),
                units_id: Some(unit.to_string()),
                medium: None,
            },
            [code, unit, medium] => Self {
                code: code.to_string(),
                units_id: Some(unit.to_string()),
                medium: Some(medium.to_string()),
            },
            _ => Self::bare(raw),
        }
    }

    fn bare(code: &str) -> Self {
        Self {
            code: code.to_string(),
            units_id: None,
            medium: None,
        }
    }

    /// True when neither unit nor medium was given
    pub fn is_unfiltered(&self) -> bool {
        self.units_id.is_none() && self.medium.is_none()
    }

    pub fn unit_filter(&self) -> UnitFilter {
        match &self.units_id {
            None => UnitFilter::Any,
            Some(raw) => match raw.trim().parse::<i64>() {
                Ok(id) => UnitFilter::Id(id),
                Err(_) => UnitFilter::Unmatchable,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_token() {
        let t = VariableToken::parse("A::1-water");
        assert_eq!(t.code, "A");
        assert_eq!(t.units_id.as_deref(), Some("1"));
        assert_eq!(t.medium.as_deref(), Some("water"));
        assert!(!t.is_unfiltered());
        assert_eq!(t.unit_filter(), UnitFilter::Id(1));
    }

    #[test]
    fn test_parse_bare_code() {
        let t = VariableToken::parse("A");
        assert_eq!(t, VariableToken::bare("A"));
        assert!(t.is_unfiltered());
        assert_eq!(t.unit_filter(), UnitFilter::Any);
    }

    #[test]
    fn test_parse_code_and_unit() {
        let t = VariableToken::parse("NO3::52");
        assert_eq!(t.code, "NO3");
        assert_eq!(t.units_id.as_deref(), Some("52"));
        assert_eq!(t.medium, None);
    }

    #[test]
    fn test_dash_separates_too() {
        let t = VariableToken::parse("A-1");
        assert_eq!(t.code, "A");
        assert_eq!(t.units_id.as_deref(), Some("1"));
    }

    #[test]
    fn test_too_many_segments_keeps_raw_code() {
        let t = VariableToken::parse("USU-LBR-Mendon-Temp");
        assert_eq!(t.code, "USU-LBR-Mendon-Temp");
        assert!(t.is_unfiltered());
    }

    #[test]
    fn test_non_numeric_unit_is_unmatchable() {
        let t = VariableToken::parse("A::m");
        assert_eq!(t.unit_filter(), UnitFilter::Unmatchable);
    }

    #[test]
    fn test_round_trips_variable_key() {
        let key = crate::model::variable_key("Temp", 96, "liquidAqueous");
        let t = VariableToken::parse(&key);
        assert_eq!(t.code, "Temp");
        assert_eq!(t.unit_filter(), UnitFilter::Id(96));
        assert_eq!(t.medium.as_deref(), Some("liquidAqueous"));
    }
}
