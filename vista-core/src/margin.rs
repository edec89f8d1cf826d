//! Parser for CSS `rootMargin` shorthand strings
//!
//! Accepts one to four lengths separated by whitespace, following the CSS
//! `margin` shorthand expansion. Lengths are pixels, with or without a `px`
//! suffix. Percentages are rejected since the engine has no reference box
//! to resolve them against.
use nom::{
    bytes::complete::tag,
    character::complete::{multispace0, multispace1},
    combinator::{all_consuming, opt},
    multi::separated_list1,
    number::complete::float,
    sequence::{delimited, terminated},
    IResult,
};
use thiserror::Error;

use crate::geometry::Insets;

/// Errors produced while parsing a root margin string
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MarginParseError {
    #[error("invalid root margin `{0}`")]
    Syntax(String),
    #[error("percentage root margins are not supported: `{0}`")]
    Percentage(String),
    #[error("root margin takes 1 to 4 values, got {0}")]
    Arity(usize),
}

/// Parse a root margin such as `"0px 0px -50px 0px"` into [`Insets`].
pub fn parse_root_margin(input: &str) -> Result<Insets, MarginParseError> {
    if input.contains('%') {
        return Err(MarginParseError::Percentage(input.to_string()));
    }

    let values = match all_consuming(parse_lengths)(input) {
        Ok((_, values)) => values,
        Err(_) => return Err(MarginParseError::Syntax(input.to_string())),
    };

    match values.as_slice() {
        [all] => Ok(Insets::new(*all, *all, *all, *all)),
        [vertical, horizontal] => Ok(Insets::new(*vertical, *horizontal, *vertical, *horizontal)),
        [top, horizontal, bottom] => Ok(Insets::new(*top, *horizontal, *bottom, *horizontal)),
        [top, right, bottom, left] => Ok(Insets::new(*top, *right, *bottom, *left)),
        other => Err(MarginParseError::Arity(other.len())),
    }
}

fn parse_lengths(input: &str) -> IResult<&str, Vec<f32>> {
    delimited(
        multispace0,
        separated_list1(multispace1, parse_length),
        multispace0,
    )(input)
}

fn parse_length(input: &str) -> IResult<&str, f32> {
    terminated(float, opt(tag("px")))(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_four_values() {
        let insets = parse_root_margin("0px 0px -50px 0px").unwrap();
        assert_eq!(insets, Insets::new(0.0, 0.0, -50.0, 0.0));
    }

    #[test]
    fn test_shorthand_expansion() {
        assert_eq!(parse_root_margin("10px").unwrap(), Insets::new(10.0, 10.0, 10.0, 10.0));
        assert_eq!(parse_root_margin("10px 20px").unwrap(), Insets::new(10.0, 20.0, 10.0, 20.0));
        assert_eq!(
            parse_root_margin(" 1 2px 3 ").unwrap(),
            Insets::new(1.0, 2.0, 3.0, 2.0)
        );
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!(parse_root_margin(""), Err(MarginParseError::Syntax(_))));
        assert!(matches!(parse_root_margin("10em"), Err(MarginParseError::Syntax(_))));
        assert!(matches!(parse_root_margin("10%"), Err(MarginParseError::Percentage(_))));
        assert_eq!(
            parse_root_margin("1px 2px 3px 4px 5px"),
            Err(MarginParseError::Arity(5))
        );
    }
}
