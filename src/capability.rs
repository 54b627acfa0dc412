// Copyright 2025 Pavel Roskin
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Parsed capabilities

use std::fmt;

use crate::symbol::{Symbol, SymbolTable};

/// Delay requested before a string capability takes effect
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Padding {
    /// Milliseconds
    pub delay: u32,
    /// Delay is multiplied by the number of affected lines
    pub proportional: bool,
}

impl Padding {
    /// Read a trailing terminfo padding directive such as `$<20*/>`
    ///
    /// Only whole milliseconds are accepted.
    pub fn parse_directive(cap: &[u8]) -> Option<Self> {
        let body = cap.strip_suffix(b">")?;
        let start = body.iter().rposition(|&c| c == b'<')?;
        let body = body[start + 1..].strip_suffix(b"/").unwrap_or(&body[start + 1..]);
        if start == 0 || cap[start - 1] != b'$' {
            return None;
        }
        let (digits, proportional) = match body.strip_suffix(b"*") {
            Some(digits) => (digits, true),
            None => (body, false),
        };
        if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
            return None;
        }
        let delay = str::from_utf8(digits).ok()?.parse().ok()?;
        Some(Self {
            delay,
            proportional,
        })
    }
}

impl fmt::Display for Padding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.delay)?;
        if self.proportional {
            f.write_str("*")?;
        }
        Ok(())
    }
}

/// Value of a capability, the variant is its kind
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Value {
    /// Present flag, written without `#` or `=`
    #[default]
    Boolean,
    Number(i32),
    String {
        value: Symbol,
        padding: Option<Padding>,
    },
}

/// One `key`, `key#number` or `key=string` item of an entry
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Capability {
    pub key: Symbol,
    pub value: Value,
}

impl Capability {
    /// Render as it would appear in a termcap entry
    pub fn render(&self, table: &SymbolTable) -> String {
        let key = table.render(self.key);
        match self.value {
            Value::Boolean => key,
            Value::Number(number) => format!("{key}#{number}"),
            Value::String { value, padding } => {
                let padding = padding.map(|padding| padding.to_string()).unwrap_or_default();
                format!("{key}={padding}{}", table.render(value))
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn default_is_boolean() {
        assert_eq!(Capability::default().value, Value::Boolean);
    }

    #[test]
    fn render_each_kind() {
        let mut table = SymbolTable::new();
        let key = table.intern(b"am");
        assert_eq!(Capability { key, value: Value::Boolean }.render(&table), "am");
        let key = table.intern(b"co");
        let number = Capability {
            key,
            value: Value::Number(80),
        };
        assert_eq!(number.render(&table), "co#80");
        let key = table.intern(b"cl");
        let value = table.intern(b"\x1b[H\x1b[J");
        let string = Capability {
            key,
            value: Value::String {
                value,
                padding: Some(Padding {
                    delay: 50,
                    proportional: true,
                }),
            },
        };
        assert_eq!(string.render(&table), "cl=50*\\E[H\\E[J");
        let zero = Capability {
            key,
            value: Value::String {
                value,
                padding: Some(Padding {
                    delay: 0,
                    proportional: true,
                }),
            },
        };
        assert_eq!(zero.render(&table), "cl=0*\\E[H\\E[J");
    }

    #[test]
    fn padding_directive() {
        assert_eq!(
            Padding::parse_directive(b"\\E[H$<5*/>"),
            Some(Padding {
                delay: 5,
                proportional: true
            })
        );
        assert_eq!(
            Padding::parse_directive(b"$<120>"),
            Some(Padding {
                delay: 120,
                proportional: false
            })
        );
        assert_eq!(Padding::parse_directive(b"\\E[H"), None);
        assert_eq!(Padding::parse_directive(b"<5/>"), None);
        assert_eq!(Padding::parse_directive(b"$<x/>"), None);
    }
}
