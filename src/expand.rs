// Copyright 2025 Pavel Roskin
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Evaluation of terminfo parameter strings
//!
//! The termcap interface only ever passes integers, so this evaluator has no string
//! parameters and rejects `%l` and `%s`. Padding directives `$<..>` are dropped.

use std::iter::repeat_n;

/// Number of parameters addressable with `%p1`..`%p9`
const PARAMETERS: usize = 9;
/// Number of variables in each of the `A`-`Z` and `a`-`z` sets
const VARIABLES: usize = 26;

/// Errors reported when expanding a string
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    #[error("Not enough stack elements for operator {0}")]
    StackUnderflow(char),
    #[error("Unrecognized format option: {0}")]
    UnrecognizedFormatOption(char),
    #[error("Invalid variable name: {0}")]
    InvalidVariableName(char),
    #[error("Invalid parameter index: {0}")]
    InvalidParameterIndex(char),
    #[error("Malformed character constant")]
    MalformedCharacterConstant,
    #[error("Integer constant too large")]
    IntegerConstantOverflow,
    #[error("Integer constant malformed")]
    MalformedIntegerConstant,
    #[error("Overflow in format width")]
    FormatWidthOverflow,
    #[error("Overflow in format precision")]
    FormatPrecisionOverflow,
    #[error("String ends inside an operator")]
    UnexpectedEnd,
}

/// printf-style options between `%` and the conversion
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Flags {
    left: bool,
    sign: bool,
    space: bool,
    alternate: bool,
    zero: bool,
    width: u16,
    precision: Option<u16>,
}

/// Variables that survive between expansions
///
/// Keep one context per terminal; `%PA`..`%PZ` set in one string can be read back with
/// `%gA`..`%gZ` in a later one.
#[derive(Clone, Debug, Default)]
pub struct ExpandContext {
    static_variables: [i32; VARIABLES],
}

impl ExpandContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expand `cap` with up to nine integer parameters, missing ones are zero
    pub fn expand(&mut self, cap: &[u8], params: &[i32]) -> Result<Vec<u8>, Error> {
        let mut machine = Machine {
            cap,
            pos: 0,
            params: [0; PARAMETERS],
            incremented: false,
            stack: Vec::new(),
            dynamic_variables: [0; VARIABLES],
            static_variables: &mut self.static_variables,
            output: Vec::with_capacity(cap.len()),
        };
        for (slot, param) in machine.params.iter_mut().zip(params) {
            *slot = *param;
        }
        machine.run()?;
        Ok(machine.output)
    }
}

struct Machine<'a> {
    cap: &'a [u8],
    pos: usize,
    params: [i32; PARAMETERS],
    /// `%i` applies once per expansion
    incremented: bool,
    stack: Vec<i32>,
    dynamic_variables: [i32; VARIABLES],
    static_variables: &'a mut [i32; VARIABLES],
    output: Vec<u8>,
}

impl Machine<'_> {
    fn next_byte(&mut self) -> Option<u8> {
        let byte = self.cap.get(self.pos).copied()?;
        self.pos += 1;
        Some(byte)
    }

    fn operand(&mut self) -> Result<u8, Error> {
        self.next_byte().ok_or(Error::UnexpectedEnd)
    }

    fn pop(&mut self, op: u8) -> Result<i32, Error> {
        self.stack.pop().ok_or(Error::StackUnderflow(char::from(op)))
    }

    fn run(&mut self) -> Result<(), Error> {
        while let Some(byte) = self.next_byte() {
            match byte {
                b'%' => match self.next_byte() {
                    Some(op) => self.operator(op)?,
                    None => break,
                },
                b'$' if self.cap.get(self.pos) == Some(&b'<') => self.skip_delay(),
                _ => self.output.push(byte),
            }
        }
        Ok(())
    }

    fn skip_delay(&mut self) {
        while let Some(byte) = self.next_byte() {
            if byte == b'>' {
                break;
            }
        }
    }

    fn operator(&mut self, op: u8) -> Result<(), Error> {
        match op {
            b'%' => self.output.push(b'%'),
            b'c' => {
                // NUL cannot be sent, ncurses outputs 0200 instead
                let value = self.pop(op)?;
                self.output.push(if value == 0 { 0x80 } else { value as u8 });
            }
            b'd' | b'o' | b'x' | b'X' => {
                let value = self.pop(op)?;
                self.output.extend(format(value, op, Flags::default()));
            }
            b':' | b'#' | b' ' | b'.' | b'0'..=b'9' => {
                let (flags, conversion) = self.format_spec(op)?;
                let value = self.pop(conversion)?;
                self.output.extend(format(value, conversion, flags));
            }
            b'p' => {
                let index = self.operand()?;
                let param = match index {
                    b'1'..=b'9' => self.params[usize::from(index - b'1')],
                    _ => return Err(Error::InvalidParameterIndex(char::from(index))),
                };
                self.stack.push(param);
            }
            b'P' => {
                let name = self.operand()?;
                let value = self.pop(op)?;
                *self.variable(name)? = value;
            }
            b'g' => {
                let name = self.operand()?;
                let value = *self.variable(name)?;
                self.stack.push(value);
            }
            b'\'' => {
                let value = self.operand()?;
                if self.next_byte() != Some(b'\'') {
                    return Err(Error::MalformedCharacterConstant);
                }
                self.stack.push(i32::from(value));
            }
            b'{' => {
                let value = self.integer_constant()?;
                self.stack.push(value);
            }
            b'+' | b'-' | b'*' | b'/' | b'm' | b'&' | b'|' | b'^' | b'=' | b'<' | b'>'
            | b'A' | b'O' => {
                let right = self.pop(op)?;
                let left = self.pop(op)?;
                self.stack.push(binary(op, left, right));
            }
            b'!' => {
                let value = self.pop(op)?;
                self.stack.push(i32::from(value == 0));
            }
            b'~' => {
                let value = self.pop(op)?;
                self.stack.push(!value);
            }
            b'i' => {
                if !self.incremented {
                    self.params[0] = self.params[0].wrapping_add(1);
                    self.params[1] = self.params[1].wrapping_add(1);
                    self.incremented = true;
                }
            }
            b'?' | b';' => {}
            b't' => {
                if self.pop(op)? == 0 {
                    self.skip_branch(true);
                }
            }
            b'e' => self.skip_branch(false),
            _ => return Err(Error::UnrecognizedFormatOption(char::from(op))),
        }
        Ok(())
    }

    fn variable(&mut self, name: u8) -> Result<&mut i32, Error> {
        match name {
            b'A'..=b'Z' => Ok(&mut self.static_variables[usize::from(name - b'A')]),
            b'a'..=b'z' => Ok(&mut self.dynamic_variables[usize::from(name - b'a')]),
            _ => Err(Error::InvalidVariableName(char::from(name))),
        }
    }

    /// Digits up to the closing brace of `%{n}`
    fn integer_constant(&mut self) -> Result<i32, Error> {
        let mut value: i32 = 0;
        loop {
            match self.operand()? {
                b'}' => return Ok(value),
                digit @ b'0'..=b'9' => {
                    value = value
                        .checked_mul(10)
                        .and_then(|value| value.checked_add(i32::from(digit - b'0')))
                        .ok_or(Error::IntegerConstantOverflow)?;
                }
                _ => return Err(Error::MalformedIntegerConstant),
            }
        }
    }

    /// Read `[:][flags][width][.precision]conversion`, starting with `first`
    fn format_spec(&mut self, first: u8) -> Result<(Flags, u8), Error> {
        let mut flags = Flags::default();
        let mut byte = if first == b':' { self.operand()? } else { first };
        loop {
            match byte {
                b'-' => flags.left = true,
                b'+' => flags.sign = true,
                b' ' => flags.space = true,
                b'#' => flags.alternate = true,
                b'0' => flags.zero = true,
                _ => break,
            }
            byte = self.operand()?;
        }
        while byte.is_ascii_digit() {
            flags.width = flags
                .width
                .checked_mul(10)
                .and_then(|width| width.checked_add(u16::from(byte - b'0')))
                .ok_or(Error::FormatWidthOverflow)?;
            byte = self.operand()?;
        }
        if byte == b'.' {
            let mut precision: u16 = 0;
            byte = self.operand()?;
            while byte.is_ascii_digit() {
                precision = precision
                    .checked_mul(10)
                    .and_then(|precision| precision.checked_add(u16::from(byte - b'0')))
                    .ok_or(Error::FormatPrecisionOverflow)?;
                byte = self.operand()?;
            }
            flags.precision = Some(precision);
        }
        match byte {
            b'd' | b'o' | b'x' | b'X' => Ok((flags, byte)),
            _ => Err(Error::UnrecognizedFormatOption(char::from(byte))),
        }
    }

    /// Skip to the matching `%;`, or to the matching `%e` when `to_else` is set
    fn skip_branch(&mut self, to_else: bool) {
        let mut depth = 0usize;
        while let Some(byte) = self.next_byte() {
            if byte != b'%' {
                continue;
            }
            match self.next_byte() {
                Some(b'?') => depth += 1,
                Some(b';') if depth == 0 => return,
                Some(b';') => depth -= 1,
                Some(b'e') if to_else && depth == 0 => return,
                _ => {}
            }
        }
    }
}

fn binary(op: u8, left: i32, right: i32) -> i32 {
    match op {
        b'+' => left.wrapping_add(right),
        b'-' => left.wrapping_sub(right),
        b'*' => left.wrapping_mul(right),
        b'/' => left.checked_div(right).unwrap_or(0),
        b'm' => left.checked_rem(right).unwrap_or(0),
        b'&' => left & right,
        b'|' => left | right,
        b'^' => left ^ right,
        b'=' => i32::from(left == right),
        b'<' => i32::from(left < right),
        b'>' => i32::from(left > right),
        b'A' => i32::from(left != 0 && right != 0),
        b'O' => i32::from(left != 0 || right != 0),
        _ => 0,
    }
}

/// printf conversion of one integer
fn format(value: i32, conversion: u8, flags: Flags) -> Vec<u8> {
    let (prefix, mut digits) = match conversion {
        b'o' => ("", format!("{:o}", value as u32)),
        b'x' => (
            if flags.alternate && value != 0 { "0x" } else { "" },
            format!("{:x}", value as u32),
        ),
        b'X' => (
            if flags.alternate && value != 0 { "0X" } else { "" },
            format!("{:X}", value as u32),
        ),
        _ => {
            let sign = if value < 0 {
                "-"
            } else if flags.sign {
                "+"
            } else if flags.space {
                " "
            } else {
                ""
            };
            (sign, value.unsigned_abs().to_string())
        }
    };

    if let Some(precision) = flags.precision {
        if precision == 0 && value == 0 {
            digits.clear();
        }
        let precision = usize::from(precision);
        if digits.len() < precision {
            digits.insert_str(0, &"0".repeat(precision - digits.len()));
        }
    }
    if conversion == b'o' && flags.alternate && !digits.starts_with('0') {
        digits.insert(0, '0');
    }

    let width = usize::from(flags.width);
    let length = prefix.len() + digits.len();
    let mut output = Vec::with_capacity(width.max(length));
    if length >= width {
        output.extend_from_slice(prefix.as_bytes());
        output.extend_from_slice(digits.as_bytes());
    } else if flags.left {
        output.extend_from_slice(prefix.as_bytes());
        output.extend_from_slice(digits.as_bytes());
        output.extend(repeat_n(b' ', width - length));
    } else if flags.zero && flags.precision.is_none() {
        output.extend_from_slice(prefix.as_bytes());
        output.extend(repeat_n(b'0', width - length));
        output.extend_from_slice(digits.as_bytes());
    } else {
        output.extend(repeat_n(b' ', width - length));
        output.extend_from_slice(prefix.as_bytes());
        output.extend_from_slice(digits.as_bytes());
    }
    output
}
