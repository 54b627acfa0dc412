// Copyright 2025 Pavel Roskin
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Conversion of termcap string capabilities to terminfo syntax
//!
//! Termcap codes take their argument from one of two registers that alternate after each
//! code. Terminfo pushes parameters explicitly, so every code becomes a `%p1` or `%p2`
//! push followed by the terminfo operator. Leading padding moves to a trailing `$<..>`.

use crate::capability::Padding;

/// Size of the working buffer, including room for a final NUL
pub const CAPACITY: usize = 1024;

// `%p0` is replaced with the current register
const FMT_BCD: &[u8] = b"%p0%{10}%/%{16}%*%p0%{10}%m%+";
const FMT_DIVMOD: &[u8] = b"%p0%p0%{2}%*%-";
const FMT_IF: &[u8] = b"%p0%p0%?";
const FMT_THEN: &[u8] = b"%>%t";
const FMT_ELSE: &[u8] = b"%+%;";

/// Errors reported when converting a capability
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// The converted string does not fit the working buffer
    #[error("Out of memory: converted string exceeds {CAPACITY} bytes")]
    Overflow,
}

/// Bounded output buffer
struct Output {
    buffer: Vec<u8>,
}

impl Output {
    fn new(hint: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(hint.min(CAPACITY)),
        }
    }

    fn push(&mut self, bytes: &[u8]) -> Result<(), Error> {
        if self.buffer.len() + bytes.len() >= CAPACITY {
            return Err(Error::Overflow);
        }
        self.buffer.extend_from_slice(bytes);
        Ok(())
    }

    /// Push of register `register`, unless the previous code left its value on the stack
    fn param(&mut self, register: u8, pushed: &mut bool) -> Result<(), Error> {
        if *pushed {
            *pushed = false;
            return Ok(());
        }
        self.push(&[b'%', b'p', b'0' + register])
    }

    fn template(&mut self, template: &[u8], register: u8) -> Result<(), Error> {
        let mut patched = Vec::with_capacity(template.len());
        for &byte in template {
            if byte == b'0' && patched.ends_with(b"%p") {
                patched.push(b'0' + register);
            } else {
                patched.push(byte);
            }
        }
        self.push(&patched)
    }

    /// Character constant, quoted when printable and numeric otherwise
    fn constant(&mut self, value: u8) -> Result<(), Error> {
        if value.is_ascii_graphic() && !matches!(value, b',' | b'\'' | b'\\' | b':') {
            self.push(&[b'%', b'\'', value, b'\''])
        } else {
            self.push(format!("%{{{value}}}").as_bytes())
        }
    }
}

/// Decode the character operand following `%+` or `%>` starting at `*pos`
///
/// Understands `\` with octal digits and `^X`. A missing operand reads as NUL.
fn operand(body: &[u8], pos: &mut usize) -> u8 {
    let Some(&first) = body.get(*pos) else {
        return 0;
    };
    *pos += 1;
    match first {
        b'\\' => match body.get(*pos) {
            None => b'\\',
            Some(b'0'..=b'3') => {
                let mut value = 0u8;
                while let Some(&digit @ b'0'..=b'7') = body.get(*pos) {
                    value = value.wrapping_mul(8).wrapping_add(digit - b'0');
                    *pos += 1;
                }
                value
            }
            Some(&escaped) => {
                *pos += 1;
                escaped
            }
        },
        b'^' => match body.get(*pos) {
            None => 0,
            Some(&control) => {
                *pos += 1;
                control & 0x1f
            }
        },
        _ => first,
    }
}

/// Split `digits[.digits][*]` off the front of a capability
fn split_padding(cap: &[u8]) -> (Option<&[u8]>, &[u8]) {
    if !cap.first().is_some_and(u8::is_ascii_digit) {
        return (None, cap);
    }
    let mut end = cap
        .iter()
        .position(|&c| !c.is_ascii_digit() && c != b'.')
        .unwrap_or(cap.len());
    if cap.get(end) == Some(&b'*') {
        end += 1;
    }
    (Some(&cap[..end]), &cap[end..])
}

/// Convert a termcap string, which may start with a padding count, to terminfo syntax
pub fn transcode(cap: &[u8]) -> Result<Vec<u8>, Error> {
    let (padding, body) = split_padding(cap);
    convert(body, padding)
}

/// Convert a string whose padding was parsed separately
pub fn transcode_parts(body: &[u8], padding: Option<Padding>) -> Result<Vec<u8>, Error> {
    let padding = padding.map(|padding| padding.to_string());
    convert(body, padding.as_deref().map(str::as_bytes))
}

fn convert(body: &[u8], padding: Option<&[u8]>) -> Result<Vec<u8>, Error> {
    let mut output = Output::new(body.len() * 2);
    let mut register = 1u8;
    // the value for the next code is already on the stack
    let mut pushed = false;
    let mut pos = 0;

    while let Some(&c) = body.get(pos) {
        pos += 1;
        if c != b'%' {
            if c == b',' {
                output.push(b"\\,")?;
            } else {
                output.push(&[c])?;
            }
            continue;
        }
        let Some(&code) = body.get(pos) else {
            output.push(b"%")?;
            break;
        };
        pos += 1;
        match code {
            b'B' => {
                output.template(FMT_BCD, register)?;
                pushed = true;
                continue;
            }
            b'D' => {
                output.template(FMT_DIVMOD, register)?;
                pushed = true;
                continue;
            }
            b'>' => {
                output.template(FMT_IF, register)?;
                output.constant(operand(body, &mut pos))?;
                output.push(FMT_THEN)?;
                output.constant(operand(body, &mut pos))?;
                output.push(FMT_ELSE)?;
                pushed = true;
                continue;
            }
            // terminfo has no reversal, swapping the registers is enough
            b'r' => {}
            b'2' | b'3' | b'd' => {
                output.param(register, &mut pushed)?;
                if code == b'd' {
                    output.push(b"%d")?;
                } else {
                    output.push(&[b'%', code, b'd'])?;
                }
            }
            b'+' => {
                output.param(register, &mut pushed)?;
                output.constant(operand(body, &mut pos))?;
                output.push(b"%+%c")?;
            }
            b'.' => {
                output.param(register, &mut pushed)?;
                output.push(b"%c")?;
            }
            b'i' => {
                output.push(b"%i")?;
                continue;
            }
            _ => output.push(&[b'%', code])?,
        }
        register = 3 - register;
    }

    // a final lone backslash would escape the terminating comma in terminfo
    if let [.., prev, b'\\'] | [prev @ b'\\'] = output.buffer.as_slice()
        && (output.buffer.len() == 1 || !matches!(prev, b'\\' | b'^'))
    {
        output.push(b"\\")?;
    }

    if let Some(padding) = padding {
        output.push(b"$<")?;
        output.push(padding)?;
        output.push(b"/>")?;
    }

    Ok(output.buffer)
}
