//! Positional message formatting for the `*_fmt` logging methods
//!
//! Format strings use numbered placeholders resolved at runtime:
//!
//! - `{0}`: argument 0
//! - `{1,8}` / `{1,-8}`: argument 1 right / left aligned in 8 columns
//! - `{2:spec}`: argument 2 rendered by the [`FormatProvider`] with `spec`
//! - `{{` and `}}`: literal braces
//!
//! ```
//! use async_event_log::core::format::format_positional;
//!
//! let msg = format_positional("{0} of {1,3} done", &[&"task", &7]).unwrap();
//! assert_eq!(msg, "task of   7 done");
//! ```

use super::error::{LoggerError, Result};
use std::fmt::Display;

/// Alignments at or beyond this many columns are rejected
const MAX_ALIGNMENT: u32 = 1_000_000;

/// Renders a single argument for a placeholder
pub trait FormatProvider: Send + Sync {
    /// Render `arg` using the placeholder's `spec` (empty when absent).
    ///
    /// Returns a description of the problem for specs it does not understand.
    fn format_arg(&self, arg: &dyn Display, spec: &str) -> std::result::Result<String, String>;
}

/// Default provider: plain `Display`, no format specifiers
#[derive(Debug, Clone, Copy, Default)]
pub struct Invariant;

impl FormatProvider for Invariant {
    fn format_arg(&self, arg: &dyn Display, spec: &str) -> std::result::Result<String, String> {
        if spec.is_empty() {
            Ok(arg.to_string())
        } else {
            Err(format!("unsupported format specifier '{}'", spec))
        }
    }
}

/// Format with the [`Invariant`] provider
pub fn format_positional(format: &str, args: &[&dyn Display]) -> Result<String> {
    format_positional_with(&Invariant, format, args)
}

/// Format `format` by substituting numbered placeholders from `args`
pub fn format_positional_with(
    provider: &dyn FormatProvider,
    format: &str,
    args: &[&dyn Display],
) -> Result<String> {
    let mut out = String::with_capacity(format.len() + args.len() * 8);
    let mut chars = format.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {
        match c {
            '{' => {
                if matches!(chars.peek(), Some((_, '{'))) {
                    chars.next();
                    out.push('{');
                    continue;
                }
                let start = pos + 1;
                let end = loop {
                    match chars.next() {
                        Some((i, '}')) => break i,
                        Some((i, '{')) => {
                            return Err(LoggerError::format(i, "unexpected '{' inside placeholder"))
                        }
                        Some(_) => {}
                        None => return Err(LoggerError::format(pos, "unclosed placeholder")),
                    }
                };
                let placeholder = Placeholder::parse(&format[start..end], pos)?;
                let arg = args.get(placeholder.index).ok_or_else(|| {
                    LoggerError::format(
                        pos,
                        format!(
                            "argument index {} is out of range ({} arguments)",
                            placeholder.index,
                            args.len()
                        ),
                    )
                })?;
                let rendered = provider
                    .format_arg(*arg, placeholder.spec)
                    .map_err(|message| LoggerError::format(pos, message))?;
                placeholder.write_aligned(&mut out, &rendered);
            }
            '}' => {
                if matches!(chars.peek(), Some((_, '}'))) {
                    chars.next();
                    out.push('}');
                } else {
                    return Err(LoggerError::format(pos, "unmatched '}'"));
                }
            }
            _ => out.push(c),
        }
    }

    Ok(out)
}

struct Placeholder<'a> {
    index: usize,
    alignment: i32,
    spec: &'a str,
}

impl<'a> Placeholder<'a> {
    /// Parse `index[,alignment][:spec]`
    fn parse(body: &'a str, pos: usize) -> Result<Self> {
        let (head, spec) = match body.split_once(':') {
            Some((head, spec)) => (head, spec),
            None => (body, ""),
        };
        let (index, alignment) = match head.split_once(',') {
            Some((index, alignment)) => (index, Some(alignment)),
            None => (head, None),
        };

        let index = index
            .trim()
            .parse::<usize>()
            .map_err(|_| LoggerError::format(pos, format!("invalid argument index '{}'", index)))?;
        let alignment = match alignment {
            Some(a) => a
                .trim()
                .parse::<i32>()
                .map_err(|_| LoggerError::format(pos, format!("invalid alignment '{}'", a)))?,
            None => 0,
        };
        if alignment.unsigned_abs() >= MAX_ALIGNMENT {
            return Err(LoggerError::format(pos, "alignment out of range"));
        }

        Ok(Self {
            index,
            alignment,
            spec,
        })
    }

    /// Pad to `|alignment|` columns; negative aligns left
    fn write_aligned(&self, out: &mut String, rendered: &str) {
        let width = self.alignment.unsigned_abs() as usize;
        let padding = width.saturating_sub(rendered.chars().count());
        if self.alignment < 0 {
            out.push_str(rendered);
            out.extend(std::iter::repeat(' ').take(padding));
        } else {
            out.extend(std::iter::repeat(' ').take(padding));
            out.push_str(rendered);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positional_substitution() {
        let msg = format_positional("{1} before {0}, {1} again", &[&"a", &2]).unwrap();
        assert_eq!(msg, "2 before a, 2 again");
    }

    #[test]
    fn test_no_arguments() {
        assert_eq!(format_positional("plain", &[]).unwrap(), "plain");
    }

    #[test]
    fn test_escaped_braces() {
        let msg = format_positional("{{{0}}}", &[&"x"]).unwrap();
        assert_eq!(msg, "{x}");
    }

    #[test]
    fn test_alignment() {
        let msg = format_positional("[{0,5}][{0,-5}]", &[&"ab"]).unwrap();
        assert_eq!(msg, "[   ab][ab   ]");
    }

    #[test]
    fn test_wide_alignment_is_padded() {
        let msg = format_positional("{0,70000}|{0,-70000}", &[&1]).unwrap();
        assert_eq!(msg.len(), 70_000 * 2 + 1);
        assert!(msg.starts_with(' '));
        assert_eq!(&msg[69_999..70_002], "1|1");
        assert!(msg.ends_with(' '));
    }

    #[test]
    fn test_alignment_out_of_range() {
        for format in ["{0,1000000}", "{0,-1000000}", "{0,2147483647}"] {
            let err = format_positional(format, &[&1]).unwrap_err();
            assert!(matches!(err, LoggerError::FormatError { position: 0, .. }));
        }
        assert!(format_positional("{0,999999}", &[&1]).is_ok());
    }

    #[test]
    fn test_index_out_of_range() {
        let err = format_positional("{0} {2}", &[&1, &2]).unwrap_err();
        assert!(matches!(err, LoggerError::FormatError { position: 4, .. }));
    }

    #[test]
    fn test_malformed_strings() {
        assert!(format_positional("{0", &[&1]).is_err());
        assert!(format_positional("0}", &[&1]).is_err());
        assert!(format_positional("{x}", &[&1]).is_err());
        assert!(format_positional("{0,y}", &[&1]).is_err());
        assert!(format_positional("{0:N2}", &[&1]).is_err());
    }

    struct Hex;

    impl FormatProvider for Hex {
        fn format_arg(&self, arg: &dyn Display, spec: &str) -> std::result::Result<String, String> {
            match spec {
                "" => Ok(arg.to_string()),
                "X" => arg
                    .to_string()
                    .parse::<u64>()
                    .map(|n| format!("{:X}", n))
                    .map_err(|e| e.to_string()),
                other => Err(format!("unknown spec {}", other)),
            }
        }
    }

    #[test]
    fn test_custom_provider() {
        let msg = format_positional_with(&Hex, "0x{0:X} ({0})", &[&255]).unwrap();
        assert_eq!(msg, "0xFF (255)");
    }
}
