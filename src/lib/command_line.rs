//! Command-line tokenizer
//!
//! Works on the raw, unparsed command line a process receives from the OS.
//! Only the first token (the invoked program) is located by `first_token_end`;
//! the remainder of the line is never reparsed on the rewrite path.
//!
//! Hosts that deliver argv instead of a raw line (Unix) get a line rebuilt with
//! `join_arguments`, and the launcher splits the rewritten line back with
//! `split_arguments`, using the same quoting rules as the MSVC runtime.

use std::iter;

use tracing::warn;

/// Find the end of the first token of a raw command line.
///
/// Returns the byte offset of the first space that is neither inside double
/// quotes nor escaped, or the length of the line when there is none (including
/// an unterminated quote). Every delimiter is ASCII, so the offset is always a
/// valid char boundary.
pub fn first_token_end(raw: &str) -> usize {
    let mut in_quote = false;
    let mut in_escape = false;

    for (pos, byte) in raw.bytes().enumerate() {
        match byte {
            b' ' if !in_quote && !in_escape => return pos,
            // Backslashes only escape inside quotes
            b'\\' if in_quote => in_escape = !in_escape,
            b'"' if !in_escape => in_quote = !in_quote,
            // The escape covers exactly one character (an escaped quote included)
            _ if in_escape => in_escape = false,
            _ => {}
        }
    }

    raw.len()
}

/// Get the program named by the first token, with its quotes removed
pub fn program_name(command_line: &str) -> String {
    command_line[..first_token_end(command_line)].replace('"', "")
}

/// Split a command line into argv.
///
/// The first element is `program_name`. The arguments after it follow the
/// MSVC runtime rules:
/// - spaces and tabs separate arguments outside quotes
/// - 2n backslashes followed by a quote produce n backslashes, and the quote
///   opens or closes a quoted region
/// - 2n+1 backslashes followed by a quote produce n backslashes and a literal quote
/// - `""` inside a quoted region produces a literal quote
/// - backslashes not followed by a quote are literal
pub fn split_arguments(command_line: &str) -> Vec<String> {
    if command_line.is_empty() {
        return Vec::new();
    }

    let mut args = vec![program_name(command_line)];
    let mut chars = command_line[first_token_end(command_line)..]
        .chars()
        .peekable();

    loop {
        while matches!(chars.peek(), Some(' ' | '\t')) {
            chars.next();
        }
        if chars.peek().is_none() {
            break;
        }

        let mut arg = String::new();
        let mut in_quote = false;
        let mut backslashes = 0usize;

        while let Some(c) = chars.next() {
            match c {
                '\\' => backslashes += 1,
                '"' => {
                    arg.extend(iter::repeat('\\').take(backslashes / 2));
                    if backslashes % 2 == 1 {
                        arg.push('"');
                    } else if in_quote && chars.peek() == Some(&'"') {
                        arg.push('"');
                        chars.next();
                    } else {
                        in_quote = !in_quote;
                    }
                    backslashes = 0;
                }
                ' ' | '\t' if !in_quote => break,
                _ => {
                    arg.extend(iter::repeat('\\').take(backslashes));
                    arg.push(c);
                    backslashes = 0;
                }
            }
        }

        arg.extend(iter::repeat('\\').take(backslashes));
        args.push(arg);
    }

    args
}

/// Quote a single argument so that `split_arguments` reads it back unchanged
pub fn quote_argument(arg: &str) -> String {
    if !arg.is_empty() && !arg.contains([' ', '\t', '\n', '\x0b', '"']) {
        return arg.to_string();
    }

    let mut quoted = String::with_capacity(arg.len() + 2);
    quoted.push('"');

    let mut backslashes = 0usize;
    for c in arg.chars() {
        match c {
            '\\' => backslashes += 1,
            '"' => {
                quoted.extend(iter::repeat('\\').take(backslashes * 2 + 1));
                quoted.push('"');
                backslashes = 0;
            }
            _ => {
                quoted.extend(iter::repeat('\\').take(backslashes));
                quoted.push(c);
                backslashes = 0;
            }
        }
    }

    // Trailing backslashes must not escape the closing quote
    quoted.extend(iter::repeat('\\').take(backslashes * 2));
    quoted.push('"');
    quoted
}

/// Join argv into a single command line
pub fn join_arguments<S: AsRef<str>>(args: &[S]) -> String {
    args.iter()
        .map(|arg| quote_argument(arg.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Get the raw command line of the current process
#[cfg(windows)]
pub fn current() -> String {
    use windows_sys::Win32::System::Environment::GetCommandLineW;

    // The buffer returned by GetCommandLineW lives as long as the process
    let wide = unsafe {
        let ptr = GetCommandLineW();
        let len = (0..).take_while(|&i| *ptr.add(i) != 0).count();
        std::slice::from_raw_parts(ptr, len)
    };

    match String::from_utf16(wide) {
        Ok(line) => line,
        Err(_) => {
            warn!("Command line is not valid UTF-16; invalid sequences replaced");
            String::from_utf16_lossy(wide)
        }
    }
}

/// Get the raw command line of the current process
///
/// Unix hands over argv, so the line is rebuilt with `join_arguments`.
#[cfg(not(windows))]
pub fn current() -> String {
    let args: Vec<String> = std::env::args_os()
        .map(|arg| {
            arg.into_string().unwrap_or_else(|arg| {
                warn!("Argument is not valid UTF-8; invalid sequences replaced");
                arg.to_string_lossy().into_owned()
            })
        })
        .collect();

    join_arguments(&args)
}
