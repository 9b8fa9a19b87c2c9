//! Command-line rewriter
//!
//! Replaces the invoked program with the real tool and inserts fixed flags.
//! The rewrite is purely textual: arguments after the first token are copied
//! byte for byte, in order, and are never reparsed or validated.

use crate::command_line::first_token_end;

/// Where the configured flags are inserted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// All flags precede the original arguments (e.g. a linker)
    PrefixOnly,
    /// Some flags must follow every original argument (e.g. a compiler whose
    /// linker options come after its own `/link` marker)
    PrefixAndSuffix,
}

/// Fixed configuration of one wrapper instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WrapperConfig<'a> {
    /// Path of the real tool, as it should appear on the new command line
    pub real_program: &'a str,
    /// Flags inserted before the original arguments (may be empty)
    pub pre_flags: &'a str,
    /// Flags appended after the original arguments (may be empty)
    pub post_flags: &'a str,
}

impl<'a> WrapperConfig<'a> {
    /// Create a configuration; usable in `const` items
    pub const fn new(real_program: &'a str, pre_flags: &'a str, post_flags: &'a str) -> Self {
        Self {
            real_program,
            pre_flags,
            post_flags,
        }
    }

    /// Get where the flags go, based on whether there are post flags
    pub fn variant(&self) -> Variant {
        if self.post_flags.is_empty() {
            Variant::PrefixOnly
        } else {
            Variant::PrefixAndSuffix
        }
    }

    /// Build the command line for the real tool.
    ///
    /// `real_program + " " + pre_flags + <raw after its first token>`, then
    /// `" " + post_flags` when there are post flags. The copied remainder keeps
    /// the space that separated the original program from its arguments.
    pub fn rewrite(&self, raw: &str) -> String {
        let remainder = &raw[first_token_end(raw)..];

        let mut line = String::with_capacity(
            self.real_program.len()
                + self.pre_flags.len()
                + remainder.len()
                + self.post_flags.len()
                + 2,
        );
        line.push_str(self.real_program);
        line.push(' ');
        line.push_str(self.pre_flags);
        line.push_str(remainder);

        if self.variant() == Variant::PrefixAndSuffix {
            line.push(' ');
            line.push_str(self.post_flags);
        }

        line
    }
}
