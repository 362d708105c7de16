use crate::config::JitOption;

/// The set of user configurable options for compiling a regex. This is
/// shared among all top-level regex APIs.
#[derive(Clone, Debug)]
pub(crate) struct RegexOptions {
    pub(crate) pattern: String,
    pub(crate) case_insensitive: bool,
    pub(crate) multi_line: bool,
    pub(crate) dot_matches_new_line: bool,
    pub(crate) swap_greed: bool,
    pub(crate) ignore_whitespace: bool,
    pub(crate) unicode: bool,
    pub(crate) size_limit: usize,
    pub(crate) dfa_size_limit: usize,
    pub(crate) nest_limit: u32,
    /// Overrides the process-wide JIT option when set.
    pub(crate) jit: Option<JitOption>,
    pub(crate) always_extended: bool,
}

impl RegexOptions {
    pub(crate) fn new(pattern: &str) -> RegexOptions {
        RegexOptions {
            pattern: pattern.to_owned(),
            case_insensitive: false,
            multi_line: false,
            dot_matches_new_line: false,
            swap_greed: false,
            ignore_whitespace: false,
            unicode: true,
            size_limit: 10 * (1 << 20),
            dfa_size_limit: 2 * (1 << 20),
            nest_limit: 250,
            jit: None,
            always_extended: false,
        }
    }
}

macro_rules! define_builder {
    ($name:ident, $regex_mod:ident, $utf8:expr) => {
        pub mod $name {
            use crate::{
                config::JitOption, error::Error, exec::Exec,
                $regex_mod::Regex,
            };

            use super::RegexOptions;

            /// A configurable builder for a regular expression.
            ///
            /// A builder can be used to configure how the regex is built, for
            /// example, by setting the default flags (which can be overridden
            /// in the expression itself) or setting various limits.
            ///
            /// Flags apply to whichever engine the pattern is routed to.
            /// Limits that only make sense for one engine are documented as
            /// such and ignored by the other.
            #[derive(Clone, Debug)]
            pub struct RegexBuilder(RegexOptions);

            impl RegexBuilder {
                /// Create a new regular expression builder with the given
                /// pattern.
                ///
                /// If the pattern is invalid, then an error will be returned
                /// when `build` is called.
                pub fn new(pattern: &str) -> RegexBuilder {
                    RegexBuilder(RegexOptions::new(pattern))
                }

                /// Classify and compile the regular expression.
                ///
                /// Note that calling `as_str` on the resulting `Regex` will
                /// produce the pattern given to `new` verbatim. Notably, it
                /// will not incorporate any of the flags set on this builder.
                pub fn build(&self) -> Result<Regex, Error> {
                    Exec::open(&self.0, $utf8).map(Regex::from_exec)
                }

                /// Set the value for the case insensitive (`i`) flag.
                ///
                /// When enabled, letters in the pattern will match both upper
                /// case and lower case variants.
                pub fn case_insensitive(
                    &mut self,
                    yes: bool,
                ) -> &mut RegexBuilder {
                    self.0.case_insensitive = yes;
                    self
                }

                /// Set the value for the multi-line matching (`m`) flag.
                ///
                /// When enabled, `^` matches the beginning of lines and `$`
                /// matches the end of lines.
                ///
                /// By default, they match beginning/end of the input.
                pub fn multi_line(&mut self, yes: bool) -> &mut RegexBuilder {
                    self.0.multi_line = yes;
                    self
                }

                /// Set the value for the any character (`s`) flag, where in
                /// `.` matches anything when `s` is set and matches anything
                /// except for new line when it is not set (the default).
                pub fn dot_matches_new_line(
                    &mut self,
                    yes: bool,
                ) -> &mut RegexBuilder {
                    self.0.dot_matches_new_line = yes;
                    self
                }

                /// Set the value for the greedy swap (`U`) flag.
                ///
                /// When enabled, a pattern like `a*` is lazy (tries to find
                /// shortest match) and `a*?` is greedy (tries to find longest
                /// match).
                ///
                /// By default, `a*` is greedy and `a*?` is lazy.
                pub fn swap_greed(&mut self, yes: bool) -> &mut RegexBuilder {
                    self.0.swap_greed = yes;
                    self
                }

                /// Set the value for the ignore whitespace (`x`) flag.
                ///
                /// When enabled, whitespace such as new lines and spaces will
                /// be ignored between expressions of the pattern, and `#` can
                /// be used to start a comment until the next new line.
                pub fn ignore_whitespace(
                    &mut self,
                    yes: bool,
                ) -> &mut RegexBuilder {
                    self.0.ignore_whitespace = yes;
                    self
                }

                /// Set the value for the Unicode (`u`) flag.
                ///
                /// Enabled by default. When disabled, character classes such
                /// as `\w` only match ASCII word characters instead of all
                /// Unicode word characters.
                pub fn unicode(&mut self, yes: bool) -> &mut RegexBuilder {
                    self.0.unicode = yes;
                    self
                }

                /// Set the approximate size limit of the compiled regular
                /// expression. Only the simple engine enforces this limit.
                ///
                /// This roughly corresponds to the number of bytes occupied by
                /// a single compiled program. If the program exceeds this
                /// number, then a compilation error is returned.
                pub fn size_limit(
                    &mut self,
                    limit: usize,
                ) -> &mut RegexBuilder {
                    self.0.size_limit = limit;
                    self
                }

                /// Set the approximate size of the cache used by the simple
                /// engine's lazy DFA.
                ///
                /// Note that this is a *per thread* limit.
                pub fn dfa_size_limit(
                    &mut self,
                    limit: usize,
                ) -> &mut RegexBuilder {
                    self.0.dfa_size_limit = limit;
                    self
                }

                /// Set the nesting limit of the simple engine's parser.
                ///
                /// The nesting limit controls how deep the abstract syntax
                /// tree is allowed to be. If the AST exceeds the given limit
                /// (e.g., with too many nested groups), then an error is
                /// returned by the parser.
                pub fn nest_limit(&mut self, limit: u32) -> &mut RegexBuilder {
                    self.0.nest_limit = limit;
                    self
                }

                /// Set how this pattern is JIT compiled if it is routed to the
                /// extended engine, overriding the process-wide default set
                /// with [`set_jit_option`](crate::set_jit_option).
                pub fn jit(&mut self, option: JitOption) -> &mut RegexBuilder {
                    self.0.jit = Some(option);
                    self
                }

                /// Route this pattern to the extended engine even if the
                /// simple engine could run it.
                ///
                /// This is useful when a pattern must behave exactly as it
                /// does in PCRE, since the two engines differ in a few corners
                /// (for example, `$` in PCRE also matches before a final new
                /// line).
                ///
                /// Disabled by default.
                pub fn always_extended(
                    &mut self,
                    yes: bool,
                ) -> &mut RegexBuilder {
                    self.0.always_extended = yes;
                    self
                }
            }
        }
    };
}

define_builder!(bytes, re_bytes, false);
define_builder!(unicode, re_unicode, true);
