/// Settings shared by the type checker and the evaluator.
///
/// ```
/// use mexpr::Options;
///
/// let options = Options::strict().with_unquoted_strings();
/// assert!(options.strict && options.unquoted_strings);
/// assert_eq!(Options::default(), Options { strict: false, unquoted_strings: false });
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Options {
    /// A property missing from an object is an error instead of `null`.
    ///
    /// Also makes `where` abort on the first predicate error instead of
    /// excluding the offending item.
    pub strict: bool,

    /// An identifier that resolves to nothing is read as a string equal to its
    /// own name, so `status == active` compares against `"active"`.
    ///
    /// Ignored in strict mode.
    pub unquoted_strings: bool,
}

impl Options {
    pub fn strict() -> Self {
        Options {
            strict: true,
            ..Options::default()
        }
    }

    pub fn with_unquoted_strings(mut self) -> Self {
        self.unquoted_strings = true;
        self
    }

    /// Whether an unresolved identifier falls back to its own name.
    pub(crate) fn falls_back_to_name(&self) -> bool {
        self.unquoted_strings && !self.strict
    }
}
