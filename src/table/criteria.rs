use std::fmt;

/// One condition on a single field.
///
/// Either an exact string match or an arbitrary test over the field text.
pub enum Criterion<'a> {
    Equals(String),
    Matches(Box<dyn Fn(&str) -> bool + 'a>),
}

impl<'a> Criterion<'a> {
    pub fn equals(value: impl Into<String>) -> Self {
        Criterion::Equals(value.into())
    }

    pub fn matches<F>(predicate: F) -> Self
    where
        F: Fn(&str) -> bool + 'a,
    {
        Criterion::Matches(Box::new(predicate))
    }

    pub fn test(&self, field: &str) -> bool {
        match self {
            Criterion::Equals(value) => field == value,
            Criterion::Matches(predicate) => predicate(field),
        }
    }
}

impl fmt::Debug for Criterion<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Criterion::Equals(value) => f.debug_tuple("Equals").field(value).finish(),
            Criterion::Matches(_) => f.write_str("Matches(<fn>)"),
        }
    }
}

impl From<&str> for Criterion<'_> {
    fn from(value: &str) -> Self {
        Criterion::Equals(value.to_string())
    }
}

impl From<String> for Criterion<'_> {
    fn from(value: String) -> Self {
        Criterion::Equals(value)
    }
}
