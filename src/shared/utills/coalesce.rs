//! Ordered fallback chains.
//!
//! Labels, placeholders and catalog display fields are all resolved the
//! same way: walk an ordered list of candidates and take the first one
//! that is actually set. Blank strings count as unset, so a cleared form
//! input never shadows the next tier.

/// First-set-wins chain over optional string candidates.
///
/// ```ignore
/// let label = Coalesce::first(binding.override_label.as_deref())
///     .or(definition.label.as_deref())
///     .or_default(&definition.name);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coalesce<'a> {
    value: Option<&'a str>,
}

impl<'a> Coalesce<'a> {
    pub fn first(candidate: Option<&'a str>) -> Self {
        Self {
            value: set(candidate),
        }
    }

    /// Empty chain; the first `or` decides.
    pub fn empty() -> Self {
        Self { value: None }
    }

    pub fn or(self, candidate: Option<&'a str>) -> Self {
        match self.value {
            Some(_) => self,
            None => Self {
                value: set(candidate),
            },
        }
    }

    pub fn or_default(self, fallback: &'a str) -> &'a str {
        self.value.unwrap_or(fallback)
    }

    pub fn get(self) -> Option<&'a str> {
        self.value
    }
}

fn set(candidate: Option<&str>) -> Option<&str> {
    candidate.filter(|s| !s.trim().is_empty())
}
