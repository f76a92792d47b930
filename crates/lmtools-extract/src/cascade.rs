use crate::dom::Element;
use crate::error::SelectorError;
use crate::selector::Selector;

/// Ordered list of alternative selectors for the same structural role.
///
/// The first selector that yields at least one match wins; results from
/// different selectors are never merged.
#[derive(Debug, Clone)]
pub struct SelectorCascade {
    role: String,
    selectors: Vec<Selector>,
}

impl SelectorCascade {
    pub fn parse<I, S>(role: impl Into<String>, selectors: I) -> Result<Self, SelectorError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let selectors = selectors
            .into_iter()
            .map(|s| Selector::parse(s.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            role: role.into(),
            selectors,
        })
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn selectors(&self) -> &[Selector] {
        &self.selectors
    }

    /// First descendant of `root` matched by the first selector that matches anything.
    pub fn first_in<'a>(&self, root: &'a Element) -> Option<(&'a Element, &Selector)> {
        self.selectors.iter().find_map(|selector| {
            root.query_selector(selector).map(|found| {
                tracing::trace!(role = %self.role, selector = %selector, "Selector matched");
                (found, selector)
            })
        })
    }

    /// All matches of the first selector that yields a non-empty result.
    pub fn all_in<'a>(&self, root: &'a Element) -> Option<(Vec<&'a Element>, &Selector)> {
        for (attempt, selector) in self.selectors.iter().enumerate() {
            let found = root.query_selector_all(selector);
            tracing::debug!(
                role = %self.role,
                selector = %selector,
                attempt,
                matches = found.len(),
                "Trying selector"
            );
            if !found.is_empty() {
                return Some((found, selector));
            }
        }
        None
    }
}
