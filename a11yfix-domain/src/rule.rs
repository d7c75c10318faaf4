use anyhow::{Context, bail};
use regex::Regex;

/// Insert `attribute="value"` into every `<tag` opening that does not start
/// its attribute list with `attribute=`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeRule {
    pub tag: String,
    pub attribute: String,
    pub value: String,
}

impl Default for AttributeRule {
    fn default() -> Self {
        Self {
            tag: "button".to_string(),
            attribute: "type".to_string(),
            value: "button".to_string(),
        }
    }
}

impl AttributeRule {
    /// Text placed right after the whitespace that follows the tag name.
    pub fn insertion(&self) -> String {
        format!("{}=\"{}\" ", self.attribute, self.value)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if !is_name(&self.tag) {
            bail!("invalid tag name '{}'", self.tag);
        }
        if !is_name(&self.attribute) {
            bail!("invalid attribute name '{}'", self.attribute);
        }
        if self.value.contains('"') {
            bail!("attribute value must not contain '\"': {}", self.value);
        }
        Ok(())
    }
}

fn is_name(s: &str) -> bool {
    !s.is_empty()
        && !s
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '<' | '>' | '=' | '"' | '\'' | '/'))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleOutcome {
    pub content: String,
    pub insertions: usize,
}

impl RuleOutcome {
    pub fn changed(&self) -> bool {
        self.insertions > 0
    }
}

/// Compiled form of an [`AttributeRule`].
///
/// Matching is lexical: `<tag` followed by a whitespace run. The whole run is
/// consumed before checking for `attribute=`, so an attribute that is already
/// first in the list is never duplicated, whatever whitespace precedes it.
#[derive(Debug, Clone)]
pub struct AttributeFixer {
    opening: Regex,
    present: String,
    insertion: String,
}

impl AttributeFixer {
    pub fn new(rule: AttributeRule) -> anyhow::Result<Self> {
        rule.validate()?;

        let pattern = format!(r"<{}\s+", regex::escape(&rule.tag));
        let opening =
            Regex::new(&pattern).with_context(|| format!("compile tag pattern {}", pattern))?;

        Ok(Self {
            present: format!("{}=", rule.attribute),
            insertion: rule.insertion(),
            opening,
        })
    }

    /// Rewrite `content`, returning the new text and the number of insertions.
    pub fn apply(&self, content: &str) -> RuleOutcome {
        let mut out = String::with_capacity(content.len());
        let mut last = 0;
        let mut insertions = 0;

        for m in self.opening.find_iter(content) {
            let anchor = m.end();
            if content[anchor..].starts_with(&self.present) {
                continue;
            }
            out.push_str(&content[last..anchor]);
            out.push_str(&self.insertion);
            last = anchor;
            insertions += 1;
        }
        out.push_str(&content[last..]);

        RuleOutcome {
            content: out,
            insertions,
        }
    }
}
