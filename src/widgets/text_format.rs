use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Label template with a single `%s` placeholder.
///
/// `%%` renders a literal percent sign. Only the first `%s` is substituted;
/// a template without a placeholder renders verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextFormat {
    template: String,
    prefix: String,
    suffix: Option<String>,
}

impl TextFormat {
    pub fn new(template: &str) -> Self {
        let mut prefix = String::new();
        let mut suffix = None;
        let mut current = String::new();
        let mut chars = template.chars().peekable();

        while let Some(c) = chars.next() {
            if c != '%' {
                current.push(c);
                continue;
            }
            match chars.peek() {
                Some('%') => {
                    chars.next();
                    current.push('%');
                }
                Some('s') if suffix.is_none() => {
                    chars.next();
                    prefix = std::mem::take(&mut current);
                    suffix = Some(String::new());
                }
                _ => current.push('%'),
            }
        }

        match suffix {
            Some(_) => suffix = Some(current),
            None => prefix = current,
        }

        Self {
            template: template.to_string(),
            prefix,
            suffix,
        }
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn has_placeholder(&self) -> bool {
        self.suffix.is_some()
    }

    pub fn format(&self, progress: i32) -> String {
        match &self.suffix {
            Some(suffix) => format!("{}{}{}", self.prefix, progress, suffix),
            None => self.prefix.clone(),
        }
    }
}

impl Default for TextFormat {
    fn default() -> Self {
        Self::new("%s")
    }
}

impl fmt::Display for TextFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.template)
    }
}

impl Serialize for TextFormat {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.template)
    }
}

impl<'de> Deserialize<'de> for TextFormat {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let template = String::deserialize(deserializer)?;
        Ok(Self::new(&template))
    }
}
