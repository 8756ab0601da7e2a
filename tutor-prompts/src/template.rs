//! Code-based prompt template system with variable substitution.

use std::collections::HashMap;

/// Result alias for template operations.
pub type TemplateResult<T> = Result<T, TemplateError>;

/// Errors that can occur during template operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TemplateError {
    /// A required variable was not provided.
    #[error("missing required variable: {name}")]
    MissingVariable {
        /// Name of the missing variable.
        name: String,
    },

    /// The template text is inconsistent with its declared variables.
    #[error("invalid template: {reason}")]
    InvalidTemplate {
        /// Reason for the failure.
        reason: String,
    },
}

/// A code-based prompt template with variable substitution.
///
/// Placeholders use `{{variable}}` syntax. Rendering is a single left-to-right
/// pass: substituted values are copied verbatim and never scanned again, so a
/// value that itself contains `{{...}}` stays literal in the output.
///
/// # Examples
///
/// ```
/// use tutor_prompts::template::PromptTemplate;
///
/// let template = PromptTemplate::builder("Explain {{formula}} to a {{grade}} student.")
///     .with_required_variable("formula")
///     .with_variable("grade", "고1")
///     .build()
///     .unwrap();
///
/// let rendered = template
///     .render_with(&[("formula".to_owned(), "a+b".to_owned())].into())
///     .unwrap();
/// assert_eq!(rendered, "Explain a+b to a 고1 student.");
/// ```
#[derive(Clone, Debug)]
pub struct PromptTemplate {
    template: String,
    variables: HashMap<String, String>,
    required_variables: Vec<String>,
}

impl PromptTemplate {
    /// Creates a new template with the supplied text.
    #[must_use]
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            variables: HashMap::new(),
            required_variables: Vec::new(),
        }
    }

    /// Returns a builder for constructing templates.
    #[must_use]
    pub fn builder(template: impl Into<String>) -> TemplateBuilder {
        TemplateBuilder::new(template)
    }

    /// Renders the template with the current variables.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::MissingVariable`] if a required variable is not set.
    pub fn render(&self) -> TemplateResult<String> {
        self.render_with(&HashMap::new())
    }

    /// Renders the template with additional runtime variables.
    ///
    /// Runtime variables override template defaults. Optional placeholders with
    /// no value render as the empty string.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::MissingVariable`] if a required variable is not set.
    pub fn render_with(&self, runtime_vars: &HashMap<String, String>) -> TemplateResult<String> {
        let mut rendered = String::with_capacity(self.template.len());

        for segment in Segments::new(&self.template) {
            match segment {
                Segment::Literal(text) => rendered.push_str(text),
                Segment::Placeholder(name) => {
                    let value = runtime_vars
                        .get(name)
                        .or_else(|| self.variables.get(name));
                    match value {
                        Some(value) => rendered.push_str(value),
                        None if self.is_required(name) => {
                            return Err(TemplateError::MissingVariable {
                                name: name.to_owned(),
                            });
                        }
                        None => {}
                    }
                }
            }
        }

        Ok(rendered)
    }

    /// Returns the distinct placeholder names in order of first appearance.
    #[must_use]
    pub fn placeholders(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for segment in Segments::new(&self.template) {
            if let Segment::Placeholder(name) = segment {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names
    }

    fn is_required(&self, name: &str) -> bool {
        self.required_variables.iter().any(|required| required == name)
    }
}

/// Builder for constructing prompt templates.
pub struct TemplateBuilder {
    template: String,
    variables: HashMap<String, String>,
    required_variables: Vec<String>,
}

impl TemplateBuilder {
    /// Creates a new builder with the supplied template text.
    #[must_use]
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            variables: HashMap::new(),
            required_variables: Vec::new(),
        }
    }

    /// Sets a variable with a default value.
    #[must_use]
    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    /// Declares a required variable (must be provided at render time).
    #[must_use]
    pub fn with_required_variable(mut self, name: impl Into<String>) -> Self {
        self.required_variables.push(name.into());
        self
    }

    /// Builds the template.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::InvalidTemplate`] if a required variable has no
    /// matching placeholder in the template text.
    pub fn build(self) -> TemplateResult<PromptTemplate> {
        let template = PromptTemplate {
            template: self.template,
            variables: self.variables,
            required_variables: self.required_variables,
        };

        let placeholders = template.placeholders();
        if let Some(orphan) = template
            .required_variables
            .iter()
            .find(|name| !placeholders.contains(&name.as_str()))
        {
            return Err(TemplateError::InvalidTemplate {
                reason: format!("required variable `{orphan}` never appears in the template"),
            });
        }

        Ok(template)
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Segment<'a> {
    Literal(&'a str),
    Placeholder(&'a str),
}

/// Splits template text into literal runs and `{{name}}` placeholders.
///
/// An unterminated `{{` or an empty `{{}}` is kept as literal text.
struct Segments<'a> {
    rest: &'a str,
}

impl<'a> Segments<'a> {
    const fn new(template: &'a str) -> Self {
        Self { rest: template }
    }
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }

        let Some(open) = self.rest.find("{{") else {
            let literal = self.rest;
            self.rest = "";
            return Some(Segment::Literal(literal));
        };

        if open > 0 {
            let (literal, rest) = self.rest.split_at(open);
            self.rest = rest;
            return Some(Segment::Literal(literal));
        }

        let inner = &self.rest[2..];
        match inner.find("}}") {
            Some(close) if !inner[..close].trim().is_empty() => {
                let name = inner[..close].trim();
                self.rest = &inner[close + 2..];
                Some(Segment::Placeholder(name))
            }
            Some(close) => {
                let (literal, rest) = self.rest.split_at(close + 4);
                self.rest = rest;
                Some(Segment::Literal(literal))
            }
            None => {
                let literal = self.rest;
                self.rest = "";
                Some(Segment::Literal(literal))
            }
        }
    }
}
