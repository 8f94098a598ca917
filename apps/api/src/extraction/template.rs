//! Prompt templates — named extraction tasks rendered with `{{placeholder}}` substitution.
//!
//! Substitution only: no loops, conditionals or escaping. A placeholder with no matching
//! context entry is left in the rendered prompt verbatim.

use std::collections::BTreeMap;

use serde_json::Value;

/// What an extraction task produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    JobDescription,
    Resume,
}

impl TaskKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskKind::JobDescription => "job_description",
            TaskKind::Resume => "resume",
        }
    }
}

/// JSON shape expected for a top-level output field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    TextList,
    Number,
    Object,
    ObjectList,
}

impl FieldKind {
    /// Whether `value` has this shape. Numbers given as numeric strings count.
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            FieldKind::Text => value.is_string(),
            FieldKind::TextList => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_string)),
            FieldKind::Number => {
                value.is_number()
                    || value
                        .as_str()
                        .is_some_and(|s| s.trim().parse::<f64>().is_ok())
            }
            FieldKind::Object => value.is_object(),
            FieldKind::ObjectList => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_object)),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SchemaField {
    pub name: &'static str,
    pub kind: FieldKind,
}

impl SchemaField {
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind }
    }
}

/// A named prompt template plus the output fields the model is asked for.
#[derive(Debug, Clone, Copy)]
pub struct ExtractionTask {
    pub kind: TaskKind,
    pub template: &'static str,
    /// Placeholder the raw input text is bound to.
    pub input_placeholder: &'static str,
    pub schema: &'static [SchemaField],
}

impl ExtractionTask {
    /// Binds `input` to the task's input placeholder.
    pub fn context_for(&self, input: &str) -> PromptContext {
        PromptContext::new().with(self.input_placeholder, input)
    }

    /// Schema fields absent from (or null in) `value`. Informational only.
    pub fn missing_fields(&self, value: &Value) -> Vec<&'static str> {
        self.schema
            .iter()
            .filter(|field| value.get(field.name).map_or(true, Value::is_null))
            .map(|field| field.name)
            .collect()
    }

    /// Schema fields present in `value` with a different shape than requested.
    pub fn mismatched_fields(&self, value: &Value) -> Vec<&'static str> {
        self.schema
            .iter()
            .filter(|field| match value.get(field.name) {
                Some(v) if !v.is_null() => !field.kind.accepts(v),
                _ => false,
            })
            .map(|field| field.name)
            .collect()
    }
}

/// Placeholder name → substitution text for one render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptContext {
    values: BTreeMap<String, String>,
}

impl PromptContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }
}

/// Renders `task`'s template, replacing each `{{name}}` with its context value.
///
/// Substituted values are not scanned again, so input text that happens to contain
/// `{{...}}` is inserted as-is.
pub fn render(task: &ExtractionTask, context: &PromptContext) -> String {
    render_template(task.template, context)
}

fn render_template(template: &str, context: &PromptContext) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after_open = &rest[open + 2..];

        let Some(close) = after_open.find("}}") else {
            // Unterminated placeholder: keep the remainder literally.
            out.push_str(&rest[open..]);
            return out;
        };

        let name = after_open[..close].trim();
        match context.get(name) {
            Some(value) => out.push_str(value),
            None => out.push_str(&rest[open..open + 2 + close + 2]),
        }
        rest = &after_open[close + 2..];
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const FIELDS: &[SchemaField] = &[
        SchemaField::new("skills", FieldKind::TextList),
        SchemaField::new("contactInformation", FieldKind::Object),
    ];

    fn task(template: &'static str) -> ExtractionTask {
        ExtractionTask {
            kind: TaskKind::Resume,
            template,
            input_placeholder: "resume_text",
            schema: FIELDS,
        }
    }

    #[test]
    fn test_render_substitutes_placeholder() {
        let rendered = render(
            &task("Resume Content:\n{{resume_text}}\nEnd."),
            &PromptContext::new().with("resume_text", "Hello"),
        );
        assert_eq!(rendered, "Resume Content:\nHello\nEnd.");
        assert!(!rendered.contains("{{resume_text}}"));
    }

    #[test]
    fn test_render_allows_padded_placeholder_names() {
        let rendered = render(
            &task("A {{ resume_text }} B"),
            &PromptContext::new().with("resume_text", "x"),
        );
        assert_eq!(rendered, "A x B");
    }

    #[test]
    fn test_render_replaces_every_occurrence() {
        let rendered = render(
            &task("{{resume_text}} / {{resume_text}}"),
            &PromptContext::new().with("resume_text", "cv"),
        );
        assert_eq!(rendered, "cv / cv");
    }

    #[test]
    fn test_unmatched_placeholder_left_verbatim() {
        let rendered = render(
            &task("{{resume_text}} for {{company}}"),
            &PromptContext::new().with("resume_text", "cv"),
        );
        assert_eq!(rendered, "cv for {{company}}");
    }

    #[test]
    fn test_single_braces_and_unterminated_placeholders_untouched() {
        let template = "Return {\"a\": [{\"b\": 1}]} then {{resume_text";
        let rendered = render(
            &task(template),
            &PromptContext::new().with("resume_text", "cv"),
        );
        assert_eq!(rendered, template);
    }

    #[test]
    fn test_substituted_values_are_not_rescanned() {
        let rendered = render(
            &task("{{resume_text}}"),
            &PromptContext::new()
                .with("resume_text", "literal {{other}}")
                .with("other", "nope"),
        );
        assert_eq!(rendered, "literal {{other}}");
    }

    #[test]
    fn test_render_is_deterministic() {
        let t = task("X {{resume_text}} Y");
        let ctx = t.context_for("same");
        assert_eq!(render(&t, &ctx), render(&t, &ctx));
    }

    #[test]
    fn test_missing_fields_reports_absent_and_null() {
        let t = task("{{resume_text}}");
        assert_eq!(
            t.missing_fields(&json!({"skills": ["Rust"], "contactInformation": null})),
            vec!["contactInformation"]
        );
        assert_eq!(
            t.missing_fields(&json!(["not", "an", "object"])),
            vec!["skills", "contactInformation"]
        );
    }

    #[test]
    fn test_mismatched_fields_reports_wrong_shapes_only() {
        let t = task("{{resume_text}}");
        assert_eq!(
            t.mismatched_fields(&json!({"skills": "Rust, SQL", "contactInformation": {}})),
            vec!["skills"]
        );
        assert!(t.mismatched_fields(&json!({})).is_empty());
    }

    #[test]
    fn test_number_kind_accepts_numeric_strings() {
        assert!(FieldKind::Number.accepts(&json!(10)));
        assert!(FieldKind::Number.accepts(&json!(" 10 ")));
        assert!(!FieldKind::Number.accepts(&json!("ten")));
    }

    #[test]
    fn test_task_kind_names() {
        assert_eq!(TaskKind::JobDescription.as_str(), "job_description");
        assert_eq!(TaskKind::Resume.as_str(), "resume");
    }
}
