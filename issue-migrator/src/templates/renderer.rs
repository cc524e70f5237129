//! Attribution header rendering.

use crate::tracker::{RemoteComment, RemoteIssue};
use chrono::{DateTime, Utc};
use handlebars::{no_escape, Handlebars};
use serde_json::{json, Value};

/// Header for a migrated issue: avatar, author, linked date, labels.
const ISSUE_HEADER: &str = "|<img src=\"{{avatar_url}}\" width=\"48\">|@{{login}} opened on [{{date}}]({{url}}){{#if labels}}<br>Labels: {{labels}}{{/if}}|\n|-|-|";

/// Header for a migrated comment: avatar, author, linked date.
const COMMENT_HEADER: &str =
    "|<img src=\"{{avatar_url}}\" width=\"48\">|@{{login}} commented on [{{date}}]({{url}})|\n|-|-|";

/// Separates the header table from the original text.
pub const HEADER_SEPARATOR: &str = "\n\n";

/// Creates a configured Handlebars registry.
///
/// The registry is configured with:
/// - No HTML escaping (for markdown output)
/// - Strict mode (catches missing variables)
#[must_use]
pub fn create_handlebars_registry() -> Handlebars<'static> {
    let mut hbs = Handlebars::new();
    hbs.register_escape_fn(no_escape);
    hbs.set_strict_mode(true);
    hbs
}

/// Renders migrated issue and comment bodies.
///
/// Output is a single-row Markdown table crediting the original author,
/// a blank line, then the original text verbatim.
pub struct TemplateRenderer {
    handlebars: Handlebars<'static>,
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer {
    /// Creates a new template renderer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlebars: create_handlebars_registry(),
        }
    }

    /// Renders the body of a migrated issue.
    ///
    /// # Errors
    ///
    /// Returns an error if template rendering fails.
    pub fn render_issue_body(&self, issue: &RemoteIssue) -> Result<String, super::TemplateError> {
        let data = json!({
            "avatar_url": issue.author.avatar_url,
            "login": issue.author.login,
            "date": format_date(&issue.created_at),
            "url": issue.html_url,
            "labels": format_labels(&issue.labels),
        });

        self.render_with_body(ISSUE_HEADER, &data, &issue.body)
    }

    /// Renders the body of a migrated comment.
    ///
    /// # Errors
    ///
    /// Returns an error if template rendering fails.
    pub fn render_comment_body(
        &self,
        comment: &RemoteComment,
    ) -> Result<String, super::TemplateError> {
        let data = json!({
            "avatar_url": comment.author.avatar_url,
            "login": comment.author.login,
            "date": format_date(&comment.created_at),
            "url": comment.html_url,
        });

        self.render_with_body(COMMENT_HEADER, &data, &comment.body)
    }

    fn render_with_body(
        &self,
        header: &str,
        data: &Value,
        body: &str,
    ) -> Result<String, super::TemplateError> {
        let mut rendered = self.handlebars.render_template(header, data)?;
        rendered.push_str(HEADER_SEPARATOR);
        rendered.push_str(body);
        Ok(rendered)
    }
}

/// Returns the original text of a rendered body, without its header.
#[must_use]
pub fn strip_attribution(rendered: &str) -> Option<&str> {
    rendered
        .split_once(HEADER_SEPARATOR)
        .map(|(_, body)| body)
}

fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Formats labels as inline code, escaping table cell separators.
fn format_labels(labels: &[String]) -> String {
    labels
        .iter()
        .map(|label| format!("`{}`", label.replace('|', "\\|")))
        .collect::<Vec<_>>()
        .join(", ")
}
