//! HTML views served by the handler.
//!
//! The built-in scanner and submit views are askama templates compiled into
//! the binary. Either view can be replaced at runtime by an HTML file using
//! `__NAME__` placeholders; values substituted into such a file go through
//! askama's HTML escaper, and substitution is a single pass so a value that
//! happens to contain a placeholder is never expanded.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use askama::Template;
use tracing::debug;

use crate::config::TemplateConfig;
use crate::error::{Error, Result};
use crate::registrant::Registrant;

/// Placeholder replaced with the pretty JSON of the participant.
pub const PARTICIPANT_PLACEHOLDER: &str = "__PARTICIPANT__";

#[derive(Template)]
#[template(path = "scanner.html")]
struct ScannerView<'a> {
    registrant: &'a Registrant,
    participant: &'a str,
}

#[derive(Template)]
#[template(path = "submit.html")]
struct SubmitView<'a> {
    participant: &'a str,
}

/// The scanner and submit views.
///
/// `None` selects the built-in view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Templates {
    scanner: Option<String>,
    submit: Option<String>,
}

impl Templates {
    /// The views compiled into the binary.
    #[must_use]
    pub fn builtin() -> Self {
        Self::default()
    }

    /// Placeholder templates from strings.
    #[must_use]
    pub fn new(scanner: impl Into<String>, submit: impl Into<String>) -> Self {
        Self {
            scanner: Some(scanner.into()),
            submit: Some(submit.into()),
        }
    }

    /// Load the configured template files; unset paths keep the built-in view.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TemplateLoad`] if a configured file cannot be read.
    pub fn load(config: &TemplateConfig) -> Result<Self> {
        Ok(Self {
            scanner: config.scanner_path.as_deref().map(read_template).transpose()?,
            submit: config.submit_path.as_deref().map(read_template).transpose()?,
        })
    }

    /// Render the scanner view for a registrant.
    ///
    /// # Errors
    ///
    /// Returns an error if the registrant cannot be serialized or the view
    /// fails to render.
    pub fn render_scanner(&self, registrant: &Registrant) -> Result<String> {
        let participant = registrant.to_json_pretty()?;
        match &self.scanner {
            None => Ok(ScannerView {
                registrant,
                participant: &participant,
            }
            .render()?),
            Some(template) => {
                let mut values = vec![(PARTICIPANT_PLACEHOLDER.to_string(), participant)];
                values.extend(registrant.query_pairs().iter().map(|(name, value)| {
                    (format!("__{}__", name.to_uppercase()), (*value).to_string())
                }));
                substitute(template, &values)
            }
        }
    }

    /// Render the submit view for the submitted parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters cannot be serialized or the view
    /// fails to render.
    pub fn render_submit(&self, params: &BTreeMap<String, String>) -> Result<String> {
        let participant = serde_json::to_string_pretty(params)?;
        match &self.submit {
            None => Ok(SubmitView {
                participant: &participant,
            }
            .render()?),
            Some(template) => substitute(
                template,
                &[(PARTICIPANT_PLACEHOLDER.to_string(), participant)],
            ),
        }
    }
}

fn read_template(path: &Path) -> Result<String> {
    debug!("Loading template {}", path.display());
    fs::read_to_string(path).map_err(|source| Error::TemplateLoad {
        path: path.to_path_buf(),
        source,
    })
}

/// Replace every placeholder in one left-to-right pass.
fn substitute(template: &str, values: &[(String, String)]) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("__") {
        let matched = values
            .iter()
            .find(|(placeholder, _)| rest[start..].starts_with(placeholder.as_str()));
        match matched {
            Some((placeholder, value)) => {
                out.push_str(&rest[..start]);
                out.push_str(&askama::filters::escape(askama::Html, value)?.to_string());
                rest = &rest[start + placeholder.len()..];
            }
            None => {
                out.push_str(&rest[..start + 1]);
                rest = &rest[start + 1..];
            }
        }
    }
    out.push_str(rest);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ada() -> Registrant {
        Registrant {
            firstname: "Ada".to_string(),
            lastname: "Lovelace".to_string(),
            company: "Analytical Engines".to_string(),
            title: "Programmer".to_string(),
            email: "ada@example.com".to_string(),
        }
    }

    #[test]
    fn test_builtin_scanner_fills_every_field() {
        let html = Templates::builtin().render_scanner(&ada()).unwrap();
        for value in ["Ada", "Lovelace", "Analytical Engines", "Programmer", "ada@example.com"] {
            assert!(html.contains(value), "missing {value}");
        }
        assert!(html.contains(r#"name="firstname" value="Ada""#));
        assert!(html.contains(r#"name="source" value="scanner""#));
        assert!(html.contains("&quot;firstname&quot;: &quot;Ada&quot;"));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn test_builtin_scanner_escapes_values() {
        let mut r = ada();
        r.company = "<script>alert(1)</script> & \"co\"".to_string();
        let html = Templates::builtin().render_scanner(&r).unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("&amp;"));
        assert!(!html.contains(r#"value="<script>"#));
    }

    #[test]
    fn test_builtin_submit_renders_params() {
        let params: BTreeMap<String, String> = [("firstname", "Ada"), ("notes", "<b>vip</b>")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let html = Templates::builtin().render_submit(&params).unwrap();
        assert!(html.contains("Details submitted"));
        assert!(html.contains("&quot;firstname&quot;: &quot;Ada&quot;"));
        assert!(html.contains("&lt;b&gt;vip&lt;/b&gt;"));
    }

    #[test]
    fn test_scanner_file_inserts_escaped_json() {
        let templates = Templates::new("<pre>__PARTICIPANT__</pre>", "");
        let html = templates.render_scanner(&ada()).unwrap();
        assert!(html.starts_with("<pre>{\n  &quot;firstname&quot;: &quot;Ada&quot;"));
    }

    #[test]
    fn test_submit_file_renders_all_params() {
        let params: BTreeMap<String, String> = [("firstname", "Ada"), ("source", "scanner")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let html = Templates::new("", "[__PARTICIPANT__]").render_submit(&params).unwrap();
        assert_eq!(
            html,
            "[{\n  &quot;firstname&quot;: &quot;Ada&quot;,\n  &quot;source&quot;: &quot;scanner&quot;\n}]"
        );
    }

    #[test]
    fn test_file_values_are_escaped() {
        let mut r = ada();
        r.company = "<i>Engines</i> & co".to_string();
        let html = Templates::new("__COMPANY__", "").render_scanner(&r).unwrap();
        assert_eq!(html, "&lt;i&gt;Engines&lt;/i&gt; &amp; co");
    }

    #[test]
    fn test_placeholder_inside_value_is_not_expanded() {
        let mut r = ada();
        r.firstname = "__EMAIL__".to_string();
        let html = Templates::new("__FIRSTNAME__|__EMAIL__", "").render_scanner(&r).unwrap();
        assert_eq!(html, "__EMAIL__|ada@example.com");
    }

    #[test]
    fn test_substitute_leaves_unknown_markers() {
        let values = vec![("__A__".to_string(), "1".to_string())];
        assert_eq!(substitute("x__B__y__A__z___", &values).unwrap(), "x__B__y1z___");
    }

    #[test]
    fn test_load_uses_configured_files() {
        let dir = tempfile::TempDir::new().unwrap();
        let scanner = dir.path().join("scanner.html");
        fs::write(&scanner, "hello __FIRSTNAME__").unwrap();
        let config = TemplateConfig {
            scanner_path: Some(scanner),
            submit_path: None,
        };

        let templates = Templates::load(&config).unwrap();
        assert_eq!(templates.render_scanner(&ada()).unwrap(), "hello Ada");
        assert!(templates.submit.is_none());
        assert!(templates
            .render_submit(&BTreeMap::new())
            .unwrap()
            .contains("Details submitted"));
    }

    #[test]
    fn test_load_missing_file() {
        let config = TemplateConfig {
            scanner_path: Some("/nonexistent/scanner.html".into()),
            submit_path: None,
        };
        assert!(matches!(
            Templates::load(&config),
            Err(Error::TemplateLoad { .. })
        ));
    }

    #[test]
    fn test_load_without_paths_is_builtin() {
        let templates = Templates::load(&TemplateConfig::default()).unwrap();
        assert_eq!(templates, Templates::builtin());
    }
}
