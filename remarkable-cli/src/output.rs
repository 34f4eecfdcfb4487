//! Stage output rendering
//!
//! Runs the pipeline up to the requested stage and renders the result. The markdown stage is
//! printed as-is; every other stage is serialized as JSON or YAML.

use remarkable_babel::Remarkable;
use remarkable_config::Stage;
use serde_json::Value;

/// Available output formats
pub const AVAILABLE_FORMATS: &[&str] = &["json", "yaml"];

/// Serialization of structured stages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json { pretty: bool },
    Yaml,
}

impl OutputFormat {
    pub fn from_name(name: &str, pretty: bool) -> Result<Self, String> {
        match name {
            "json" => Ok(OutputFormat::Json { pretty }),
            "yaml" => Ok(OutputFormat::Yaml),
            other => Err(format!(
                "Unknown format '{}' (available: {})",
                other,
                AVAILABLE_FORMATS.join(", ")
            )),
        }
    }

    fn render(self, value: &Value) -> Result<String, String> {
        match self {
            OutputFormat::Json { pretty: true } => serde_json::to_string_pretty(value)
                .map_err(|e| format!("JSON serialization failed: {}", e)),
            OutputFormat::Json { pretty: false } => serde_json::to_string(value)
                .map_err(|e| format!("JSON serialization failed: {}", e)),
            OutputFormat::Yaml => serde_yaml::to_string(value)
                .map_err(|e| format!("YAML serialization failed: {}", e)),
        }
    }
}

/// Run `doc` through the pipeline up to `stage` and render the result
pub fn render_stage(
    doc: &Remarkable,
    stage: Stage,
    format: OutputFormat,
) -> Result<String, String> {
    let value = match stage {
        Stage::Markdown => return Ok(doc.markdown().to_string()),
        Stage::Tokens => {
            let tokens = doc.lexed().map_err(|e| format!("Transform failed: {}", e))?;
            to_value(&tokens)?
        }
        Stage::Resolved => {
            let tokens = doc
                .raw_tokens()
                .map_err(|e| format!("Transform failed: {}", e))?;
            to_value(&tokens)?
        }
        Stage::Tree => {
            let tree = doc.tokens().map_err(|e| format!("Transform failed: {}", e))?;
            for cycle in tree.cycles() {
                tracing::info!(cycle = %cycle, "cycle removed from document tree");
            }
            tree.to_value()
        }
    };
    format.render(&value)
}

fn to_value<T: serde::Serialize>(value: &T) -> Result<Value, String> {
    serde_json::to_value(value).map_err(|e| format!("JSON serialization failed: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use remarkable_parser::remarkable::options::PipelineOptions;

    fn doc() -> Remarkable {
        Remarkable::from_string("<!-- : card -->\nHello\n", PipelineOptions::default())
    }

    #[test]
    fn markdown_stage_is_verbatim() {
        let out = render_stage(&doc(), Stage::Markdown, OutputFormat::Json { pretty: true });
        assert_eq!(out.unwrap(), "<!-- : card -->\nHello\n");
    }

    #[test]
    fn compact_tree() {
        let out = render_stage(&doc(), Stage::Tree, OutputFormat::Json { pretty: false }).unwrap();
        let value: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(
            value,
            serde_json::json!([{
                "type": "card",
                "className": "metadata card",
                "children": [{ "type": "paragraph", "text": "Hello" }]
            }])
        );
        assert!(!out.contains('\n'));
    }

    #[test]
    fn resolved_stage_has_metadata_token() {
        let out =
            render_stage(&doc(), Stage::Resolved, OutputFormat::Json { pretty: true }).unwrap();
        let value: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value[0]["type"], "metadata");
        assert_eq!(value[1]["type"], "html");
    }

    #[test]
    fn yaml_output() {
        let out = render_stage(&doc(), Stage::Tokens, OutputFormat::Yaml).unwrap();
        assert!(out.contains("type: html"));
        assert!(out.contains("type: paragraph"));
    }

    #[test]
    fn unknown_format() {
        assert!(OutputFormat::from_name("xml", true).is_err());
        assert_eq!(OutputFormat::from_name("yaml", true), Ok(OutputFormat::Yaml));
    }
}
