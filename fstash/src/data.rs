//! Parsing of `file=<json>` template data arguments.

use anyhow::{Context, Result, bail};
use fstash_core::{TemplateData, TemplateVars};
use serde_json::Value;

/// Parse `expand` data arguments into template data.
///
/// Each argument is `<file-base-name>=<JSON object>`, for example
/// `file2={"AppName":"fstash","Author":"dc0d"}`. Numbers and booleans are
/// turned into their text form; nested values are rejected.
pub fn parse_template_data<S: AsRef<str>>(args: &[S]) -> Result<TemplateData> {
    let mut data = TemplateData::new();
    for arg in args {
        let arg = arg.as_ref();
        let (key, json) = arg
            .split_once('=')
            .with_context(|| format!("Invalid template data {:?}: expected file=<json>", arg))?;
        let key = key.trim();
        if key.is_empty() {
            bail!("Invalid template data {:?}: missing file name", arg);
        }

        let vars = parse_vars(json).with_context(|| format!("Invalid template data for {}", key))?;
        data.insert(key, vars);
    }
    Ok(data)
}

fn parse_vars(json: &str) -> Result<TemplateVars> {
    let value: Value = serde_json::from_str(json)?;
    let Value::Object(map) = value else {
        bail!("expected a JSON object");
    };

    map.into_iter()
        .map(|(name, value)| {
            let text = match value {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                other => bail!("value for {} must be a string, got {}", name, other),
            };
            Ok((name, text))
        })
        .collect()
}
