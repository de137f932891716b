//! Implementation of the `stagetime template` command.
//!
//! Renders an inline template against values given on the command line
//! and/or in a YAML file, and prints the result.

use crate::cli::TemplateArgs;
use crate::config::Config;
use crate::encoding::parse_scalar_params;
use crate::error::{Result, StageTimeError};
use crate::events::{self, Event, EventAction};
use crate::template::render_inline_named;
use serde_json::json;
use serde_yaml::Value;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// Execute the `stagetime template` command.
pub fn cmd_template(args: TemplateArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let values = load_values(args.values.as_deref(), args.values_file.as_deref())?;
    let template = template_text(&args)?;
    let rendered = render_inline_named(&template, &args.delimiter, &values)?;

    println!("{}", rendered);

    let event = Event::new(EventAction::TemplateRender).with_details(json!({
        "delimiter": args.delimiter,
        "values": values.len(),
    }));
    events::record(
        args.events.as_deref().or(config.events_file.as_deref()),
        &[event],
    )
}

fn template_text(args: &TemplateArgs) -> Result<String> {
    match (&args.template, &args.template_file) {
        (Some(text), _) => Ok(text.clone()),
        (None, Some(path)) => std::fs::read_to_string(path).map_err(|e| {
            StageTimeError::UserError(format!(
                "failed to read template file '{}': {}",
                path.display(),
                e
            ))
        }),
        (None, None) => Err(StageTimeError::UserError(
            "one of --template or --template-file is required".to_string(),
        )),
    }
}

/// Merge the values file and `--values`, the latter winning on conflicts.
fn load_values(inline: Option<&str>, file: Option<&Path>) -> Result<HashMap<String, String>> {
    let mut values = HashMap::new();

    if let Some(path) = file {
        values.extend(read_values_file(path)?);
    }
    if let Some(inline) = inline {
        values.extend(parse_scalar_params(inline)?);
    }

    Ok(values)
}

fn read_values_file(path: &Path) -> Result<BTreeMap<String, String>> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        StageTimeError::UserError(format!(
            "failed to read values file '{}': {}",
            path.display(),
            e
        ))
    })?;

    let mapping: BTreeMap<String, Value> = serde_yaml::from_str(&content).map_err(|e| {
        StageTimeError::UserError(format!(
            "failed to parse values file '{}': {}",
            path.display(),
            e
        ))
    })?;

    mapping
        .into_iter()
        .map(|(key, value)| {
            let text = match value {
                Value::Null => String::new(),
                Value::Bool(b) => b.to_string(),
                Value::Number(n) => n.to_string(),
                Value::String(s) => s,
                _ => {
                    return Err(StageTimeError::UserError(format!(
                        "value for '{}' in '{}' must be a scalar",
                        key,
                        path.display()
                    )));
                }
            };
            Ok((key, text))
        })
        .collect()
}
