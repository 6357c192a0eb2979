//! Placeholder substitution
//!
//! Templates use `{{ key }}` placeholders with optional whitespace inside
//! the braces. There is no expression language: a placeholder is a bare
//! key looked up in the value map, nothing else.

use std::collections::BTreeMap;

use crate::error::{RenderError, RenderResult};

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Replace every `{{ key }}` placeholder in `template` with its value.
///
/// Lookup is strict. An unknown key aborts the render instead of leaking
/// a literal placeholder into a live object, and a `{{` without a
/// closing `}}` is rejected outright.
pub fn substitute(template: &str, values: &BTreeMap<&'static str, String>) -> RenderResult<String> {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;
    let mut consumed = 0;

    while let Some(start) = rest.find(OPEN) {
        output.push_str(&rest[..start]);
        let after_open = &rest[start + OPEN.len()..];
        let end = after_open
            .find(CLOSE)
            .ok_or(RenderError::UnterminatedPlaceholder {
                offset: consumed + start,
            })?;
        let key = after_open[..end].trim();
        match values.get(key) {
            Some(value) => output.push_str(value),
            None => {
                return Err(RenderError::MissingField {
                    key: key.to_string(),
                })
            }
        }
        let skip = start + OPEN.len() + end + CLOSE.len();
        consumed += skip;
        rest = &rest[skip..];
    }
    output.push_str(rest);
    Ok(output)
}
