use thiserror::Error;

/// The only placeholder a storage path template may contain.
pub const NAME_PLACEHOLDER: &str = "name";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("unknown placeholder '{{{0}}}' (only '{{name}}' is supported)")]
    UnknownPlaceholder(String),

    #[error("unclosed '{{' at byte {0}")]
    UnclosedBrace(usize),

    #[error("unmatched '}}' at byte {0}")]
    UnmatchedBrace(usize),
}

/// Substitutes `name` for every `{name}` in `template`.
///
/// Single pass: substituted text is never scanned again, so a `name` that
/// itself contains braces is copied through verbatim. `{{` and `}}` produce
/// literal braces.
pub fn render(template: &str, name: &str) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len() + name.len());
    expand(template, |out| out.push_str(name), &mut out)?;
    Ok(out)
}

/// Checks that `template` would render, without producing output.
pub fn validate(template: &str) -> Result<(), TemplateError> {
    let mut sink = String::new();
    expand(template, |_| {}, &mut sink)
}

/// Whether `template` substitutes the name at least once. Escaped `{{name}}`
/// does not count.
pub fn mentions_name(template: &str) -> Result<bool, TemplateError> {
    let mut found = false;
    let mut sink = String::new();
    expand(template, |_| found = true, &mut sink)?;
    Ok(found)
}

fn expand<F>(template: &str, mut on_name: F, out: &mut String) -> Result<(), TemplateError>
where
    F: FnMut(&mut String),
{
    let bytes = template.as_bytes();
    let mut literal_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'{' if bytes.get(i + 1) == Some(&b'{') => {
                out.push_str(&template[literal_start..i]);
                out.push('{');
                i += 2;
                literal_start = i;
            }
            b'{' => {
                out.push_str(&template[literal_start..i]);
                let close = template[i + 1..]
                    .find('}')
                    .map(|offset| i + 1 + offset)
                    .ok_or(TemplateError::UnclosedBrace(i))?;
                let field = &template[i + 1..close];
                if field != NAME_PLACEHOLDER {
                    return Err(TemplateError::UnknownPlaceholder(field.to_string()));
                }
                on_name(out);
                i = close + 1;
                literal_start = i;
            }
            b'}' if bytes.get(i + 1) == Some(&b'}') => {
                out.push_str(&template[literal_start..i]);
                out.push('}');
                i += 2;
                literal_start = i;
            }
            b'}' => return Err(TemplateError::UnmatchedBrace(i)),
            _ => i += 1,
        }
    }

    out.push_str(&template[literal_start..]);
    Ok(())
}
