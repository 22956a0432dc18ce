#[cfg(test)]
#[path = "code_fences_test.rs"]
mod tests;

/// Removes a single markdown code fence wrapped around a model response, such
/// as ```` ```json\n[...]\n``` ````. Models wrap structured output this way
/// even when asked not to. Text without an enclosing fence, or a fence with
/// nothing inside it, is returned trimmed and otherwise untouched.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();

    let inner = match trimmed
        .strip_prefix("```")
        .and_then(|rest| return rest.strip_suffix("```"))
    {
        Some(inner) => inner,
        None => return trimmed,
    };

    // Optional language tag directly after the opening fence.
    let lang_len = inner
        .find(|c: char| return !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(inner.len());

    let body = inner[lang_len..].trim();
    if body.is_empty() {
        return trimmed;
    }

    return body;
}
