use super::strip_code_fence;

#[test]
fn it_leaves_bare_json_alone() {
    assert_eq!(strip_code_fence("[1, 2, 3]"), "[1, 2, 3]");
}

#[test]
fn it_trims_surrounding_whitespace() {
    assert_eq!(strip_code_fence("\n\n  [\"Soup\"]  \n"), "[\"Soup\"]");
}

#[test]
fn it_strips_fence_with_language() {
    let text = "```json\n[{\"name\": \"Soup\"}]\n```";
    assert_eq!(strip_code_fence(text), "[{\"name\": \"Soup\"}]");
}

#[test]
fn it_strips_fence_without_language() {
    let text = "```\n[\"Soup\", \"Bread\"]\n```";
    assert_eq!(strip_code_fence(text), "[\"Soup\", \"Bread\"]");
}

#[test]
fn it_strips_single_line_fence() {
    assert_eq!(strip_code_fence("```json [\"Soup\"] ```"), "[\"Soup\"]");
    assert_eq!(strip_code_fence("```[\"Soup\"]```"), "[\"Soup\"]");
}

#[test]
fn it_keeps_multiline_bodies_intact() {
    let text = "  ```JSON\n[\n  \"Soup\",\n  \"Bread\"\n]\n```\n";
    insta::assert_snapshot!(strip_code_fence(text), @r###"
    [
      "Soup",
      "Bread"
    ]
    "###);
}

#[test]
fn it_ignores_unterminated_fences() {
    let text = "```json\n[\"Soup\"]";
    assert_eq!(strip_code_fence(text), text);
}

#[test]
fn it_ignores_empty_fences() {
    assert_eq!(strip_code_fence("```json\n```"), "```json\n```");
    assert_eq!(strip_code_fence("```"), "```");
}

#[test]
fn it_ignores_fences_in_the_middle_of_text() {
    let text = "Here you go:\n```json\n[]\n```";
    assert_eq!(strip_code_fence(text), text);
}
