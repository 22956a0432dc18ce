/// First bytes of a PNG file. Enough for anything that only cares about
/// the payload being opaque image bytes.
pub fn png_fixture() -> Vec<u8> {
    return vec![
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
        0x52,
    ];
}

/// A menu as the vision model tends to return it, wrapped in a markdown fence
/// even though plain JSON was requested.
pub fn fenced_menu_fixture() -> &'static str {
    return r#"
```json
[
  {
    "name": "Spaghetti Carbonara",
    "description": "Egg yolk, pecorino, guanciale and black pepper.",
    "price": "$14.50"
  },
  {
    "name": "Caesar Salad",
    "description": "Romaine, parmesan, croutons and anchovy dressing.",
    "price": 9
  },
  "Tiramisù"
]
```
"#
    .trim();
}

/// Wraps text the same way the Gemini generateContent endpoint does.
pub fn gemini_text_response(text: &str) -> String {
    return serde_json::json!({
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [{ "text": text }]
            },
            "finishReason": "STOP"
        }]
    })
    .to_string();
}

/// Wraps a base64 payload the same way the Imagen predict endpoint does.
pub fn imagen_response(encoded: &[&str]) -> String {
    let predictions = encoded
        .iter()
        .map(|data| {
            return serde_json::json!({
                "bytesBase64Encoded": data,
                "mimeType": "image/jpeg"
            });
        })
        .collect::<Vec<serde_json::Value>>();

    return serde_json::json!({ "predictions": predictions }).to_string();
}
