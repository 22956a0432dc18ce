use anyhow::Result;

use super::GeneratedImage;
use super::GenerationPrompt;
use crate::domain::models::MenuItem;

#[test]
fn it_builds_prompt_from_name() {
    let prompt = GenerationPrompt::from_item(&MenuItem::new("Caesar Salad"));

    insta::assert_snapshot!(prompt.text, @"A delicious, high-quality, photorealistic image of Caesar Salad.");
}

#[test]
fn it_builds_prompt_from_name_and_description() {
    let item = MenuItem::with_details(
        "Spaghetti Carbonara",
        Some("Egg yolk, pecorino, guanciale and black pepper."),
        Some("$14.50"),
    );
    let prompt = GenerationPrompt::from_item(&item);

    insta::assert_snapshot!(prompt.text, @"A delicious, high-quality, photorealistic image of Spaghetti Carbonara. Egg yolk, pecorino, guanciale and black pepper.");
}

#[test]
fn it_builds_identical_prompts_for_identical_dishes() {
    let first = MenuItem::with_details("Pho", Some("Beef broth"), Some("$11"));
    let second = MenuItem::with_details("Pho", Some("Beef broth"), Some("$12"));

    assert_eq!(
        GenerationPrompt::from_item(&first),
        GenerationPrompt::from_item(&second)
    );
}

#[test]
fn it_exposes_generated_images() -> Result<()> {
    let image = GeneratedImage::new("image/jpeg", "aGVsbG8=");

    assert_eq!(image.data_url(), "data:image/jpeg;base64,aGVsbG8=");
    assert_eq!(image.bytes()?, b"hello".to_vec());
    assert_eq!(image.extension(), "jpg");

    return Ok(());
}

#[test]
fn it_fails_on_invalid_base64() {
    let image = GeneratedImage::new("image/png", "not base64!");
    assert!(image.bytes().is_err());
    assert_eq!(image.extension(), "png");
}
