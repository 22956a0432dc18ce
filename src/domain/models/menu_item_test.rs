use super::MenuItem;

#[test]
fn it_trims_names() {
    let item = MenuItem::new("  Caesar Salad \n");
    assert_eq!(item.name, "Caesar Salad");
    assert_eq!(item.description, None);
    assert_eq!(item.price, None);
}

#[test]
fn it_drops_blank_details() {
    let item = MenuItem::with_details("Soup", Some("   "), Some(" $4 "));
    assert_eq!(item.description, None);
    assert_eq!(item.price, Some("$4".to_string()));
}

#[test]
fn it_formats_headline() {
    let item = MenuItem::with_details("Spaghetti Carbonara", None, Some("$14.50"));
    assert_eq!(item.headline(), "Spaghetti Carbonara ($14.50)");
    assert_eq!(MenuItem::new("Tiramisù").headline(), "Tiramisù");
}
