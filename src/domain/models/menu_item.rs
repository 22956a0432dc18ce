#[cfg(test)]
#[path = "menu_item_test.rs"]
mod tests;

use serde_derive::Deserialize;
use serde_derive::Serialize;

/// A single dish read off a menu. The name is the dish's identity for the
/// whole session, so two items with the same name are the same dish.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub name: String,
    pub description: Option<String>,
    pub price: Option<String>,
}

impl MenuItem {
    pub fn new(name: &str) -> MenuItem {
        return MenuItem {
            name: name.trim().to_string(),
            description: None,
            price: None,
        };
    }

    pub fn with_details(name: &str, description: Option<&str>, price: Option<&str>) -> MenuItem {
        let clean = |text: Option<&str>| {
            return text
                .map(|e| return e.trim().to_string())
                .filter(|e| return !e.is_empty());
        };

        return MenuItem {
            name: name.trim().to_string(),
            description: clean(description),
            price: clean(price),
        };
    }

    /// Single line used by the terminal gallery and the headless printer.
    pub fn headline(&self) -> String {
        if let Some(price) = &self.price {
            return format!("{} ({price})", self.name);
        }

        return self.name.to_string();
    }
}
