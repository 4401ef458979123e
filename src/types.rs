use serde::{Deserialize, Deserializer, Serialize};

//==============================================================================
// Line items
//==============================================================================

/// One product entry in an order.
///
/// Numeric fields are coerced leniently on the way in: missing, `null`,
/// non-numeric, negative or non-finite values become `0`, numeric strings are
/// parsed. Text fields default to empty strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct LineItem {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub url: String,

    /// Data-URI image payload (`data:image/png;base64,...`)
    #[serde(default, deserialize_with = "lenient_photo")]
    pub photo: Option<String>,

    #[serde(default, deserialize_with = "lenient_quantity")]
    pub quantity: u32,

    #[serde(default, deserialize_with = "lenient_string")]
    pub color: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub size: String,

    #[serde(default, deserialize_with = "lenient_price")]
    pub price: f64,
}

impl LineItem {
    pub fn new(id: impl Into<String>, url: impl Into<String>, quantity: u32, price: f64) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            quantity,
            price,
            ..Default::default()
        }
    }

    pub fn with_photo(mut self, photo: impl Into<String>) -> Self {
        self.photo = Some(photo.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = size.into();
        self
    }

    /// A freshly added form row: quantity 1, everything else empty.
    pub fn blank(id: impl Into<String>) -> Self {
        Self::new(id, "", 1, 0.0)
    }
}

/// Body of `POST /export-excel` and of CLI input files.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OrderRequest {
    #[serde(default, deserialize_with = "lenient_items")]
    pub items: Vec<LineItem>,
}

//==============================================================================
// Lenient field coercion
//==============================================================================

fn lenient_number(value: &serde_json::Value) -> f64 {
    let n = match value {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0),
        serde_json::Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    if n.is_finite() && n > 0.0 {
        n
    } else {
        0.0
    }
}

fn lenient_price<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(lenient_number(&value))
}

fn lenient_quantity<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let n = lenient_number(&value).trunc();
    Ok(if n > f64::from(u32::MAX) {
        u32::MAX
    } else {
        n as u32
    })
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

fn lenient_photo<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s),
        _ => None,
    })
}

fn lenient_items<'de, D>(deserializer: D) -> Result<Vec<LineItem>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<LineItem>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_deserialize_full_item() {
        let json = r#"{
            "id": "1",
            "url": "https://detail.1688.com/offer/1.html",
            "photo": null,
            "quantity": 2,
            "color": "red",
            "size": "M",
            "price": 100.5
        }"#;
        let item: LineItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.id, "1");
        assert_eq!(item.quantity, 2);
        assert_eq!(item.price, 100.5);
        assert_eq!(item.color, "red");
        assert_eq!(item.size, "M");
        assert!(item.photo.is_none());
    }

    #[test]
    fn test_missing_numbers_default_to_zero() {
        let item: LineItem = serde_json::from_str(r#"{"id": "x"}"#).unwrap();
        assert_eq!(item.quantity, 0);
        assert_eq!(item.price, 0.0);
        assert!(item.url.is_empty());
    }

    #[test]
    fn test_non_numeric_numbers_become_zero() {
        let json = r#"{"id": "x", "quantity": "lots", "price": {"amount": 3}}"#;
        let item: LineItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.quantity, 0);
        assert_eq!(item.price, 0.0);
    }

    #[test]
    fn test_numeric_strings_are_parsed() {
        let json = r#"{"id": "x", "quantity": "3", "price": " 12.5 "}"#;
        let item: LineItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.quantity, 3);
        assert_eq!(item.price, 12.5);
    }

    #[test]
    fn test_negative_and_fractional_values() {
        let json = r#"{"id": "x", "quantity": 2.9, "price": -4}"#;
        let item: LineItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.quantity, 2);
        assert_eq!(item.price, 0.0);
    }

    #[test]
    fn test_empty_photo_is_absent() {
        let item: LineItem = serde_json::from_str(r#"{"photo": ""}"#).unwrap();
        assert!(item.photo.is_none());
    }

    #[test]
    fn test_order_request_missing_items() {
        let req: OrderRequest = serde_json::from_str("{}").unwrap();
        assert!(req.items.is_empty());

        let req: OrderRequest = serde_json::from_str(r#"{"items": null}"#).unwrap();
        assert!(req.items.is_empty());
    }

    #[test]
    fn test_builders() {
        let item = LineItem::new("7", "https://taobao.com/x", 3, 9.99)
            .with_color("blue")
            .with_size("XL")
            .with_photo("data:image/png;base64,AAAA");
        assert_eq!(item.color, "blue");
        assert_eq!(item.size, "XL");
        assert!(item.photo.is_some());

        let blank = LineItem::blank("b");
        assert_eq!(blank.quantity, 1);
        assert_eq!(blank.price, 0.0);
    }
}
