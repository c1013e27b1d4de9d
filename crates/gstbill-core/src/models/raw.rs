//! Raw transaction, company and party records as stored by the admin backend.
//!
//! Records were written under several schema versions, so every field is
//! optional and numbers are accepted as JSON numbers or numeric strings.
//! Anything that cannot be read degrades to "absent" instead of failing.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::invoice::amounts::parse_amount;

/// A transaction record in any of its historical shapes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTransaction {
    /// Unified line array (current schema).
    #[serde(default, deserialize_with = "lenient::lines")]
    pub items: Vec<RawLine>,

    /// Product lines (split schema).
    #[serde(default, deserialize_with = "lenient::lines")]
    pub products: Vec<RawLine>,

    /// Service lines (split schema).
    #[serde(default, deserialize_with = "lenient::lines")]
    pub services: Vec<RawLine>,

    /// Service lines (oldest schema, singular key).
    #[serde(default, deserialize_with = "lenient::lines")]
    pub service: Vec<RawLine>,

    #[serde(default, deserialize_with = "lenient::string")]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "lenient::string")]
    pub date: Option<String>,

    #[serde(default, deserialize_with = "lenient::string")]
    pub notes: Option<String>,

    #[serde(default, deserialize_with = "lenient::string")]
    pub invoice_number: Option<String>,

    #[serde(default, deserialize_with = "lenient::string")]
    pub reference_number: Option<String>,

    #[serde(default, deserialize_with = "lenient::string")]
    pub due_date: Option<String>,

    /// Transaction type ("sales", "purchases", "receipt", ...).
    #[serde(default, rename = "type", deserialize_with = "lenient::string")]
    pub transaction_type: Option<String>,
}

/// The line layout a transaction was written with.
#[derive(Debug, Clone, Copy)]
pub enum LineShape<'a> {
    /// `items[]` with a per-line product/service discriminator.
    Unified(&'a [RawLine]),
    /// Separate `products[]` and `services[]` (or legacy `service[]`).
    Split {
        products: &'a [RawLine],
        services: &'a [RawLine],
    },
}

impl RawTransaction {
    /// Decide which line layout to read.
    ///
    /// A non-empty `items` array wins outright; the split arrays are then
    /// ignored so that migrated records are not counted twice. Of the two
    /// service keys, `services` wins when it is non-empty.
    pub fn shape(&self) -> LineShape<'_> {
        if !self.items.is_empty() {
            return LineShape::Unified(&self.items);
        }

        let services = if self.services.is_empty() {
            &self.service
        } else {
            &self.services
        };

        LineShape::Split {
            products: &self.products,
            services,
        }
    }
}

/// One raw line in any schema version.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLine {
    /// Discriminator on unified lines: "product" or "service".
    #[serde(default, rename = "type", deserialize_with = "lenient::string")]
    pub kind: Option<String>,

    #[serde(default, deserialize_with = "lenient::reference")]
    pub product: Option<RawRef>,

    #[serde(default, deserialize_with = "lenient::reference")]
    pub service: Option<RawRef>,

    #[serde(default, deserialize_with = "lenient::string")]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "lenient::string")]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "lenient::decimal")]
    pub quantity: Option<Decimal>,

    #[serde(default, deserialize_with = "lenient::decimal")]
    pub price_per_unit: Option<Decimal>,

    /// Older spelling of `pricePerUnit`.
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub rate: Option<Decimal>,

    #[serde(default, deserialize_with = "lenient::decimal")]
    pub amount: Option<Decimal>,

    #[serde(default, deserialize_with = "lenient::decimal")]
    pub gst_percentage: Option<Decimal>,

    #[serde(default, deserialize_with = "lenient::decimal")]
    pub gst_rate: Option<Decimal>,

    #[serde(default, deserialize_with = "lenient::decimal")]
    pub gst: Option<Decimal>,

    #[serde(default, deserialize_with = "lenient::string")]
    pub hsn: Option<String>,

    #[serde(default, deserialize_with = "lenient::string")]
    pub sac: Option<String>,

    #[serde(default, deserialize_with = "lenient::string")]
    pub unit_type: Option<String>,
}

impl RawLine {
    /// Unit price, preferring `pricePerUnit` over the older `rate`.
    pub fn unit_price(&self) -> Option<Decimal> {
        self.price_per_unit.or(self.rate)
    }

    /// GST rate carried on the line itself.
    pub fn gst_rate_hint(&self) -> Option<Decimal> {
        self.gst_percentage.or(self.gst_rate).or(self.gst)
    }
}

/// Reference to a product or service: a bare id or a populated sub-document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawRef {
    Id(String),
    Populated(RawRefDoc),
}

impl RawRef {
    /// Id of the referenced document, if any.
    pub fn id(&self) -> Option<&str> {
        match self {
            RawRef::Id(id) => Some(id.as_str()),
            RawRef::Populated(doc) => doc.mongo_id.as_deref().or(doc.id.as_deref()),
        }
    }

    /// Display name stored on a populated sub-document.
    pub fn name(&self) -> Option<&str> {
        match self {
            RawRef::Id(_) => None,
            RawRef::Populated(doc) => doc
                .name
                .as_deref()
                .or(doc.service_name.as_deref())
                .or(doc.product_name.as_deref()),
        }
    }

    pub fn doc(&self) -> Option<&RawRefDoc> {
        match self {
            RawRef::Id(_) => None,
            RawRef::Populated(doc) => Some(doc),
        }
    }
}

/// A populated product/service sub-document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRefDoc {
    #[serde(default, rename = "_id", deserialize_with = "lenient::string")]
    pub mongo_id: Option<String>,

    #[serde(default, deserialize_with = "lenient::string")]
    pub id: Option<String>,

    #[serde(default, deserialize_with = "lenient::string")]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "lenient::string")]
    pub service_name: Option<String>,

    #[serde(default, deserialize_with = "lenient::string")]
    pub product_name: Option<String>,

    #[serde(default, deserialize_with = "lenient::decimal")]
    pub gst_percentage: Option<Decimal>,

    #[serde(default, deserialize_with = "lenient::decimal")]
    pub gst_rate: Option<Decimal>,

    #[serde(default, deserialize_with = "lenient::string")]
    pub hsn: Option<String>,

    #[serde(default, deserialize_with = "lenient::string")]
    pub sac: Option<String>,

    #[serde(default, deserialize_with = "lenient::string")]
    pub unit_type: Option<String>,
}

/// GSTIN and state fields shared by company and party records.
///
/// GSTIN has been stored under many keys over the years; see
/// [`RawTaxProfile::gstin_candidates`] for the probing order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawTaxProfile {
    #[serde(default, deserialize_with = "lenient::string")]
    pub gstin: Option<String>,

    #[serde(default, rename = "gstIn", deserialize_with = "lenient::string")]
    pub gst_in: Option<String>,

    #[serde(default, rename = "GSTIN", deserialize_with = "lenient::string")]
    pub gstin_upper: Option<String>,

    #[serde(default, rename = "gstNumber", deserialize_with = "lenient::string")]
    pub gst_number: Option<String>,

    #[serde(default, rename = "gst_number", deserialize_with = "lenient::string")]
    pub gst_number_snake: Option<String>,

    #[serde(default, rename = "gstNo", deserialize_with = "lenient::string")]
    pub gst_no: Option<String>,

    #[serde(default, rename = "gstinNumber", deserialize_with = "lenient::string")]
    pub gstin_number: Option<String>,

    /// Free-text state name (or sometimes a numeric code).
    #[serde(default, deserialize_with = "lenient::string")]
    pub state: Option<String>,

    #[serde(default, rename = "stateCode", deserialize_with = "lenient::string")]
    pub state_code: Option<String>,
}

impl RawTaxProfile {
    /// GSTIN alias keys, in probing priority order.
    pub const GSTIN_ALIASES: [&'static str; 7] = [
        "gstin",
        "gstIn",
        "GSTIN",
        "gstNumber",
        "gst_number",
        "gstNo",
        "gstinNumber",
    ];

    /// Every GSTIN alias paired with its stored value, in priority order.
    pub fn gstin_candidates(&self) -> [(&'static str, Option<&str>); 7] {
        let values = [
            self.gstin.as_deref(),
            self.gst_in.as_deref(),
            self.gstin_upper.as_deref(),
            self.gst_number.as_deref(),
            self.gst_number_snake.as_deref(),
            self.gst_no.as_deref(),
            self.gstin_number.as_deref(),
        ];
        std::array::from_fn(|i| (Self::GSTIN_ALIASES[i], values[i]))
    }

    /// First non-empty GSTIN found across the aliases.
    pub fn gstin(&self) -> Option<&str> {
        self.gstin_candidates()
            .into_iter()
            .find_map(|(_, value)| value.filter(|v| !v.trim().is_empty()))
    }
}

/// Seller (company) record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCompany {
    #[serde(default, deserialize_with = "lenient::string")]
    pub business_name: Option<String>,

    #[serde(default, deserialize_with = "lenient::string")]
    pub company_name: Option<String>,

    #[serde(default, deserialize_with = "lenient::string")]
    pub address: Option<String>,

    #[serde(default, deserialize_with = "lenient::string")]
    pub city: Option<String>,

    #[serde(default, deserialize_with = "lenient::string")]
    pub pincode: Option<String>,

    #[serde(default, deserialize_with = "lenient::string")]
    pub mobile_number: Option<String>,

    #[serde(default, deserialize_with = "lenient::string")]
    pub email_id: Option<String>,

    #[serde(flatten)]
    pub tax: RawTaxProfile,
}

impl RawCompany {
    pub fn display_name(&self) -> Option<&str> {
        self.business_name.as_deref().or(self.company_name.as_deref())
    }
}

/// Buyer (party) record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawParty {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "lenient::string")]
    pub address: Option<String>,

    #[serde(default, deserialize_with = "lenient::string")]
    pub city: Option<String>,

    #[serde(default, deserialize_with = "lenient::string")]
    pub contact_number: Option<String>,

    #[serde(default, deserialize_with = "lenient::string")]
    pub email: Option<String>,

    #[serde(flatten)]
    pub tax: RawTaxProfile,
}

/// Everything needed to compute one invoice document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceBundle {
    #[serde(default)]
    pub transaction: RawTransaction,

    #[serde(default)]
    pub company: RawCompany,

    #[serde(default)]
    pub party: RawParty,

    /// Service names by id, for lines that only reference a service id.
    #[serde(default, deserialize_with = "lenient::names")]
    pub service_names: HashMap<String, String>,
}

impl InvoiceBundle {
    /// Parse a bundle from JSON text.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a bundle from a JSON file.
    pub fn from_file(path: &std::path::Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}

/// Deserializers that never reject a record because of one bad field.
mod lenient {
    use super::*;

    pub fn decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.as_ref().and_then(decimal_from_value))
    }

    pub fn string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.as_ref().and_then(string_from_value))
    }

    pub fn reference<'de, D>(deserializer: D) -> Result<Option<RawRef>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::Object(map)) => serde_json::from_value::<RawRefDoc>(Value::Object(map))
                .ok()
                .map(RawRef::Populated),
            Some(other) => string_from_value(&other).map(RawRef::Id),
            None => None,
        })
    }

    pub fn lines<'de, D>(deserializer: D) -> Result<Vec<RawLine>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::Array(entries)) => entries
                .into_iter()
                .filter(Value::is_object)
                .filter_map(|entry| serde_json::from_value(entry).ok())
                .collect(),
            _ => Vec::new(),
        })
    }

    pub fn names<'de, D>(deserializer: D) -> Result<HashMap<String, String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::Object(map)) => map
                .iter()
                .filter_map(|(id, name)| string_from_value(name).map(|n| (id.clone(), n)))
                .collect(),
            _ => HashMap::new(),
        })
    }

    fn decimal_from_value(value: &Value) -> Option<Decimal> {
        match value {
            Value::Number(n) => parse_amount(&n.to_string()),
            Value::String(s) => parse_amount(s),
            _ => None,
        }
    }

    fn string_from_value(value: &Value) -> Option<String> {
        match value {
            Value::String(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn transaction(value: Value) -> RawTransaction {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_numbers_as_strings() {
        let tx = transaction(json!({
            "items": [{ "quantity": "2", "pricePerUnit": "1,250.50", "amount": null }]
        }));

        let line = &tx.items[0];
        assert_eq!(line.quantity, Some(Decimal::from(2)));
        assert_eq!(line.price_per_unit, Some(Decimal::new(125050, 2)));
        assert_eq!(line.amount, None);
    }

    #[test]
    fn test_garbage_fields_degrade_to_absent() {
        let tx = transaction(json!({
            "products": [{ "quantity": "lots", "amount": true, "name": "" }, "not-a-line"],
            "services": { "oops": 1 }
        }));

        assert_eq!(tx.products.len(), 1);
        assert_eq!(tx.products[0].quantity, None);
        assert_eq!(tx.products[0].amount, None);
        assert_eq!(tx.products[0].name, None);
        assert!(tx.services.is_empty());
    }

    #[test]
    fn test_reference_id_or_populated() {
        let tx = transaction(json!({
            "items": [
                { "service": "svc-1" },
                { "product": { "_id": "p-9", "name": "Widget", "gstRate": 12 } }
            ]
        }));

        let by_id = tx.items[0].service.as_ref().unwrap();
        assert_eq!(by_id.id(), Some("svc-1"));
        assert_eq!(by_id.name(), None);

        let populated = tx.items[1].product.as_ref().unwrap();
        assert_eq!(populated.id(), Some("p-9"));
        assert_eq!(populated.name(), Some("Widget"));
        assert_eq!(populated.doc().unwrap().gst_rate, Some(Decimal::from(12)));
    }

    #[test]
    fn test_shape_prefers_items() {
        let tx = transaction(json!({
            "items": [{ "amount": 10 }],
            "products": [{ "amount": 20 }]
        }));
        assert!(matches!(tx.shape(), LineShape::Unified(lines) if lines.len() == 1));

        let tx = transaction(json!({
            "items": [],
            "products": [{ "amount": 20 }],
            "service": [{ "amount": 5 }]
        }));
        match tx.shape() {
            LineShape::Split { products, services } => {
                assert_eq!(products.len(), 1);
                assert_eq!(services.len(), 1);
            }
            other => panic!("unexpected shape: {:?}", other),
        }
    }

    #[test]
    fn test_gstin_alias_priority() {
        let profile: RawTaxProfile = serde_json::from_value(json!({
            "gstNumber": "29AAGCB7383J1Z4",
            "gstIn": "  ",
            "GSTIN": "27AAPFU0939F1ZV"
        }))
        .unwrap();

        assert_eq!(profile.gstin(), Some("27AAPFU0939F1ZV"));

        let empty = RawTaxProfile::default();
        assert_eq!(empty.gstin(), None);
    }

    #[test]
    fn test_company_flattens_tax_profile() {
        let company: RawCompany = serde_json::from_value(json!({
            "businessName": "Acme Traders",
            "gstin": "27AAPFU0939F1ZV",
            "state": "Maharashtra"
        }))
        .unwrap();

        assert_eq!(company.display_name(), Some("Acme Traders"));
        assert_eq!(company.tax.gstin(), Some("27AAPFU0939F1ZV"));
        assert_eq!(company.tax.state.as_deref(), Some("Maharashtra"));
    }

    #[test]
    fn test_bundle_service_names() {
        let bundle = InvoiceBundle::from_json(
            r#"{ "transaction": {}, "serviceNames": { "s1": "Consulting", "s2": null } }"#,
        )
        .unwrap();

        assert_eq!(bundle.service_names.len(), 1);
        assert_eq!(bundle.service_names["s1"], "Consulting");
    }
}
