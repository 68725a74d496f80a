//! The `manifest.json` descriptor.
//!
//! Manifests arrive as untyped JSON from pull requests. [`AppManifest::from_value`]
//! is the single parse-and-validate step: it either yields a typed manifest or
//! every field error it found, in a fixed order (`name`, `href`, `desc`,
//! `category`, `tags`, `isVeWorldSupported`, `repo`, `contracts`, tag entries).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::num::FpCategory;

use crate::SchemaOptions;
use crate::pattern::{is_contract_address, is_http_url};

/// Store section an app is listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// NFT collections and galleries.
    Collectibles,
    /// Decentralized finance.
    Defi,
    /// Games.
    Games,
    /// NFT and token marketplaces.
    Marketplaces,
    /// Wallets, explorers and other tools.
    Utilities,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Category; 5] = [
        Category::Collectibles,
        Category::Defi,
        Category::Games,
        Category::Marketplaces,
        Category::Utilities,
    ];

    /// The wire name of this category.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Collectibles => "collectibles",
            Category::Defi => "defi",
            Category::Games => "games",
            Category::Marketplaces => "marketplaces",
            Category::Utilities => "utilities",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown category '{s}'"))
    }
}

/// A single manifest field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{reason}")]
pub struct FieldError {
    /// JSON key of the offending field.
    pub field: &'static str,
    /// Human-readable reason, phrased for the submitter.
    pub reason: String,
}

impl FieldError {
    fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// All field errors found in one manifest, in check order. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    /// The first failing field in check order.
    pub fn first(&self) -> &FieldError {
        // Only constructed from a non-empty list in `from_value`.
        &self.0[0]
    }

    /// Iterate over every error.
    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.0.iter()
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reasons: Vec<&str> = self.0.iter().map(|e| e.reason.as_str()).collect();
        f.write_str(&reasons.join("; "))
    }
}

impl std::error::Error for FieldErrors {}

/// A validated app manifest.
///
/// Fields the schema does not know about are kept in `extra` so the packer
/// can pass them through unchanged.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppManifest {
    /// Display name.
    pub name: String,
    /// Landing page, `http://` or `https://`.
    pub href: String,
    /// Short description.
    pub desc: String,
    /// Store section.
    pub category: Category,
    /// Free-form tags, order preserved.
    pub tags: Vec<String>,
    /// Source repository URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
    /// Contract addresses the app interacts with.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contracts: Option<Vec<String>>,
    /// Whether the app works inside the VeWorld wallet browser.
    #[serde(rename = "isVeWorldSupported", skip_serializing_if = "Option::is_none")]
    pub is_veworld_supported: Option<bool>,
    /// Unknown fields, in source order.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

const KNOWN_FIELDS: [&str; 8] = [
    "name",
    "href",
    "desc",
    "category",
    "tags",
    "repo",
    "contracts",
    "isVeWorldSupported",
];

impl AppManifest {
    /// Parse and validate a manifest object.
    ///
    /// # Errors
    ///
    /// Returns [`FieldErrors`] listing every field that is missing, has the
    /// wrong type, or violates its pattern.
    pub fn from_value(obj: &Map<String, Value>, opts: SchemaOptions) -> Result<Self, FieldErrors> {
        let mut errors = Vec::new();

        let name = non_empty_str(obj, "name");
        if name.is_none() {
            errors.push(FieldError::new("name", "name should be a string"));
        }

        let href = non_empty_str(obj, "href").filter(|s| is_http_url(s));
        if href.is_none() {
            errors.push(FieldError::new(
                "href",
                "href should be a url and start with http or https",
            ));
        }

        let desc = non_empty_str(obj, "desc");
        if desc.is_none() {
            errors.push(FieldError::new("desc", "desc should be a string"));
        }

        let category = non_empty_str(obj, "category").and_then(|s| s.parse::<Category>().ok());
        if category.is_none() {
            errors.push(FieldError::new("category", "invalid category"));
        }

        let tags = obj.get("tags").and_then(Value::as_array);
        if tags.is_none() {
            errors.push(FieldError::new("tags", "tags should be an array"));
        }

        let is_veworld_supported = match present(obj, "isVeWorldSupported") {
            Some(Value::Bool(b)) => Some(*b),
            None if !opts.require_is_veworld_supported => None,
            _ => {
                errors.push(FieldError::new(
                    "isVeWorldSupported",
                    "isVeWorldSupported should be a boolean",
                ));
                None
            }
        };

        // Optional fields are only checked when truthy.
        let repo = match truthy(obj, "repo") {
            None => None,
            Some(Value::String(s)) if is_http_url(s) => Some(s.clone()),
            Some(_) => {
                errors.push(FieldError::new(
                    "repo",
                    "repo should be a url and start with http or https",
                ));
                None
            }
        };

        let contracts = match truthy(obj, "contracts") {
            None => None,
            Some(Value::Array(items)) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    match item.as_str() {
                        Some(s) if is_contract_address(s) => out.push(s.to_string()),
                        _ => {
                            errors.push(FieldError::new("contracts", "invalid contract address"));
                            break;
                        }
                    }
                }
                Some(out)
            }
            Some(_) => {
                errors.push(FieldError::new("contracts", "contracts should be an array"));
                None
            }
        };

        let mut tag_list = Vec::new();
        if let Some(items) = tags {
            for item in items {
                match item.as_str() {
                    Some(s) if !s.is_empty() => tag_list.push(s.to_string()),
                    _ => {
                        errors.push(FieldError::new("tags", "tags should be a string"));
                        break;
                    }
                }
            }
        }

        let extra = obj
            .iter()
            .filter(|(k, _)| !KNOWN_FIELDS.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        // A missing required value always left an entry in `errors`.
        match (name, href, desc, category) {
            (Some(name), Some(href), Some(desc), Some(category)) if errors.is_empty() => Ok(Self {
                name: name.to_string(),
                href: href.to_string(),
                desc: desc.to_string(),
                category,
                tags: tag_list,
                repo,
                contracts,
                is_veworld_supported,
                extra,
            }),
            _ => Err(FieldErrors(errors)),
        }
    }
}

fn non_empty_str<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    obj.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// A value counts as present unless it is missing, `null` or `""`.
fn present<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    match obj.get(key) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.is_empty() => None,
        Some(v) => Some(v),
    }
}

/// Like [`present`], but `false` and `0` count as absent too.
fn truthy<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    match present(obj, key)? {
        Value::Bool(false) => None,
        Value::Number(n) if n.as_f64().map(f64::classify) == Some(FpCategory::Zero) => None,
        v => Some(v),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid() -> Map<String, Value> {
        json!({
            "name": "Example",
            "href": "https://example.com",
            "desc": "An example dapp",
            "category": "defi",
            "tags": ["swap", "dex"],
            "isVeWorldSupported": true
        })
        .as_object()
        .unwrap()
        .clone()
    }

    fn first_field(obj: &Map<String, Value>, opts: SchemaOptions) -> &'static str {
        AppManifest::from_value(obj, opts).unwrap_err().first().field
    }

    #[test]
    fn test_valid_manifest_parses() {
        let m = AppManifest::from_value(&valid(), SchemaOptions::default()).unwrap();
        assert_eq!(m.name, "Example");
        assert_eq!(m.category, Category::Defi);
        assert_eq!(m.tags, vec!["swap", "dex"]);
        assert_eq!(m.is_veworld_supported, Some(true));
        assert!(m.extra.is_empty());
    }

    #[test]
    fn test_missing_required_fields_are_named() {
        let opts = SchemaOptions::default();
        for field in ["name", "href", "desc", "category", "tags", "isVeWorldSupported"] {
            let mut obj = valid();
            obj.remove(field);
            assert_eq!(first_field(&obj, opts), field, "removing {field}");
        }
    }

    #[test]
    fn test_wrong_types_are_named() {
        let opts = SchemaOptions::default();
        let cases = [
            ("name", json!(42)),
            ("name", json!("")),
            ("href", json!("example.com")),
            ("desc", json!(["x"])),
            ("category", json!("casino")),
            ("category", json!("defi-games")),
            ("tags", json!("swap")),
            ("isVeWorldSupported", json!("yes")),
            ("repo", json!("git@github.com:a/b.git")),
            ("contracts", json!("0x0")),
            ("contracts", json!(["0x1234"])),
        ];
        for (field, value) in cases {
            let mut obj = valid();
            obj.insert(field.to_string(), value.clone());
            assert_eq!(first_field(&obj, opts), field, "{field} = {value}");
        }
    }

    #[test]
    fn test_empty_tag_is_rejected() {
        let mut obj = valid();
        obj.insert("tags".into(), json!(["ok", ""]));
        let errs = AppManifest::from_value(&obj, SchemaOptions::default()).unwrap_err();
        assert_eq!(errs.first().field, "tags");
        assert_eq!(errs.first().reason, "tags should be a string");
    }

    #[test]
    fn test_errors_collected_in_check_order() {
        let obj = json!({ "tags": [1] }).as_object().unwrap().clone();
        let errs = AppManifest::from_value(&obj, SchemaOptions::default()).unwrap_err();
        let fields: Vec<_> = errs.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec!["name", "href", "desc", "category", "isVeWorldSupported", "tags"]
        );
    }

    #[test]
    fn test_veworld_flag_optional_in_legacy_schema() {
        let mut obj = valid();
        obj.remove("isVeWorldSupported");
        let m = AppManifest::from_value(&obj, SchemaOptions::legacy()).unwrap();
        assert_eq!(m.is_veworld_supported, None);

        obj.insert("isVeWorldSupported".into(), json!(1));
        assert_eq!(
            first_field(&obj, SchemaOptions::legacy()),
            "isVeWorldSupported"
        );
    }

    #[test]
    fn test_optional_fields() {
        let mut obj = valid();
        obj.insert("repo".into(), json!(""));
        obj.insert("contracts".into(), json!(null));
        let m = AppManifest::from_value(&obj, SchemaOptions::default()).unwrap();
        assert_eq!(m.repo, None);
        assert_eq!(m.contracts, None);

        obj.insert("repo".into(), json!(false));
        obj.insert("contracts".into(), json!(0));
        let m = AppManifest::from_value(&obj, SchemaOptions::default()).unwrap();
        assert_eq!(m.repo, None);
        assert_eq!(m.contracts, None);

        obj.insert("repo".into(), json!(true));
        assert_eq!(first_field(&obj, SchemaOptions::default()), "repo");
        obj.insert("repo".into(), json!(""));

        obj.insert("repo".into(), json!("https://github.com/example/app"));
        obj.insert(
            "contracts".into(),
            json!(["0x0000000000000000000000000000456e65726779"]),
        );
        let m = AppManifest::from_value(&obj, SchemaOptions::default()).unwrap();
        assert_eq!(m.repo.as_deref(), Some("https://github.com/example/app"));
        assert_eq!(m.contracts.unwrap().len(), 1);
    }

    #[test]
    fn test_unknown_fields_kept_in_order() {
        let mut obj = valid();
        obj.insert("zeta".into(), json!(1));
        obj.insert("alpha".into(), json!({ "x": 2 }));
        let m = AppManifest::from_value(&obj, SchemaOptions::default()).unwrap();
        let keys: Vec<_> = m.extra.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_category_round_trip_names() {
        for c in Category::ALL {
            assert_eq!(c.as_str().parse::<Category>().unwrap(), c);
        }
        assert!("Defi".parse::<Category>().is_err());
    }
}
