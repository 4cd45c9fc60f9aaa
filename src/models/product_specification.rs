use serde::Deserialize;
use std::collections::BTreeMap;

use crate::utils::de;

#[derive(Debug, Clone, Deserialize)]
pub struct ProductSpecification {
    #[serde(deserialize_with = "de::int")]
    pub id: i64,
    #[serde(deserialize_with = "de::int")]
    pub product_id: i64,
    #[serde(default)]
    pub product_name: Option<String>,
    pub spec_name: String,
    #[serde(default)]
    pub spec_value: String,
    #[serde(default)]
    pub spec_group: Option<String>,
    #[serde(default, deserialize_with = "de::opt_int")]
    pub display_order: Option<i64>,
}

/// Specifications keyed by group name, as returned with `grouped=1`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GroupedSpecifications {
    #[serde(default)]
    pub data: BTreeMap<String, Vec<ProductSpecification>>,
}

/// Groups a flat list by `spec_group`; ungrouped rows land under `General`.
pub fn group_specifications(
    specs: impl IntoIterator<Item = ProductSpecification>,
) -> BTreeMap<String, Vec<ProductSpecification>> {
    let mut groups: BTreeMap<String, Vec<ProductSpecification>> = BTreeMap::new();
    for spec in specs {
        let key = spec
            .spec_group
            .as_deref()
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .unwrap_or("General")
            .to_string();
        groups.entry(key).or_default().push(spec);
    }
    for specs in groups.values_mut() {
        specs.sort_by_key(|s| (s.display_order.unwrap_or(i64::MAX), s.id));
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(id: i64, group: Option<&str>, order: Option<i64>) -> ProductSpecification {
        ProductSpecification {
            id,
            product_id: 1,
            product_name: None,
            spec_name: format!("spec-{}", id),
            spec_value: "x".into(),
            spec_group: group.map(str::to_string),
            display_order: order,
        }
    }

    #[test]
    fn groups_and_orders() {
        let groups = group_specifications(vec![
            spec(1, Some("Sensor"), Some(2)),
            spec(2, None, None),
            spec(3, Some("Sensor"), Some(1)),
            spec(4, Some("  "), Some(0)),
        ]);

        let sensor: Vec<i64> = groups["Sensor"].iter().map(|s| s.id).collect();
        let general: Vec<i64> = groups["General"].iter().map(|s| s.id).collect();
        assert_eq!(sensor, vec![3, 1]);
        assert_eq!(general, vec![4, 2]);
    }
}
