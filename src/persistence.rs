//! Saving fetched records into a dashboard region.
//!
//! The storage engine itself lives on the host page as a global
//! `saveToDatabase(region, records, merge)` function; this module only decides
//! what to hand it and moves the records across the JS boundary.

use js_sys::{Function, Promise, Reflect};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use crate::constants::SAVE_FN_NAME;
use crate::utils::js_error_message;

/// Pick the array worth saving out of a response body: the body itself when
/// it is an array, else its `data` property when that is an array, else
/// nothing.
pub fn extract_records(body: &serde_json::Value) -> Option<Vec<serde_json::Value>> {
    if let serde_json::Value::Array(items) = body {
        return Some(items.clone());
    }
    match body.get("data") {
        Some(serde_json::Value::Array(items)) => Some(items.clone()),
        _ => None,
    }
}

/// Seam over the host page's persistence function so runs can be driven
/// against a fake store.
#[allow(async_fn_in_trait)]
pub trait RegionStore {
    /// Whether the collaborator is present at all.
    fn available(&self) -> bool;

    /// Hand `records` to the store under `region`; `merge` asks for
    /// append/merge semantics rather than replacement.
    async fn save(
        &self,
        region: &str,
        records: &[serde_json::Value],
        merge: bool,
    ) -> Result<(), String>;
}

/// The host page's global `saveToDatabase` function.
pub struct DashboardStore;

impl DashboardStore {
    fn lookup(&self) -> Option<Function> {
        let window = web_sys::window()?;
        let value = Reflect::get(window.as_ref(), &JsValue::from_str(SAVE_FN_NAME)).ok()?;
        value.dyn_into::<Function>().ok()
    }

    async fn call(
        &self,
        region: &str,
        records: &[serde_json::Value],
        merge: bool,
    ) -> Result<(), JsValue> {
        let save_fn = self
            .lookup()
            .ok_or_else(|| JsValue::from_str("saveToDatabase is not available"))?;
        let window =
            web_sys::window().ok_or_else(|| JsValue::from_str("no global window exists"))?;

        // Plain JSON objects, not JS Maps, must cross the boundary.
        let serializer = serde_wasm_bindgen::Serializer::json_compatible();
        let js_records = records.serialize(&serializer).map_err(JsValue::from)?;

        let ret = save_fn.call3(
            window.as_ref(),
            &JsValue::from_str(region),
            &js_records,
            &JsValue::from_bool(merge),
        )?;

        // The collaborator may answer synchronously or with a promise.
        JsFuture::from(Promise::resolve(&ret)).await?;
        Ok(())
    }
}

impl RegionStore for DashboardStore {
    fn available(&self) -> bool {
        self.lookup().is_some()
    }

    async fn save(
        &self,
        region: &str,
        records: &[serde_json::Value],
        merge: bool,
    ) -> Result<(), String> {
        self.call(region, records, merge)
            .await
            .map_err(js_error_message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::{json, Value};

    #[test]
    fn whole_body_array_is_extracted() {
        let body = json!([{"a": 1}, {"a": 2}]);
        assert_eq!(
            extract_records(&body),
            Some(vec![json!({"a": 1}), json!({"a": 2})])
        );
    }

    #[test]
    fn data_property_array_is_extracted() {
        let body = json!({"data": [{"a": 1}], "count": 1});
        assert_eq!(extract_records(&body), Some(vec![json!({"a": 1})]));
    }

    #[test]
    fn body_without_an_array_yields_nothing() {
        assert_eq!(extract_records(&json!({"foo": "bar"})), None);
        assert_eq!(extract_records(&json!({"data": "not an array"})), None);
        assert_eq!(extract_records(&json!("plain string")), None);
        assert_eq!(extract_records(&Value::Null), None);
    }

    #[test]
    fn root_array_wins_over_nested_data_key() {
        let body = json!([{"data": [1, 2]}]);
        assert_eq!(extract_records(&body), Some(vec![json!({"data": [1, 2]})]));
    }

    // Strategies for arbitrary JSON bodies, kept small.

    fn json_leaf_strategy() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(|n| Value::Number(n.into())),
            "[a-z0-9]{0,8}".prop_map(Value::String),
        ]
    }

    fn json_value_strategy() -> impl Strategy<Value = Value> {
        json_leaf_strategy().prop_recursive(3, 24, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                prop::collection::hash_map("[a-z]{1,6}", inner, 0..4)
                    .prop_map(|map| Value::Object(map.into_iter().collect())),
            ]
        })
    }

    proptest! {
        #[test]
        fn root_arrays_extract_verbatim(
            items in prop::collection::vec(json_value_strategy(), 0..6)
        ) {
            prop_assert_eq!(extract_records(&Value::Array(items.clone())), Some(items));
        }

        #[test]
        fn data_arrays_extract_from_any_object(
            items in prop::collection::vec(json_value_strategy(), 0..6),
            extra in prop::collection::hash_map("[a-z]{1,6}", json_value_strategy(), 0..4)
        ) {
            let mut map: serde_json::Map<String, Value> = extra.into_iter().collect();
            map.insert("data".to_string(), Value::Array(items.clone()));
            prop_assert_eq!(extract_records(&Value::Object(map)), Some(items));
        }

        #[test]
        fn scalars_never_extract(v in json_leaf_strategy()) {
            prop_assert_eq!(extract_records(&v), None);
        }
    }
}
