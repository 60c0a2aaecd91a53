use anyhow::anyhow;
use serde::de::DeserializeOwned;

/// Deserialize with JSON-path context in error messages.
pub fn from_str_with_path<T: DeserializeOwned>(src: &str) -> anyhow::Result<T> {
    let de = &mut serde_json::Deserializer::from_str(src);
    serde_path_to_error::deserialize::<_, T>(de).map_err(|err| {
        let path = err.path().to_string();
        anyhow!("at JSON path {path} → {}", err.into_inner())
    })
}

/// Same, for a document that is already parsed (e.g. a JSON-pointer selection).
pub fn from_value_with_path<T: DeserializeOwned>(value: serde_json::Value) -> anyhow::Result<T> {
    serde_path_to_error::deserialize::<_, T>(value).map_err(|err| {
        let path = err.path().to_string();
        anyhow!("at JSON path {path} → {}", err.into_inner())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, serde::Deserialize)]
    struct Probe {
        #[allow(dead_code)]
        inner: Vec<u8>,
    }

    #[test]
    fn errors_carry_the_json_path() {
        let err = from_str_with_path::<Probe>(r#"{"inner": [1, "x"]}"#).unwrap_err();
        assert!(err.to_string().contains("inner[1]"), "{err}");

        let err = from_value_with_path::<Probe>(serde_json::json!({"inner": 3})).unwrap_err();
        assert!(err.to_string().contains("inner"), "{err}");
    }
}
