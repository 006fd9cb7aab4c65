use anyhow::{anyhow, Result};
use serde::de::DeserializeOwned;

/// Deserialize with JSON-path context in error messages. `origin` names the
/// source (file path, `--clause-json`, ...) in the error.
pub fn from_str_with_path<T: DeserializeOwned>(src: &str, origin: &str) -> Result<T> {
    let de = &mut serde_json::Deserializer::from_str(src);
    serde_path_to_error::deserialize::<_, T>(de).map_err(|err| {
        let path = err.path().to_string();
        anyhow!("{origin}: at JSON path {path} → {}", err.into_inner())
    })
}

/// One value per non-blank line.
pub fn ndjson_with_path<T: DeserializeOwned>(src: &str, origin: &str) -> Result<Vec<T>> {
    src.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(ix, line)| from_str_with_path(line, &format!("{origin}:{}", ix + 1)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn ndjson_skips_blank_lines() {
        let values: Vec<Value> = ndjson_with_path("{\"a\":1}\n\n[2]\n", "mem").unwrap();
        assert_eq!(values.len(), 2);
    }

    #[test]
    fn errors_name_the_origin_line() {
        let err = ndjson_with_path::<Value>("{}\n{oops\n", "docs.ndjson").unwrap_err();
        assert!(err.to_string().starts_with("docs.ndjson:2"));
    }
}
