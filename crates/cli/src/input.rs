use std::io::Read;
use std::path::Path;

use anyhow::Context;
use serde_json::Value;

/// Read a JSON document from a path, or stdin for `-`.
pub fn read_json(path: &Path) -> anyhow::Result<Value> {
    let raw = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("reading stdin")?;
        buf
    } else {
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?
    };

    serde_json::from_str(&raw).with_context(|| format!("parsing {} as JSON", path.display()))
}
