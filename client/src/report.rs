//! # report — render the bid and write it to the output file

use std::path::{Path, PathBuf};

use crate::error::ClientError;

/// Parse `bid` and render it with two decimals, e.g. `"5.4321"` → `"5.43"`.
pub fn format_bid(bid: &str) -> Result<String, ClientError> {
    let value: f64 = bid.parse().map_err(|e: std::num::ParseFloatError| {
        ClientError::Parse {
            bid:    bid.to_string(),
            reason: e.to_string(),
        }
    })?;

    if !value.is_finite() {
        return Err(ClientError::Parse {
            bid:    bid.to_string(),
            reason: "value is not finite".to_string(),
        });
    }

    Ok(format!("{value:.2}"))
}

/// The single line written to the output file.
pub fn render(bid: &str) -> Result<String, ClientError> {
    Ok(format!("Dólar: R$ {}\n", format_bid(bid)?))
}

/// Replace `path` with `line` and return the number of bytes written.
///
/// The line goes to a sibling staging file first and is renamed into place,
/// so `path` is either fully rewritten or left as it was.
pub async fn write_report(path: &Path, line: &str) -> Result<usize, ClientError> {
    let staging = staging_path(path);

    if let Err(e) = tokio::fs::write(&staging, line).await {
        let _ = tokio::fs::remove_file(&staging).await;
        return Err(e.into());
    }
    if let Err(e) = tokio::fs::rename(&staging, path).await {
        let _ = tokio::fs::remove_file(&staging).await;
        return Err(e.into());
    }

    Ok(line.len())
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
