// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Source ingestion: size gate, container sniffing, HEIC transcode through the
// platform bridge, and decoding. Blocking work runs on tokio's blocking pool.

use std::sync::Arc;
use std::time::Duration;

use inkwash_bridge::PlatformBridge;
use inkwash_core::error::{InkwashError, Result};
use inkwash_core::{AppConfig, SourceHint};
use inkwash_image::{Raster, SourceContainer, data_uri, decode};
use tracing::{debug, info, instrument, warn};

/// A decoded source ready to be installed in a session.
#[derive(Debug, Clone)]
pub struct LoadedSource {
    pub raster: Raster,
    /// Container the bytes arrived in, before any transcode.
    pub container: SourceContainer,
    /// File name stem used for downloads.
    pub base_name: String,
    /// PNG `data:` URI of the untouched source.
    pub preview_uri: String,
}

/// Reject inputs larger than `limit` bytes.
pub fn check_input_size(len: u64, limit: u64) -> Result<()> {
    if len > limit {
        return Err(InkwashError::InputTooLarge { size: len, limit });
    }
    Ok(())
}

/// Turn raw upload bytes into a decoded source.
#[instrument(skip(bytes, bridge, config), fields(data_len = bytes.len(), file_name = ?hint.file_name))]
pub async fn ingest(
    bytes: Vec<u8>,
    hint: SourceHint,
    bridge: Arc<dyn PlatformBridge>,
    config: &AppConfig,
) -> Result<LoadedSource> {
    check_input_size(bytes.len() as u64, config.max_input_bytes)?;

    let container = SourceContainer::sniff(&bytes, &hint);
    debug!(container = ?container, "source sniffed");

    let decodable = match container {
        SourceContainer::Heic => transcode(bytes, bridge, config.heic_timeout_secs).await?,
        SourceContainer::Unknown => {
            let label = hint
                .mime_type
                .clone()
                .or_else(|| hint.extension())
                .unwrap_or_else(|| "unknown".into());
            return Err(InkwashError::UnsupportedFormat(label));
        }
        _ => bytes,
    };

    let (raster, preview_uri) = tokio::task::spawn_blocking(move || {
        let raster = decode(&decodable)?;
        let preview = data_uri(&raster)?;
        Ok::<_, InkwashError>((raster, preview))
    })
    .await
    .map_err(|e| InkwashError::Decode(format!("decode worker failed: {e}")))??;

    info!(
        width = raster.width(),
        height = raster.height(),
        "Source ingested"
    );
    Ok(LoadedSource {
        raster,
        container,
        base_name: hint.base_name(),
        preview_uri,
    })
}

/// Run the bridge's HEIC converter with an upper time bound.
///
/// On timeout the blocking call is abandoned and its output dropped. The
/// desktop bridge kills its converter process at the same deadline.
async fn transcode(
    heic: Vec<u8>,
    bridge: Arc<dyn PlatformBridge>,
    timeout_secs: u64,
) -> Result<Vec<u8>> {
    let work = tokio::task::spawn_blocking(move || bridge.transcode_heic(&heic));
    match tokio::time::timeout(Duration::from_secs(timeout_secs), work).await {
        Ok(Ok(result)) => result,
        Ok(Err(e)) => Err(InkwashError::Transcode(format!("transcode worker failed: {e}"))),
        Err(_) => {
            warn!(timeout_secs, "HEIC transcode timed out");
            Err(InkwashError::TranscodeTimeout {
                seconds: timeout_secs,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_limit_is_inclusive() {
        assert!(check_input_size(10, 10).is_ok());
        let err = check_input_size(11, 10).unwrap_err();
        assert!(matches!(
            err,
            InkwashError::InputTooLarge { size: 11, limit: 10 }
        ));
    }
}
