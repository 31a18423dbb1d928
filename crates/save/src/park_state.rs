// ---------------------------------------------------------------------------
// park_state – the park's saveable resources on disk
// ---------------------------------------------------------------------------
//
// A park state file reuses the design file container. Its chunk table holds
// a single resources chunk:
//   [0..4]   Resource count (u32)
//   then per resource:
//     key length (u16), UTF-8 key, data length (u32), data
//
// Keys are the `SAVE_KEY`s registered with the park's `SaveableRegistry`.

use std::path::Path;

use bevy::prelude::*;
use park_sim::{load_world, reset_world, save_world, ExtensionMap};

use crate::byte_stream::ByteReader;
use crate::config::{CHUNK_PARK_RESOURCES, PARK_STATE_MAX_KEY_LEN};
use crate::error::{TrackExportError, TrackImportError};
use crate::orca::{parse_chunk_table, push_chunk, unwrap_container, wrap_container};

pub fn encode_park_state(extensions: &ExtensionMap) -> Result<Vec<u8>, TrackExportError> {
    let mut body = Vec::new();
    body.extend_from_slice(&(extensions.len() as u32).to_le_bytes());
    for (key, data) in extensions {
        if key.len() > PARK_STATE_MAX_KEY_LEN {
            return Err(TrackExportError::StringTooLong(key.len()));
        }
        body.extend_from_slice(&(key.len() as u16).to_le_bytes());
        body.extend_from_slice(key.as_bytes());
        body.extend_from_slice(&(data.len() as u32).to_le_bytes());
        body.extend_from_slice(data);
    }
    let mut payload = Vec::new();
    push_chunk(&mut payload, CHUNK_PARK_RESOURCES, &body);
    Ok(wrap_container(&payload))
}

pub fn decode_park_state(bytes: &[u8]) -> Result<ExtensionMap, TrackImportError> {
    let payload = unwrap_container(bytes)?;
    let chunks = parse_chunk_table(&payload)?;
    let body = chunks
        .get(&CHUNK_PARK_RESOURCES)
        .ok_or(TrackImportError::MissingChunk(CHUNK_PARK_RESOURCES))?;

    let mut r = ByteReader::new(body);
    let count = r.read_u32()?;
    let mut extensions = ExtensionMap::new();
    for _ in 0..count {
        let key_len = r.read_u16()? as usize;
        let key = std::str::from_utf8(r.read_bytes(key_len)?)
            .map_err(|_| TrackImportError::InvalidString)?;
        let len = r.read_u32()? as usize;
        extensions.insert(key.to_string(), r.read_bytes(len)?.to_vec());
    }
    Ok(extensions)
}

/// Write every registered park resource to `path`. Returns how many were
/// stored.
#[cfg(not(target_arch = "wasm32"))]
pub fn save_park_state(world: &World, path: &Path) -> Result<usize, TrackExportError> {
    let extensions = save_world(world);
    let bytes = encode_park_state(&extensions)?;
    crate::atomic_write::atomic_write(path, &bytes)?;
    info!(
        "Saved park state to {} ({} resources, {} bytes)",
        path.display(),
        extensions.len(),
        bytes.len()
    );
    Ok(extensions.len())
}

/// Replace the park's registered resources with the ones stored at `path`.
/// Resources absent from the file return to their defaults. The park is left
/// untouched when the file cannot be read.
pub fn load_park_state(world: &mut World, path: &Path) -> Result<usize, TrackImportError> {
    let bytes = std::fs::read(path)?;
    let extensions = decode_park_state(&bytes)?;
    reset_world(world);
    let loaded = load_world(world, &extensions);
    info!(
        "Loaded park state from {} ({} of {} resources)",
        path.display(),
        loaded,
        extensions.len()
    );
    Ok(loaded)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extensions() -> ExtensionMap {
        let mut map = ExtensionMap::new();
        map.insert("action_queue".to_string(), vec![1, 2, 3]);
        map.insert("track_design_repository".to_string(), vec![7; 400]);
        map
    }

    #[test]
    fn test_park_state_keeps_every_resource() {
        let bytes = encode_park_state(&extensions()).unwrap();
        assert_eq!(decode_park_state(&bytes).unwrap(), extensions());
    }

    #[test]
    fn test_empty_park_state() {
        let bytes = encode_park_state(&ExtensionMap::new()).unwrap();
        assert!(decode_park_state(&bytes).unwrap().is_empty());
    }

    #[test]
    fn test_container_without_resources_chunk() {
        let bytes = wrap_container(&[]);
        let err = decode_park_state(&bytes).unwrap_err();
        assert!(
            matches!(err, TrackImportError::MissingChunk(CHUNK_PARK_RESOURCES)),
            "got: {err}"
        );
    }

    #[test]
    fn test_overlong_key_is_rejected() {
        let mut map = ExtensionMap::new();
        map.insert("k".repeat(PARK_STATE_MAX_KEY_LEN + 1), vec![0]);
        assert!(matches!(
            encode_park_state(&map),
            Err(TrackExportError::StringTooLong(256))
        ));
    }

    #[test]
    fn test_truncated_park_state_is_error() {
        let bytes = encode_park_state(&extensions()).unwrap();
        for len in [0, 10, bytes.len() / 2, bytes.len() - 1] {
            assert!(decode_park_state(&bytes[..len]).is_err(), "prefix of {len} decoded");
        }
    }
}
