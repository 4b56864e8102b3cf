//! Persistence of the button order map.
//!
//! The raw block read/write is provided by a [`MapStorage`] implementation
//! (flash on the device, memory in tests). This module owns the layout and
//! the load/save policy.
//!
//! # Layout
//!
//! `NUM_BUTTONS` bytes, byte `i` holding the raw input index bound to
//! logical button `i`. There is no checksum or version tag. Any byte is
//! accepted (duplicates and axis inputs included) except one `>= NUM_INPUT`,
//! which cannot address an input: such a block loads as
//! [`StorageError::Corrupt`] and [`load_or_identity`] falls back to identity.

use crate::order::ButtonOrderMap;
use crate::table::{NUM_BUTTONS, NUM_INPUT};

/// Size of the persisted block in bytes.
pub const MAP_BLOCK_LEN: usize = NUM_BUTTONS;

/// Error type for storage operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError {
    /// Nothing has been stored yet (first boot).
    NotFound,
    /// Stored bytes do not address a physical input.
    Corrupt,
    /// The underlying read or write failed.
    Io,
}

/// Raw non-volatile storage for the map block.
///
/// Writes must be durable once [`write`](MapStorage::write) returns, and a
/// read after a write must return the written bytes.
pub trait MapStorage {
    /// Read the stored block into `buf`.
    ///
    /// Returns [`StorageError::NotFound`] when no block has been written.
    fn read(&mut self, buf: &mut [u8; MAP_BLOCK_LEN]) -> Result<(), StorageError>;

    /// Replace the stored block with `data`.
    fn write(&mut self, data: &[u8; MAP_BLOCK_LEN]) -> Result<(), StorageError>;
}

impl<S: MapStorage + ?Sized> MapStorage for &mut S {
    fn read(&mut self, buf: &mut [u8; MAP_BLOCK_LEN]) -> Result<(), StorageError> {
        (**self).read(buf)
    }

    fn write(&mut self, data: &[u8; MAP_BLOCK_LEN]) -> Result<(), StorageError> {
        (**self).write(data)
    }
}

/// Decode a stored block.
///
/// Bytes are taken as stored; only indices that cannot address an input
/// are rejected.
pub fn decode(block: &[u8; MAP_BLOCK_LEN]) -> Result<ButtonOrderMap, StorageError> {
    if block.iter().any(|&physical| physical as usize >= NUM_INPUT) {
        return Err(StorageError::Corrupt);
    }
    Ok(ButtonOrderMap::from_raw(*block))
}

/// Load the persisted map.
pub fn load<S: MapStorage>(storage: &mut S) -> Result<ButtonOrderMap, StorageError> {
    let mut block = [0u8; MAP_BLOCK_LEN];
    storage.read(&mut block)?;
    decode(&block)
}

/// Persist `map`.
pub fn save<S: MapStorage>(storage: &mut S, map: &ButtonOrderMap) -> Result<(), StorageError> {
    storage.write(map.as_raw())
}

/// Load the persisted map, falling back to the identity permutation.
pub fn load_or_identity<S: MapStorage>(storage: &mut S) -> ButtonOrderMap {
    match load(storage) {
        Ok(map) => {
            info!("Button order loaded: {:?}", map.as_raw());
            map
        }
        Err(StorageError::NotFound) => {
            info!("No stored button order, using identity");
            ButtonOrderMap::identity()
        }
        Err(e) => {
            warn!("Stored button order unusable ({:?}), using identity", e);
            ButtonOrderMap::identity()
        }
    }
}

/// In-memory storage, empty until the first write.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    block: Option<[u8; MAP_BLOCK_LEN]>,
    writes: usize,
}

impl MemoryStorage {
    /// Storage with nothing written yet.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            block: None,
            writes: 0,
        }
    }

    /// Storage pre-loaded with `block`.
    #[must_use]
    pub const fn with_block(block: [u8; MAP_BLOCK_LEN]) -> Self {
        Self {
            block: Some(block),
            writes: 0,
        }
    }

    /// Number of completed writes.
    #[must_use]
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl MapStorage for MemoryStorage {
    fn read(&mut self, buf: &mut [u8; MAP_BLOCK_LEN]) -> Result<(), StorageError> {
        let block = self.block.ok_or(StorageError::NotFound)?;
        *buf = block;
        Ok(())
    }

    fn write(&mut self, data: &[u8; MAP_BLOCK_LEN]) -> Result<(), StorageError> {
        self.block = Some(*data);
        self.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingStorage;

    impl MapStorage for FailingStorage {
        fn read(&mut self, _buf: &mut [u8; MAP_BLOCK_LEN]) -> Result<(), StorageError> {
            Err(StorageError::Io)
        }

        fn write(&mut self, _data: &[u8; MAP_BLOCK_LEN]) -> Result<(), StorageError> {
            Err(StorageError::Io)
        }
    }

    #[test]
    fn test_save_then_load() {
        let mut storage = MemoryStorage::new();
        let map = ButtonOrderMap::from_raw([3, 1, 4, 0, 5, 9, 2, 6, 8, 7]);
        save(&mut storage, &map).unwrap();
        assert_eq!(load(&mut storage), Ok(map));
    }

    #[test]
    fn test_load_not_found_falls_back_to_identity() {
        let mut storage = MemoryStorage::new();
        assert_eq!(load(&mut storage), Err(StorageError::NotFound));
        assert_eq!(
            load_or_identity(&mut storage).as_raw(),
            &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9]
        );
    }

    #[test]
    fn test_out_of_range_index_is_corrupt() {
        let mut storage = MemoryStorage::with_block([0xFF; MAP_BLOCK_LEN]);
        assert_eq!(load(&mut storage), Err(StorageError::Corrupt));
        assert_eq!(load_or_identity(&mut storage), ButtonOrderMap::identity());
    }

    #[test]
    fn test_duplicates_are_accepted_as_stored() {
        let mut storage = MemoryStorage::with_block([1; MAP_BLOCK_LEN]);
        let map = load(&mut storage).unwrap();
        assert_eq!(map.as_raw(), &[1; MAP_BLOCK_LEN]);
    }

    #[test]
    fn test_axis_indices_are_accepted() {
        let block = [13, 12, 11, 10, 4, 5, 6, 7, 8, 9];
        assert_eq!(decode(&block), Ok(ButtonOrderMap::from_raw(block)));
    }

    #[test]
    fn test_io_error_falls_back_to_identity() {
        assert_eq!(load(&mut FailingStorage), Err(StorageError::Io));
        assert_eq!(
            load_or_identity(&mut FailingStorage),
            ButtonOrderMap::identity()
        );
        assert_eq!(
            save(&mut FailingStorage, &ButtonOrderMap::identity()),
            Err(StorageError::Io)
        );
    }

    #[test]
    fn test_write_counter() {
        let mut storage = MemoryStorage::new();
        save(&mut storage, &ButtonOrderMap::identity()).unwrap();
        save(&mut storage, &ButtonOrderMap::identity()).unwrap();
        assert_eq!(storage.writes(), 2);
    }
}
