//! Button order storage in the last flash sector.

use embassy_rp::flash::{Blocking, Error as FlashError, Flash, ERASE_SIZE};
use embassy_rp::peripherals::FLASH;
use joystick_core::storage::MAP_BLOCK_LEN;
use joystick_core::{MapStorage, StorageError};

/// Size of the on-board flash (Raspberry Pi Pico).
pub const FLASH_SIZE: usize = 2 * 1024 * 1024;

/// Offset of the storage sector; `memory.x` keeps the program below it.
pub const MAP_OFFSET: u32 = (FLASH_SIZE - ERASE_SIZE) as u32;

/// Value of an erased flash byte.
const ERASED: u8 = 0xFF;

/// Convert flash errors to [`StorageError`].
///
/// This is a helper function instead of a `From` impl to avoid orphan rule issues
/// (both `FlashError` and `StorageError` are defined in external crates).
#[inline]
fn flash_error_to_storage_error(e: FlashError) -> StorageError {
    defmt::error!("Flash error: {:?}", e);
    StorageError::Io
}

/// [`MapStorage`] over the RP2040 QSPI flash.
///
/// An erased block is reported as [`StorageError::NotFound`].
pub struct FlashStorage<'d> {
    flash: Flash<'d, FLASH, Blocking, FLASH_SIZE>,
}

impl<'d> FlashStorage<'d> {
    #[must_use]
    pub fn new(flash: Flash<'d, FLASH, Blocking, FLASH_SIZE>) -> Self {
        Self { flash }
    }
}

impl MapStorage for FlashStorage<'_> {
    fn read(&mut self, buf: &mut [u8; MAP_BLOCK_LEN]) -> Result<(), StorageError> {
        self.flash
            .blocking_read(MAP_OFFSET, buf)
            .map_err(flash_error_to_storage_error)?;

        if buf.iter().all(|&b| b == ERASED) {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    fn write(&mut self, data: &[u8; MAP_BLOCK_LEN]) -> Result<(), StorageError> {
        defmt::info!("Writing button order to flash");
        self.flash
            .blocking_erase(MAP_OFFSET, MAP_OFFSET + ERASE_SIZE as u32)
            .map_err(flash_error_to_storage_error)?;
        self.flash
            .blocking_write(MAP_OFFSET, data)
            .map_err(flash_error_to_storage_error)
    }
}
