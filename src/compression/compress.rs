use crate::core::error::Result;

/// A byte blob with its pre-compression size recorded alongside it, so
/// decompression doesn't need to guess an output buffer size. Used to wrap
/// the serialized index payload.
#[derive(Debug, Clone)]
pub struct CompressedBlock {
    pub data: Vec<u8>,
    pub original_size: usize,
}

impl CompressedBlock {
    pub fn compress(data: &[u8]) -> Result<Self> {
        let compressed = lz4::block::compress(data, None, false)?;
        Ok(CompressedBlock {
            data: compressed,
            original_size: data.len(),
        })
    }

    pub fn decompress(&self) -> Result<Vec<u8>> {
        Ok(lz4::block::decompress(
            &self.data,
            Some(self.original_size as i32),
        )?)
    }
}
