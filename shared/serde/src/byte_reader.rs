use crate::SerdeErr;

/// Cursor over an incoming datagram.
pub struct ByteReader<'b> {
    buffer: &'b [u8],
    position: usize,
}

impl<'b> ByteReader<'b> {
    pub fn new(buffer: &'b [u8]) -> Self {
        Self {
            buffer,
            position: 0,
        }
    }

    pub fn read_byte(&mut self) -> Result<u8, SerdeErr> {
        let byte = *self.buffer.get(self.position).ok_or(SerdeErr)?;
        self.position += 1;
        Ok(byte)
    }

    /// Borrows the next `length` bytes and advances past them.
    pub fn read_bytes(&mut self, length: usize) -> Result<&'b [u8], SerdeErr> {
        let end = self.position.checked_add(length).ok_or(SerdeErr)?;
        let bytes = self.buffer.get(self.position..end).ok_or(SerdeErr)?;
        self.position = end;
        Ok(bytes)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], SerdeErr> {
        let mut output = [0u8; N];
        output.copy_from_slice(self.read_bytes(N)?);
        Ok(output)
    }

    /// Splits off a reader over the next `length` bytes. The parent skips
    /// past them whether or not the sub reader consumes everything.
    pub fn sub_reader(&mut self, length: usize) -> Result<ByteReader<'b>, SerdeErr> {
        Ok(ByteReader::new(self.read_bytes(length)?))
    }

    /// Everything not yet read.
    pub fn read_remaining(&mut self) -> &'b [u8] {
        let rest = &self.buffer[self.position..];
        self.position = self.buffer.len();
        rest
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.position
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }
}
