use crate::{ByteCounter, ByteReader, ByteWrite, SerdeErr};

/// A type that can be written to and read back from the wire.
pub trait Serde: Sized + Clone {
    fn ser(&self, writer: &mut dyn ByteWrite);

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr>;

    /// Number of bytes `ser` writes for this value.
    fn byte_length(&self) -> usize {
        let mut counter = ByteCounter::new();
        self.ser(&mut counter);
        counter.byte_count()
    }
}

/// Serde for types whose encoded length does not depend on the value.
pub trait ConstByteLength {
    fn const_byte_length() -> usize;
}
