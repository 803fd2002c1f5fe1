use crate::{ByteReader, ByteWrite, ConstByteLength, Serde, SerdeErr};

// Fixed width numbers are little-endian on the wire.

macro_rules! impl_serde_for_number {
    ($type:ty) => {
        impl Serde for $type {
            fn ser(&self, writer: &mut dyn ByteWrite) {
                writer.write_bytes(&self.to_le_bytes());
            }

            fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
                Ok(<$type>::from_le_bytes(reader.read_array()?))
            }

            fn byte_length(&self) -> usize {
                std::mem::size_of::<$type>()
            }
        }

        impl ConstByteLength for $type {
            fn const_byte_length() -> usize {
                std::mem::size_of::<$type>()
            }
        }
    };
}

impl_serde_for_number!(u8);
impl_serde_for_number!(u16);
impl_serde_for_number!(u32);
impl_serde_for_number!(u64);
impl_serde_for_number!(i16);
impl_serde_for_number!(i32);
impl_serde_for_number!(f32);

impl Serde for bool {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        writer.write_byte(u8::from(*self));
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        match reader.read_byte()? {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(SerdeErr),
        }
    }

    fn byte_length(&self) -> usize {
        1
    }
}

impl ConstByteLength for bool {
    fn const_byte_length() -> usize {
        1
    }
}

// Strings and blobs carry a u16 length prefix.

impl Serde for String {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        let bytes = self.as_bytes();
        let length = bytes.len().min(u16::MAX as usize);
        (length as u16).ser(writer);
        writer.write_bytes(&bytes[..length]);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        let length = u16::de(reader)? as usize;
        let bytes = reader.read_bytes(length)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| SerdeErr)
    }
}

impl Serde for Vec<u8> {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        let length = self.len().min(u16::MAX as usize);
        (length as u16).ser(writer);
        writer.write_bytes(&self[..length]);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        let length = u16::de(reader)? as usize;
        Ok(reader.read_bytes(length)?.to_vec())
    }
}

impl<T: Serde> Serde for Option<T> {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        match self {
            Some(value) => {
                true.ser(writer);
                value.ser(writer);
            }
            None => false.ser(writer),
        }
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        if bool::de(reader)? {
            Ok(Some(T::de(reader)?))
        } else {
            Ok(None)
        }
    }
}
