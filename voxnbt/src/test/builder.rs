use std::convert::TryInto;

use crate::Tag;

/// Builder for NBT data. This is to create test data. It specifically does
/// *not* guarantee the resulting data is valid NBT, since invalid input is
/// what most decoder tests need.
#[derive(Default)]
pub struct Builder {
    payload: Vec<u8>,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tag(mut self, t: Tag) -> Self {
        self.payload.push(t as u8);
        self
    }

    pub fn name(mut self, name: &str) -> Self {
        let name = cesu8::to_java_cesu8(name);
        let len: u16 = name.len().try_into().expect("test name beyond u16");
        self.payload.extend_from_slice(&len.to_be_bytes());
        self.payload.extend_from_slice(&name);
        self
    }

    pub fn start_compound(self, name: &str) -> Self {
        self.tag(Tag::Compound).name(name)
    }

    pub fn end_compound(self) -> Self {
        self.tag(Tag::End)
    }

    pub fn start_list(self, name: &str, element_tag: Tag, size: i32) -> Self {
        self.tag(Tag::List)
            .name(name)
            .tag(element_tag)
            .int_payload(size)
    }

    pub fn byte(self, name: &str, b: i8) -> Self {
        self.tag(Tag::Byte).name(name).byte_payload(b)
    }

    pub fn short(self, name: &str, b: i16) -> Self {
        self.tag(Tag::Short).name(name).short_payload(b)
    }

    pub fn int(self, name: &str, b: i32) -> Self {
        self.tag(Tag::Int).name(name).int_payload(b)
    }

    pub fn long(self, name: &str, b: i64) -> Self {
        self.tag(Tag::Long).name(name).long_payload(b)
    }

    pub fn float(self, name: &str, n: f32) -> Self {
        self.tag(Tag::Float).name(name).raw_bytes(&n.to_be_bytes())
    }

    pub fn double(self, name: &str, n: f64) -> Self {
        self.tag(Tag::Double).name(name).raw_bytes(&n.to_be_bytes())
    }

    pub fn string(self, name: &str, s: &str) -> Self {
        self.tag(Tag::String).name(name).string_payload(s)
    }

    pub fn byte_array(self, name: &str, bs: &[i8]) -> Self {
        let mut b = self
            .tag(Tag::ByteArray)
            .name(name)
            .int_payload(bs.len().try_into().unwrap());
        for v in bs {
            b = b.byte_payload(*v);
        }
        b
    }

    pub fn int_array(self, name: &str, arr: &[i32]) -> Self {
        let mut b = self
            .tag(Tag::IntArray)
            .name(name)
            .int_payload(arr.len().try_into().unwrap());
        for v in arr {
            b = b.int_payload(*v);
        }
        b
    }

    pub fn long_array(self, name: &str, arr: &[i64]) -> Self {
        let mut b = self
            .tag(Tag::LongArray)
            .name(name)
            .int_payload(arr.len().try_into().unwrap());
        for v in arr {
            b = b.long_payload(*v);
        }
        b
    }

    pub fn string_payload(self, s: &str) -> Self {
        self.name(s)
    }

    pub fn byte_payload(mut self, b: i8) -> Self {
        self.payload.push(b as u8);
        self
    }

    pub fn short_payload(self, i: i16) -> Self {
        self.raw_bytes(&i.to_be_bytes())
    }

    pub fn int_payload(self, i: i32) -> Self {
        self.raw_bytes(&i.to_be_bytes())
    }

    pub fn long_payload(self, i: i64) -> Self {
        self.raw_bytes(&i.to_be_bytes())
    }

    /// A string length prefix without the string, for truncation tests.
    pub fn raw_str_len(self, len: u16) -> Self {
        self.raw_bytes(&len.to_be_bytes())
    }

    /// Straight up add some bytes to the payload.
    pub fn raw_bytes(mut self, bs: &[u8]) -> Self {
        self.payload.extend_from_slice(bs);
        self
    }

    pub fn build(self) -> Vec<u8> {
        self.payload
    }
}
