//! Decode a tag tree into an owned [`Value`].
//!
//! The binary format is a single named tag, normally a compound. Each named
//! member of a compound is a tag byte, a length-prefixed name and the payload
//! for that tag. Lists carry one tag for all of their elements, and their
//! elements are unnamed.
//!
//! Decoding does not recurse on the call stack. Open compounds and lists are
//! kept as an explicit stack of layers, and the depth of that stack is checked
//! against [`DeOpts::max_depth`] before a new container is entered.
//!
//! ```
//! use voxnbt::{from_bytes_with_opts, DeOpts, Value};
//!
//! // An empty, unnamed root compound.
//! let data = [10u8, 0, 0, 0];
//! let value = from_bytes_with_opts(&data, DeOpts::new()).unwrap();
//! assert_eq!(value, Value::Compound(Default::default()));
//! ```

use std::convert::TryFrom;

use byteorder::{BigEndian, ByteOrder};

use crate::{
    error::{Error, Result},
    input::Reader,
    Compound, DeOpts, Tag, Value,
};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Decode a tree with default options. The name of the root tag is dropped,
/// it is almost always the empty string.
pub fn from_bytes(data: &[u8]) -> Result<Value> {
    from_bytes_with_opts(data, DeOpts::new())
}

/// Decode a tree with the given options. The name of the root tag is dropped.
pub fn from_bytes_with_opts(data: &[u8], opts: DeOpts) -> Result<Value> {
    Decoder::new(data, opts).root().map(|(_, value)| value)
}

/// Decode a tree, keeping the name of the root tag. An empty tree (a lone End
/// tag) has an empty name and decodes to [`Value::End`].
pub fn from_bytes_named(data: &[u8], opts: DeOpts) -> Result<(String, Value)> {
    Decoder::new(data, opts).root()
}

/// Decoder over a byte slice. Most users want [`from_bytes`].
pub struct Decoder<'de> {
    input: Reader<'de>,
    opts: DeOpts,
}

enum Layer {
    Compound {
        members: Compound,
        // Name of the member currently being decoded.
        name: Option<String>,
    },
    List {
        element_tag: Tag,
        remaining: usize,
        elements: Vec<Value>,
    },
}

enum Step {
    Element(Tag),
    Finished,
}

impl Layer {
    fn attach(&mut self, value: Value) {
        match self {
            Layer::Compound { members, name } => {
                if let Some(name) = name.take() {
                    members.insert(name, value);
                }
            }
            Layer::List { elements, .. } => elements.push(value),
        }
    }

    fn into_value(self) -> Value {
        match self {
            Layer::Compound { members, .. } => Value::Compound(members),
            Layer::List {
                element_tag,
                elements,
                ..
            } => Value::List(element_tag, elements),
        }
    }
}

impl<'de> Decoder<'de> {
    pub fn new(data: &'de [u8], opts: DeOpts) -> Self {
        Self {
            input: Reader::new(data),
            opts,
        }
    }

    /// Bytes of input not yet consumed.
    pub fn remaining(&self) -> usize {
        self.input.remaining()
    }

    /// Decode the root tag, its name and its value.
    pub fn root(&mut self) -> Result<(String, Value)> {
        let tag = self.input.read_u8()?;
        let tag = match Tag::try_from(tag) {
            Ok(tag) => tag,
            Err(_) if self.is_gzip(tag) => {
                return Err(Error::bespoke(
                    "invalid nbt: data looks gzip compressed, decompress it first",
                ))
            }
            Err(_) => return Err(Error::invalid_tag(tag)),
        };

        if tag == Tag::End {
            return Ok((String::new(), Value::End));
        }

        let name = self.string()?;
        let value = self.value(tag)?;
        Ok((name, value))
    }

    fn is_gzip(&self, first: u8) -> bool {
        let mut peek = self.input.clone();
        first == GZIP_MAGIC[0] && peek.read_u8().ok() == Some(GZIP_MAGIC[1])
    }

    /// Decode the payload of a value whose tag has already been consumed.
    pub fn value(&mut self, tag: Tag) -> Result<Value> {
        let mut layers: Vec<Layer> = Vec::new();
        let mut pending = self.begin(tag, &mut layers)?;

        loop {
            if let Some(value) = pending.take() {
                match layers.last_mut() {
                    Some(layer) => layer.attach(value),
                    None => return Ok(value),
                }
            }

            let step = match layers.last_mut() {
                Some(layer) => self.step(layer)?,
                None => return Err(Error::bespoke("nbt decoder lost its place")),
            };

            pending = match step {
                Step::Element(tag) => self.begin(tag, &mut layers)?,
                Step::Finished => layers.pop().map(Layer::into_value),
            };
        }
    }

    /// Work out what comes next in the innermost open container.
    fn step(&mut self, layer: &mut Layer) -> Result<Step> {
        match layer {
            Layer::Compound { name, .. } => {
                let tag = self.tag()?;
                if tag == Tag::End {
                    return Ok(Step::Finished);
                }
                *name = Some(self.string()?);
                Ok(Step::Element(tag))
            }
            Layer::List {
                element_tag,
                remaining,
                ..
            } => {
                if *remaining == 0 {
                    return Ok(Step::Finished);
                }
                *remaining -= 1;
                Ok(Step::Element(*element_tag))
            }
        }
    }

    /// Start decoding a value. Scalars and arrays are returned straight away,
    /// containers are pushed as a new layer and complete later.
    fn begin(&mut self, tag: Tag, layers: &mut Vec<Layer>) -> Result<Option<Value>> {
        let value = match tag {
            Tag::End => return Err(Error::invalid_tag(0)),
            Tag::Byte => Value::Byte(self.input.read_i8()?),
            Tag::Short => Value::Short(self.input.read_i16()?),
            Tag::Int => Value::Int(self.input.read_i32()?),
            Tag::Long => Value::Long(self.input.read_i64()?),
            Tag::Float => Value::Float(self.input.read_f32()?),
            Tag::Double => Value::Double(self.input.read_f64()?),
            Tag::String => Value::String(self.string()?),
            Tag::ByteArray => {
                let len = self.len()?;
                let bytes = self.input.read_bytes(len)?;
                Value::ByteArray(bytes.iter().map(|b| *b as i8).collect())
            }
            Tag::IntArray => {
                let bytes = self.array_bytes(std::mem::size_of::<i32>())?;
                Value::IntArray(bytes.chunks_exact(4).map(BigEndian::read_i32).collect())
            }
            Tag::LongArray => {
                let bytes = self.array_bytes(std::mem::size_of::<i64>())?;
                Value::LongArray(bytes.chunks_exact(8).map(BigEndian::read_i64).collect())
            }
            Tag::Compound => {
                self.enter(layers)?;
                layers.push(Layer::Compound {
                    members: Compound::new(),
                    name: None,
                });
                return Ok(None);
            }
            Tag::List => {
                let element_tag = self.tag()?;
                let len = self.input.read_i32()?;
                if element_tag == Tag::End && len > 0 {
                    return Err(Error::end_list(len));
                }

                let remaining = len.max(0) as usize;
                self.enter(layers)?;
                layers.push(Layer::List {
                    element_tag,
                    remaining,
                    // Every element takes at least one byte of input.
                    elements: Vec::with_capacity(remaining.min(self.input.remaining())),
                });
                return Ok(None);
            }
        };

        Ok(Some(value))
    }

    fn enter(&self, layers: &[Layer]) -> Result<()> {
        let limit = self.opts.depth_limit();
        if layers.len() >= limit {
            return Err(Error::too_deep(limit));
        }
        Ok(())
    }

    fn tag(&mut self) -> Result<Tag> {
        let tag = self.input.read_u8()?;
        Tag::try_from(tag).map_err(|_| Error::invalid_tag(tag))
    }

    /// Array and list lengths are signed. Negative lengths are treated as
    /// empty.
    fn len(&mut self) -> Result<usize> {
        Ok(self.input.read_i32()?.max(0) as usize)
    }

    fn array_bytes(&mut self, element_size: usize) -> Result<&'de [u8]> {
        let len = self.len()?;
        match len.checked_mul(element_size) {
            Some(size) => self.input.read_bytes(size),
            None => Err(Error::out_of_bounds(usize::MAX, self.input.remaining())),
        }
    }

    fn string(&mut self) -> Result<String> {
        let len = self.input.read_u16()? as usize;
        let bytes = self.input.read_bytes(len)?;
        cesu8::from_java_cesu8(bytes)
            .map(|s| s.into_owned())
            .map_err(|_| Error::nonunicode_string(bytes))
    }
}
