use std::borrow::Cow;
use std::io::Read;

use flate2::{read::GzDecoder, Decompress, FlushDecompress, Status};
use num_enum::TryFromPrimitive;

use crate::{Error, Result, SECTOR_SIZE};

/// Compression schemes a chunk payload can declare. The id is the byte
/// following the payload length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive)]
#[repr(u8)]
pub enum CompressionScheme {
    /// Legacy, rarely seen in practice.
    Gzip = 1,
    Zlib = 2,
    Uncompressed = 3,
}

/// Decompress a chunk payload. Uncompressed payloads are borrowed as they
/// are.
pub fn decompress(scheme: CompressionScheme, data: &[u8]) -> Result<Cow<'_, [u8]>> {
    match scheme {
        CompressionScheme::Uncompressed => Ok(Cow::Borrowed(data)),
        CompressionScheme::Zlib => inflate_zlib(data).map(Cow::Owned),
        CompressionScheme::Gzip => {
            let mut buf = vec![];
            GzDecoder::new(data).read_to_end(&mut buf)?;
            Ok(Cow::Owned(buf))
        }
    }
}

// The Read adapters in flate2 report a truncated zlib stream as a clean end of
// input, so drive the inflater directly and insist on reaching the end of the
// stream. The adler32 trailer is checked by the inflater.
fn inflate_zlib(data: &[u8]) -> Result<Vec<u8>> {
    let mut inflater = Decompress::new(true);
    let mut out = Vec::with_capacity(data.len() * 4);

    loop {
        if out.len() == out.capacity() {
            out.reserve(out.capacity().max(SECTOR_SIZE));
        }

        let read = inflater.total_in() as usize;
        let written = inflater.total_out();

        let status = inflater
            .decompress_vec(&data[read..], &mut out, FlushDecompress::Finish)
            .map_err(|e| Error::CorruptPayload(e.to_string()))?;

        if status == Status::StreamEnd {
            return Ok(out);
        }

        if inflater.total_in() as usize == read && inflater.total_out() == written {
            return Err(Error::CorruptPayload(
                "zlib stream ended before its trailer".to_owned(),
            ));
        }
    }
}
