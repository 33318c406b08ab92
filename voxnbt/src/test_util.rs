//! Helpers for tests in this and dependent crates. Enabled with the
//! `test-util` feature; not part of the stable API.
//!
//! The crate is a decoder, the encoder here only exists so tests can build
//! payloads from [`Value`] trees and check trees by turning them back into
//! bytes.

use crate::{Tag, Value};

/// Encode a named root value.
pub fn to_bytes(name: &str, value: &Value) -> Vec<u8> {
    let mut out = vec![];
    out.push(value.tag() as u8);
    if value.tag() != Tag::End {
        write_str(&mut out, name);
        write_payload(&mut out, value);
    }
    out
}

fn write_str(out: &mut Vec<u8>, s: &str) {
    let bytes = cesu8::to_java_cesu8(s);
    out.extend_from_slice(&(bytes.len() as u16).to_be_bytes());
    out.extend_from_slice(&bytes);
}

fn write_payload(out: &mut Vec<u8>, value: &Value) {
    match value {
        Value::End => {}
        Value::Byte(v) => out.push(*v as u8),
        Value::Short(v) => out.extend_from_slice(&v.to_be_bytes()),
        Value::Int(v) => out.extend_from_slice(&v.to_be_bytes()),
        Value::Long(v) => out.extend_from_slice(&v.to_be_bytes()),
        Value::Float(v) => out.extend_from_slice(&v.to_be_bytes()),
        Value::Double(v) => out.extend_from_slice(&v.to_be_bytes()),
        Value::String(s) => write_str(out, s),
        Value::ByteArray(vs) => {
            out.extend_from_slice(&(vs.len() as i32).to_be_bytes());
            out.extend(vs.iter().map(|b| *b as u8));
        }
        Value::IntArray(vs) => {
            out.extend_from_slice(&(vs.len() as i32).to_be_bytes());
            for v in vs {
                out.extend_from_slice(&v.to_be_bytes());
            }
        }
        Value::LongArray(vs) => {
            out.extend_from_slice(&(vs.len() as i32).to_be_bytes());
            for v in vs {
                out.extend_from_slice(&v.to_be_bytes());
            }
        }
        Value::List(tag, elements) => {
            out.push(*tag as u8);
            out.extend_from_slice(&(elements.len() as i32).to_be_bytes());
            for el in elements {
                write_payload(out, el);
            }
        }
        Value::Compound(members) => {
            for (name, member) in members {
                out.push(member.tag() as u8);
                write_str(out, name);
                write_payload(out, member);
            }
            out.push(Tag::End as u8);
        }
    }
}
