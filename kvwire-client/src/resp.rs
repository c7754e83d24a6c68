//! # RESP Encoding and Parsing
//!
//! Purpose: Encode commands as RESP arrays and parse server replies straight
//! into [`Reply`] values.
//!
//! ## Design Principles
//! 1. **State-Free Parsing**: Replies are parsed top-down with minimal state.
//! 2. **Buffer Reuse**: Callers provide the encode and line buffers.
//! 3. **Binary Safe**: Bulk payloads that are not UTF-8 stay raw bytes.
//! 4. **Fail Fast**: Invalid framing, integer overflow and oversized lengths
//!    return protocol errors immediately.
//!
//! Besides RESP2 the parser accepts the RESP3 null (`_`) and double (`,`)
//! types. Error replies nested inside arrays are drained before the first
//! one is reported, so the connection stays usable.

use std::io::{self, BufRead, Read};

use bytes::BytesMut;
use kvwire_common::{Arg, Reply, TransportError};

/// Largest bulk payload accepted, matching the server's default
/// `proto-max-bulk-len`.
const MAX_BULK_LEN: i64 = 512 * 1024 * 1024;

/// Upper bound on up-front allocation for a length read from the wire.
const MAX_PREALLOC: usize = 1024;

/// One parsed frame: either a value or a server error reply.
enum Frame {
    Value(Reply),
    Error(String),
}

/// Encodes `name args...` as a RESP array of bulk strings.
pub fn encode_command(name: &str, args: &[Arg], out: &mut BytesMut) {
    out.extend_from_slice(b"*");
    push_usize(out, args.len() + 1);
    out.extend_from_slice(b"\r\n");
    push_bulk(out, name.as_bytes());
    for arg in args {
        push_bulk(out, arg.render().as_bytes());
    }
}

/// Reads one reply. A server error reply becomes [`TransportError::Server`].
pub fn read_reply<R: BufRead>(reader: &mut R, line_buf: &mut Vec<u8>) -> Result<Reply, TransportError> {
    match read_frame(reader, line_buf)? {
        Frame::Value(reply) => Ok(reply),
        Frame::Error(message) => Err(TransportError::Server { message }),
    }
}

fn read_frame<R: BufRead>(reader: &mut R, line_buf: &mut Vec<u8>) -> Result<Frame, TransportError> {
    read_line(reader, line_buf)?;
    if line_buf.is_empty() {
        return Err(TransportError::Protocol);
    }

    let value = match line_buf[0] {
        b'+' => Reply::Text(lossy(&line_buf[1..])),
        b'-' => return Ok(Frame::Error(lossy(&line_buf[1..]))),
        b':' => Reply::Integer(parse_i64(&line_buf[1..])?),
        b',' => Reply::Float(parse_f64(&line_buf[1..])?),
        b'_' => Reply::Nil,
        b'$' => {
            let len = parse_i64(&line_buf[1..])?;
            parse_bulk_len(reader, len)?
        }
        b'*' => {
            let len = parse_i64(&line_buf[1..])?;
            return parse_array_len(reader, len, line_buf);
        }
        _ => return Err(TransportError::Protocol),
    };
    Ok(Frame::Value(value))
}

fn parse_bulk_len<R: BufRead>(reader: &mut R, len: i64) -> Result<Reply, TransportError> {
    if len < 0 {
        return Ok(Reply::Nil);
    }
    if len > MAX_BULK_LEN {
        return Err(TransportError::Protocol);
    }
    let len = len as usize;
    // Grow while reading so a bogus header cannot force a huge allocation.
    let mut data = Vec::with_capacity(len.min(MAX_PREALLOC));
    reader.by_ref().take(len as u64).read_to_end(&mut data)?;
    if data.len() < len {
        return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into());
    }

    let mut crlf = [0u8; 2];
    reader.read_exact(&mut crlf)?;
    if crlf != [b'\r', b'\n'] {
        return Err(TransportError::Protocol);
    }

    Ok(match String::from_utf8(data) {
        Ok(text) => Reply::Text(text),
        Err(err) => Reply::Bytes(err.into_bytes()),
    })
}

fn parse_array_len<R: BufRead>(
    reader: &mut R,
    len: i64,
    line_buf: &mut Vec<u8>,
) -> Result<Frame, TransportError> {
    if len < 0 {
        return Ok(Frame::Value(Reply::Nil));
    }

    let mut items = Vec::with_capacity((len as usize).min(MAX_PREALLOC));
    let mut first_error = None;
    for _ in 0..len {
        match read_frame(reader, line_buf)? {
            Frame::Value(item) => items.push(item),
            Frame::Error(message) => {
                first_error.get_or_insert(message);
            }
        }
    }
    Ok(match first_error {
        Some(message) => Frame::Error(message),
        None => Frame::Value(Reply::List(items)),
    })
}

fn read_line<R: BufRead>(reader: &mut R, buf: &mut Vec<u8>) -> Result<(), TransportError> {
    buf.clear();
    let bytes = reader.read_until(b'\n', buf)?;
    if bytes == 0 {
        return Err(TransportError::Protocol);
    }
    if buf.len() < 2 || buf[buf.len() - 2] != b'\r' {
        return Err(TransportError::Protocol);
    }
    buf.truncate(buf.len() - 2);
    Ok(())
}

fn lossy(data: &[u8]) -> String {
    String::from_utf8_lossy(data).into_owned()
}

fn parse_i64(data: &[u8]) -> Result<i64, TransportError> {
    if data.is_empty() {
        return Err(TransportError::Protocol);
    }
    let (negative, digits) = match data[0] {
        b'-' => (true, &data[1..]),
        _ => (false, data),
    };
    if digits.is_empty() {
        return Err(TransportError::Protocol);
    }

    // Accumulate on the negative side so i64::MIN is representable.
    let mut value: i64 = 0;
    for &b in digits {
        if !b.is_ascii_digit() {
            return Err(TransportError::Protocol);
        }
        value = value
            .checked_mul(10)
            .and_then(|v| v.checked_sub((b - b'0') as i64))
            .ok_or(TransportError::Protocol)?;
    }
    if negative {
        Ok(value)
    } else {
        value.checked_neg().ok_or(TransportError::Protocol)
    }
}

fn parse_f64(data: &[u8]) -> Result<f64, TransportError> {
    std::str::from_utf8(data)
        .ok()
        .and_then(|text| text.parse::<f64>().ok())
        .ok_or(TransportError::Protocol)
}

fn push_bulk(out: &mut BytesMut, data: &[u8]) {
    out.extend_from_slice(b"$");
    push_usize(out, data.len());
    out.extend_from_slice(b"\r\n");
    out.extend_from_slice(data);
    out.extend_from_slice(b"\r\n");
}

fn push_usize(out: &mut BytesMut, mut value: usize) {
    // Digits go through a stack buffer to avoid a heap allocation.
    let mut buf = [0u8; 20];
    let mut len = 0;
    if value == 0 {
        buf[0] = b'0';
        len = 1;
    } else {
        while value > 0 {
            buf[len] = b'0' + (value % 10) as u8;
            value /= 10;
            len += 1;
        }
    }
    buf[..len].reverse();
    out.extend_from_slice(&buf[..len]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn parse(input: &[u8]) -> Result<Reply, TransportError> {
        let mut reader = Cursor::new(input.to_vec());
        let mut line = Vec::new();
        read_reply(&mut reader, &mut line)
    }

    #[test]
    fn encodes_command() {
        let mut buf = BytesMut::new();
        encode_command("GET", &[Arg::from("key")], &mut buf);
        assert_eq!(&buf[..], b"*2\r\n$3\r\nGET\r\n$3\r\nkey\r\n");
    }

    #[test]
    fn encodes_typed_arguments() {
        let mut buf = BytesMut::new();
        encode_command(
            "SET",
            &[Arg::from("a"), Arg::from("b"), Arg::Token("EX"), Arg::Int(5)],
            &mut buf,
        );
        assert_eq!(
            &buf[..],
            b"*5\r\n$3\r\nSET\r\n$1\r\na\r\n$1\r\nb\r\n$2\r\nEX\r\n$1\r\n5\r\n"
        );

        buf.clear();
        encode_command("INCRBYFLOAT", &[Arg::from("k"), Arg::Float(-1.5)], &mut buf);
        assert_eq!(&buf[..], b"*3\r\n$11\r\nINCRBYFLOAT\r\n$1\r\nk\r\n$4\r\n-1.5\r\n");
    }

    #[test]
    fn parses_simple_string() {
        assert_eq!(parse(b"+OK\r\n").unwrap(), Reply::Text("OK".into()));
    }

    #[test]
    fn parses_bulk_string() {
        assert_eq!(parse(b"$5\r\nhello\r\n").unwrap(), Reply::Text("hello".into()));
    }

    #[test]
    fn parses_null_bulk_and_array() {
        assert_eq!(parse(b"$-1\r\n").unwrap(), Reply::Nil);
        assert_eq!(parse(b"*-1\r\n").unwrap(), Reply::Nil);
        assert_eq!(parse(b"_\r\n").unwrap(), Reply::Nil);
    }

    #[test]
    fn parses_integer_and_double() {
        assert_eq!(parse(b":42\r\n").unwrap(), Reply::Integer(42));
        assert_eq!(parse(b":-7\r\n").unwrap(), Reply::Integer(-7));
        assert_eq!(parse(b",3.25\r\n").unwrap(), Reply::Float(3.25));
        assert_eq!(parse(b",-inf\r\n").unwrap(), Reply::Float(f64::NEG_INFINITY));
    }

    #[test]
    fn parses_error_as_server_failure() {
        match parse(b"-ERR bad\r\n") {
            Err(TransportError::Server { message }) => assert_eq!(message, "ERR bad"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn parses_nested_arrays() {
        let reply = parse(b"*3\r\n$1\r\na\r\n$-1\r\n*1\r\n:1\r\n").unwrap();
        assert_eq!(
            reply,
            Reply::List(vec![
                Reply::Text("a".into()),
                Reply::Nil,
                Reply::List(vec![Reply::Integer(1)]),
            ])
        );
        assert_eq!(parse(b"*0\r\n").unwrap(), Reply::List(Vec::new()));
    }

    #[test]
    fn nested_error_drains_the_array() {
        let mut reader = Cursor::new(b"*2\r\n-ERR first\r\n:1\r\n+NEXT\r\n".to_vec());
        let mut line = Vec::new();
        assert!(matches!(
            read_reply(&mut reader, &mut line),
            Err(TransportError::Server { .. })
        ));
        assert_eq!(
            read_reply(&mut reader, &mut line).unwrap(),
            Reply::Text("NEXT".into())
        );
    }

    #[test]
    fn non_utf8_bulk_keeps_its_bytes() {
        let reply = parse(b"$4\r\n\xff\x00\r\x61\r\n").unwrap();
        assert_eq!(reply, Reply::Bytes(vec![0xff, 0x00, b'\r', b'a']));
        // Simple strings are line text and stay lossy.
        assert_eq!(parse(b"+\xffa\r\n").unwrap(), Reply::Text("\u{fffd}a".into()));
    }

    #[test]
    fn integer_extremes_are_exact() {
        assert_eq!(parse(b":-9223372036854775808\r\n").unwrap(), Reply::Integer(i64::MIN));
        assert_eq!(parse(b":9223372036854775807\r\n").unwrap(), Reply::Integer(i64::MAX));
        assert_eq!(parse(b":-0\r\n").unwrap(), Reply::Integer(0));
        assert!(matches!(parse(b":9223372036854775808\r\n"), Err(TransportError::Protocol)));
        assert!(matches!(parse(b":99999999999999999999\r\n"), Err(TransportError::Protocol)));
        assert!(matches!(
            parse(b":-9223372036854775809\r\n"),
            Err(TransportError::Protocol)
        ));
    }

    #[test]
    fn huge_lengths_fail_without_allocating() {
        assert!(matches!(
            parse(b"*9223372036854775807\r\n"),
            Err(TransportError::Protocol)
        ));
        assert!(matches!(
            parse(b"*9223372036854775807\r\n:1\r\n"),
            Err(TransportError::Protocol)
        ));
        assert!(matches!(
            parse(b"$9223372036854775807\r\nabc\r\n"),
            Err(TransportError::Protocol)
        ));
        assert!(matches!(
            parse(b"$536870913\r\nabc\r\n"),
            Err(TransportError::Protocol)
        ));
        // Within the limit but truncated: the stream ends early.
        assert!(matches!(parse(b"$536870912\r\nabc"), Err(TransportError::Io(_))));
        assert!(matches!(parse(b"*99999999999999999999\r\n"), Err(TransportError::Protocol)));
    }

    #[test]
    fn malformed_frames_are_protocol_errors() {
        assert!(matches!(parse(b"?x\r\n"), Err(TransportError::Protocol)));
        assert!(matches!(parse(b":12a\r\n"), Err(TransportError::Protocol)));
        assert!(matches!(parse(b":-\r\n"), Err(TransportError::Protocol)));
        assert!(matches!(parse(b"+OK\n"), Err(TransportError::Protocol)));
        assert!(matches!(parse(b""), Err(TransportError::Protocol)));
        assert!(matches!(parse(b"$5\r\nhi\r\n"), Err(TransportError::Io(_))));
    }
}
