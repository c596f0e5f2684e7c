//! Reply Conversion Tests
//!
//! These tests verify:
//! - Conversion to bytes, strings, integers and booleans
//! - Status replies use the "OK" boolean rule
//! - Absent values become `None` or fail for non-optional targets
//! - Error replies fail every conversion except `ServerError`

use bytes::Bytes;
use simpleredis::{Error, Reply, ServerError};

// =============================================================================
// Helper Functions
// =============================================================================

fn status(text: &str) -> Reply {
    Reply::Status(Bytes::copy_from_slice(text.as_bytes()))
}

fn error(text: &str) -> Reply {
    Reply::Error(Bytes::copy_from_slice(text.as_bytes()))
}

fn integer(text: &str) -> Reply {
    Reply::Integer(Bytes::copy_from_slice(text.as_bytes()))
}

fn bulk(data: &[u8]) -> Reply {
    Reply::Bulk(Some(Bytes::copy_from_slice(data)))
}

fn assert_conversion_error<T: std::fmt::Debug>(result: Result<T, Error>) {
    match result {
        Err(Error::Conversion(_)) => {}
        other => panic!("Expected conversion error, got {:?}", other),
    }
}

fn assert_server_error<T: std::fmt::Debug>(result: Result<T, Error>, message: &str) {
    match result {
        Err(Error::Server(m)) => assert_eq!(m, message),
        other => panic!("Expected server error, got {:?}", other),
    }
}

// =============================================================================
// Bytes and String Conversion Tests
// =============================================================================

#[test]
fn test_bulk_to_bytes_and_string() {
    let reply = bulk(b"abc");
    assert_eq!(reply.convert::<Bytes>().unwrap(), Bytes::from_static(b"abc"));
    assert_eq!(reply.convert::<Vec<u8>>().unwrap(), b"abc".to_vec());
    assert_eq!(reply.convert::<String>().unwrap(), "abc");
}

#[test]
fn test_binary_bulk_to_bytes() {
    let reply = bulk(&[0x00, 0xFF, 0x80]);
    assert_eq!(reply.convert::<Vec<u8>>().unwrap(), vec![0x00, 0xFF, 0x80]);
    assert_conversion_error(reply.convert::<String>());
}

#[test]
fn test_multibyte_string() {
    assert_eq!(bulk("héllo".as_bytes()).convert::<String>().unwrap(), "héllo");
}

#[test]
fn test_status_and_integer_to_string() {
    assert_eq!(status("PONG").convert::<String>().unwrap(), "PONG");
    assert_eq!(integer("42").convert::<String>().unwrap(), "42");
}

#[test]
fn test_empty_bulk_is_empty_not_absent() {
    let reply = bulk(b"");
    assert_eq!(reply.convert::<String>().unwrap(), "");
    assert_eq!(reply.convert::<Vec<u8>>().unwrap(), Vec::<u8>::new());
    assert_eq!(reply.convert::<Option<String>>().unwrap(), Some(String::new()));
}

#[test]
fn test_conversion_is_repeatable() {
    let reply = bulk(b"12");
    assert_eq!(reply.convert::<i64>().unwrap(), 12);
    assert_eq!(reply.convert::<String>().unwrap(), "12");
    assert_eq!(reply.convert::<i64>().unwrap(), 12);
}

// =============================================================================
// Integer Conversion Tests
// =============================================================================

#[test]
fn test_integer_reply_to_numbers() {
    assert_eq!(integer("5").convert::<i64>().unwrap(), 5);
    assert_eq!(integer("-17").convert::<i32>().unwrap(), -17);
    assert_eq!(integer("9223372036854775807").convert::<i64>().unwrap(), i64::MAX);
}

#[test]
fn test_bulk_numeric_text_to_integer() {
    assert_eq!(bulk(b"100").convert::<i64>().unwrap(), 100);
}

#[test]
fn test_non_numeric_to_integer_fails() {
    assert_conversion_error(bulk(b"abc").convert::<i64>());
    assert_conversion_error(bulk(b"").convert::<i32>());
    assert_conversion_error(status("OK").convert::<i64>());
}

#[test]
fn test_i32_overflow_fails() {
    assert_conversion_error(integer("3000000000").convert::<i32>());
    assert_eq!(integer("3000000000").convert::<i64>().unwrap(), 3_000_000_000);
}

// =============================================================================
// Boolean Conversion Tests
// =============================================================================

#[test]
fn test_plain_boolean_rule() {
    assert!(integer("1").convert::<bool>().unwrap());
    assert!(!integer("0").convert::<bool>().unwrap());
    assert!(bulk(b"1").convert::<bool>().unwrap());
    assert!(!bulk(b"0").convert::<bool>().unwrap());
}

#[test]
fn test_plain_boolean_rejects_other_values() {
    assert_conversion_error(integer("2").convert::<bool>());
    assert_conversion_error(integer("10").convert::<bool>());
    assert_conversion_error(bulk(b"true").convert::<bool>());
    assert_conversion_error(bulk(b"OK").convert::<bool>());
}

#[test]
fn test_status_boolean_rule() {
    assert!(status("OK").convert::<bool>().unwrap());
    assert!(status("ok").convert::<bool>().unwrap());
    assert!(status("Ok").convert::<bool>().unwrap());
    assert!(!status("QUEUED").convert::<bool>().unwrap());
    assert!(!status("PONG").convert::<bool>().unwrap());
    // A status of "1" still follows the status rule
    assert!(!status("1").convert::<bool>().unwrap());
}

// =============================================================================
// Absent Value Tests
// =============================================================================

#[test]
fn test_absent_bulk_to_optional() {
    let reply = Reply::Bulk(None);
    assert_eq!(reply.convert::<Option<String>>().unwrap(), None);
    assert_eq!(reply.convert::<Option<Vec<u8>>>().unwrap(), None);
    assert_eq!(reply.convert::<Option<i64>>().unwrap(), None);
    assert_eq!(reply.convert::<Option<bool>>().unwrap(), None);
}

#[test]
fn test_absent_bulk_to_non_optional_fails() {
    let reply = Reply::Bulk(None);
    assert_conversion_error(reply.convert::<String>());
    assert_conversion_error(reply.convert::<Bytes>());
    assert_conversion_error(reply.convert::<i64>());
    assert_conversion_error(reply.convert::<bool>());
}

#[test]
fn test_absent_multi_bulk() {
    let reply = Reply::MultiBulk(None);
    assert_eq!(reply.convert::<Option<Vec<String>>>().unwrap(), None);
    assert_conversion_error(reply.convert::<Vec<String>>());
}

#[test]
fn test_present_value_to_optional() {
    assert_eq!(bulk(b"v").convert::<Option<String>>().unwrap(), Some("v".to_string()));
    assert_eq!(integer("3").convert::<Option<i64>>().unwrap(), Some(3));
}

// =============================================================================
// Multi-Bulk Conversion Tests
// =============================================================================

#[test]
fn test_multi_bulk_to_vec() {
    let reply = Reply::MultiBulk(Some(vec![bulk(b"a"), bulk(b"b"), Reply::Bulk(None)]));
    assert_eq!(
        reply.convert::<Vec<Option<String>>>().unwrap(),
        vec![Some("a".to_string()), Some("b".to_string()), None]
    );
    assert_conversion_error(reply.convert::<Vec<String>>());
}

#[test]
fn test_empty_multi_bulk_to_vec() {
    let reply = Reply::MultiBulk(Some(vec![]));
    assert_eq!(reply.convert::<Vec<String>>().unwrap(), Vec::<String>::new());
    assert_eq!(reply.convert::<Option<Vec<i64>>>().unwrap(), Some(vec![]));
}

#[test]
fn test_nested_multi_bulk_to_vec() {
    let reply = Reply::MultiBulk(Some(vec![
        Reply::MultiBulk(Some(vec![integer("1"), integer("2")])),
        Reply::MultiBulk(Some(vec![])),
    ]));
    assert_eq!(reply.convert::<Vec<Vec<i64>>>().unwrap(), vec![vec![1, 2], vec![]]);
}

#[test]
fn test_multi_bulk_to_scalar_fails() {
    let reply = Reply::MultiBulk(Some(vec![bulk(b"a")]));
    assert_conversion_error(reply.convert::<String>());
    assert_conversion_error(reply.convert::<i64>());
}

#[test]
fn test_multi_bulk_of_bytes() {
    let reply = Reply::MultiBulk(Some(vec![bulk(b"\x01"), bulk(b"\x02\x03")]));
    assert_eq!(
        reply.convert::<Vec<Vec<u8>>>().unwrap(),
        vec![vec![0x01], vec![0x02, 0x03]]
    );
}

// =============================================================================
// Error Reply Tests
// =============================================================================

#[test]
fn test_error_reply_poisons_every_conversion() {
    let message = "ERR value is not an integer or out of range";
    let reply = error(message);

    assert_server_error(reply.convert::<String>(), message);
    assert_server_error(reply.convert::<Bytes>(), message);
    assert_server_error(reply.convert::<Vec<u8>>(), message);
    assert_server_error(reply.convert::<i64>(), message);
    assert_server_error(reply.convert::<i32>(), message);
    assert_server_error(reply.convert::<bool>(), message);
    assert_server_error(reply.convert::<Option<String>>(), message);
    assert_server_error(reply.convert::<Vec<String>>(), message);
    assert_server_error(reply.convert::<()>(), message);
}

#[test]
fn test_error_inside_multi_bulk_surfaces_on_conversion() {
    let reply = Reply::MultiBulk(Some(vec![integer("1"), error("WRONGTYPE bad")]));
    assert_server_error(reply.convert::<Vec<i64>>(), "WRONGTYPE bad");
    // The raw reply is still inspectable
    assert_eq!(reply.convert::<Reply>().unwrap(), reply);
}

#[test]
fn test_error_reply_as_server_error() {
    let reply = error("WRONGTYPE Operation against a key holding the wrong kind of value");
    let err = reply.convert::<ServerError>().unwrap();
    assert_eq!(err.code(), "WRONGTYPE");
    assert_eq!(
        err.message(),
        "WRONGTYPE Operation against a key holding the wrong kind of value"
    );
    assert_eq!(reply.server_error(), Some(err));
}

#[test]
fn test_non_error_as_server_error_fails() {
    assert_conversion_error(status("OK").convert::<ServerError>());
    assert!(bulk(b"x").server_error().is_none());
}

#[test]
fn test_error_with_invalid_utf8() {
    let reply = Reply::Error(Bytes::from_static(b"\xff\xfe"));
    assert_server_error(reply.convert::<String>(), "unknown error");
}

#[test]
fn test_into_result() {
    assert!(status("OK").into_result().is_ok());
    assert_server_error(error("ERR nope").into_result(), "ERR nope");
}

#[test]
fn test_unit_accepts_non_errors() {
    assert!(status("OK").convert::<()>().is_ok());
    assert!(Reply::Bulk(None).convert::<()>().is_ok());
    assert!(Reply::MultiBulk(Some(vec![])).convert::<()>().is_ok());
}

// =============================================================================
// Display Tests
// =============================================================================

#[test]
fn test_display() {
    assert_eq!(status("OK").to_string(), "OK");
    assert_eq!(integer("7").to_string(), "7");
    assert_eq!(bulk(b"abc").to_string(), "abc");
    assert_eq!(Reply::Bulk(None).to_string(), "(nil)");
    assert_eq!(
        Reply::MultiBulk(Some(vec![bulk(b"a"), integer("1"), Reply::MultiBulk(None)])).to_string(),
        "[a, 1, (nil)]"
    );
}
