//! Tests for BindResult over buffered text results

use pq_bind::protocol::types::oid;
use pq_bind::{BindResult, Column, Error, Opts, PreparedHandle, ResultSet, TextResult};

fn column(name: &str, type_oid: u32) -> Column {
    Column {
        name: name.to_string(),
        type_oid,
    }
}

/// 3 rows, 2 columns; row 1 is ("42", NULL).
fn sample() -> TextResult {
    let mut result = TextResult::new(vec![column("n", oid::INT8), column("flag", oid::BOOL)]);
    result.push_row([Some(&b"7"[..]), Some(&b"t"[..])]);
    result.push_row([Some(&b"42"[..]), None]);
    result.push_row([Some(&b"-3"[..]), Some(&b"f"[..])]);
    result
}

#[test]
fn test_advance_counts_rows() {
    let mut handle = PreparedHandle::new(sample());
    let mut cursor = BindResult::new(&mut handle);

    let mut seen = 0;
    while cursor.next() {
        seen += 1;
    }
    assert_eq!(seen, 3);

    // Exhausted is terminal
    assert!(!cursor.next());
    assert!(!cursor.next());
    assert_eq!(cursor.row(), None);
}

#[test]
fn test_null_aware_binds() {
    let mut handle = PreparedHandle::new(sample());
    let mut cursor = BindResult::new(&mut handle);

    assert!(cursor.next());
    let n = cursor.bind_integral(0).unwrap();
    assert_eq!((n.value, n.is_null), (7, false));
    assert!(cursor.bind_boolean(1).unwrap().value);

    assert!(cursor.next());
    let n = cursor.bind_integral(0).unwrap();
    assert_eq!((n.value, n.is_null), (42, false));
    assert!(cursor.bind_boolean(1).unwrap().is_null);
    assert!(cursor.bind_integral(1).unwrap().is_null);
    assert!(cursor.bind_floating_point(1).unwrap().is_null);
    assert!(cursor.is_null(1).unwrap());

    assert!(cursor.next());
    assert_eq!(cursor.bind_floating_point(0).unwrap().value, -3.0);
    assert_eq!(cursor.bind_boolean(1).unwrap().into_option(), Some(false));

    assert!(!cursor.next());
}

#[test]
fn test_first_row_with_null_flag() {
    // Row 0 is ("42", NULL)
    let mut result = TextResult::new(vec![column("n", oid::INT8), column("flag", oid::BOOL)]);
    result.push_row([Some(&b"42"[..]), None]);
    result.push_row([Some(&b"1"[..]), Some(&b"t"[..])]);
    result.push_row([Some(&b"2"[..]), Some(&b"f"[..])]);
    let mut handle = PreparedHandle::new(result);
    let mut cursor = BindResult::new(&mut handle);

    assert!(cursor.next());
    let n = cursor.bind_integral(0).unwrap();
    assert_eq!((n.value, n.is_null), (42, false));
    let flag = cursor.bind_boolean(1).unwrap();
    assert_eq!((flag.value, flag.is_null), (false, true));

    assert!(cursor.next());
    assert!(cursor.next());
    assert!(!cursor.next());
}

/// One row, one column: NULL, but its text is not empty.
struct NullWithText;

impl ResultSet for NullWithText {
    fn row_count(&self) -> usize {
        1
    }

    fn field_count(&self) -> usize {
        1
    }

    fn cell_text(&self, _row: usize, _col: usize) -> &[u8] {
        b"garbage"
    }

    fn cell_is_null(&self, _row: usize, _col: usize) -> bool {
        true
    }
}

#[test]
fn test_null_ignores_cell_text() {
    let mut handle = PreparedHandle::new(NullWithText);
    let mut cursor = BindResult::new(&mut handle);
    assert!(cursor.next());

    let b = cursor.bind_boolean(0).unwrap();
    assert_eq!((b.value, b.is_null), (false, true));
    let f = cursor.bind_floating_point(0).unwrap();
    assert_eq!((f.value, f.is_null), (0.0, true));
    let n = cursor.bind_integral(0).unwrap();
    assert_eq!((n.value, n.is_null), (0, true));
}

#[test]
fn test_bind_text() {
    let mut result = TextResult::new(vec![column("name", oid::TEXT), column("note", oid::TEXT)]);
    result.push_row([Some("héllo".as_bytes()), None]);
    let mut handle = PreparedHandle::new(result);
    let mut cursor = BindResult::new(&mut handle);
    assert!(cursor.next());

    let text = cursor.bind_text(0).unwrap();
    assert_eq!(text.len(), 6);
    assert_eq!(text.as_str().unwrap(), "héllo");
    let owned = text.as_bytes().to_vec();

    let null = cursor.bind_text(1).unwrap();
    assert!(null.is_empty());

    assert!(!cursor.next());
    assert_eq!(owned, "héllo".as_bytes());
}

#[test]
fn test_lenient_boundary() {
    let mut handle = PreparedHandle::new(sample());
    let mut cursor = BindResult::new(&mut handle);
    assert!(cursor.next());

    // One past the last column is accepted and reads as NULL
    let text = cursor.bind_text(2).unwrap();
    assert_eq!(text.len(), 0);
    assert!(cursor.bind_integral(2).unwrap().is_null);

    assert!(matches!(
        cursor.bind_text(3),
        Err(Error::IndexOutOfRange {
            index: 3,
            fields: 2
        })
    ));
    assert!(matches!(
        cursor.bind_boolean(3),
        Err(Error::IndexOutOfRange { .. })
    ));
}

#[test]
fn test_strict_boundary_from_opts() {
    let opts = Opts::try_from("postgres://localhost/db?strict_bounds=on").unwrap();
    let mut handle = PreparedHandle::with_opts(sample(), &opts);
    let mut cursor = BindResult::new(&mut handle);
    assert!(cursor.next());
    assert!(matches!(
        cursor.bind_text(2),
        Err(Error::IndexOutOfRange {
            index: 2,
            fields: 2
        })
    ));
}

#[test]
fn test_debug_does_not_change_values() {
    let opts = Opts {
        debug: true,
        ..Default::default()
    };
    let mut handle = PreparedHandle::with_opts(sample(), &opts);
    let mut cursor = BindResult::new(&mut handle);
    assert!(cursor.next());
    assert_eq!(cursor.bind_integral(0).unwrap().value, 7);
}

#[test]
fn test_handle_keeps_state_between_cursors() {
    let mut handle = PreparedHandle::new(sample());
    {
        let mut cursor = BindResult::new(&mut handle);
        assert!(cursor.next());
        assert!(cursor.next());
    }
    let mut cursor = BindResult::new(&mut handle);
    assert_eq!(cursor.row(), Some(1));
    assert!(cursor.next());
    assert_eq!(cursor.bind_integral(0).unwrap().value, -3);
    assert!(!cursor.next());
}

#[test]
fn test_borrowed_result() {
    let result = sample();
    let mut handle = PreparedHandle::new(&result);
    let mut cursor = BindResult::new(&mut handle);
    assert!(cursor.next());
    assert_eq!(cursor.field_count(), 2);
}
