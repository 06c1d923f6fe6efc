//! Tests for the cursor's debug tracing

use std::io;
use std::sync::{Arc, Mutex};

use pq_bind::protocol::types::oid;
use pq_bind::{BindResult, Column, Opts, PreparedHandle, TextResult};

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn run_cursor(debug: bool) -> String {
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        let mut result = TextResult::new(vec![Column {
            name: "n".to_string(),
            type_oid: oid::INT8,
        }]);
        result.push_row([Some(&b"42"[..])]);

        let opts = Opts {
            debug,
            ..Default::default()
        };
        let mut handle = PreparedHandle::with_opts(result, &opts);
        let mut cursor = BindResult::new(&mut handle);
        assert!(cursor.next());
        assert_eq!(cursor.bind_integral(0).unwrap().value, 42);
    });

    let bytes = captured.0.lock().unwrap().clone();
    String::from_utf8(bytes).unwrap()
}

#[test]
fn test_debug_emits_events() {
    let output = run_cursor(true);
    assert!(output.contains("constructing bind result"), "{output}");
    assert!(output.contains("accessing next row"), "{output}");
    assert!(output.contains("binding result"), "{output}");
}

#[test]
fn test_no_events_without_debug() {
    let output = run_cursor(false);
    assert!(!output.contains("accessing next row"), "{output}");
    assert!(!output.contains("binding result"), "{output}");
}
